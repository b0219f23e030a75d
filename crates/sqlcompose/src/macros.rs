/// Build a `Vec<Arg>` from values and expressions.
///
/// ```ignore
/// let e = expr("a = ? AND b IN (?)", args![1, sub_query]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Build a [`ColumnMap`](crate::ColumnMap), keeping the written order.
///
/// ```ignore
/// let pred = Expr::eq(cols! { "status" => "active", "deleted_at" => None::<DateTime<Utc>> });
/// ```
#[macro_export]
macro_rules! cols {
    () => {
        $crate::ColumnMap::new()
    };
    ($($col:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ColumnMap::new();
        $(map.insert($col, $value);)+
        map
    }};
}
