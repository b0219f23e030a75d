//! End-to-end composition through the public API.

use sqlcompose::prelude::*;
use sqlcompose::{BoxError, SqlBuf, SqlError, count_placeholders, to_sql};
use std::sync::Arc;
use std::thread;

// ── Custom nodes and values ──────────────────────────────────────────────────

/// A node written by hand against the public protocol.
#[derive(Debug)]
struct Dummy;

impl SqlWriter for Dummy {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        buf.push_str("DUMMY(");
        buf.push_arg(Value::from(42));
        buf.push_str(", ");
        buf.push_arg(Value::from(42));
        buf.push(')');
        Ok(true)
    }
}

#[derive(Debug)]
struct NullString {
    value: String,
    valid: bool,
}

impl Valuer for NullString {
    fn value(&self) -> Result<Value, BoxError> {
        Ok(self.valid.then(|| self.value.clone()).into())
    }
}

#[derive(Debug)]
struct NullInt64 {
    value: i64,
    valid: bool,
}

impl Valuer for NullInt64 {
    fn value(&self) -> Result<Value, BoxError> {
        Ok(self.valid.then_some(self.value).into())
    }
}

#[derive(Debug)]
struct Unreachable;

impl Valuer for Unreachable {
    fn value(&self) -> Result<Value, BoxError> {
        Err(Box::new(std::io::Error::other("lookup failed")))
    }
}

#[test]
fn custom_node_is_spliced_into_literal() {
    let (sql, args) = expr("EXISTS(?)", args![Expr::custom(Dummy)]).to_sql().unwrap();
    assert_eq!(sql, "EXISTS(DUMMY(?, ?))");
    assert_eq!(args, vec![Value::from(42), Value::from(42)]);
}

#[test]
fn custom_node_in_select_where() {
    let (sql, args) = qb::select(&["id"])
        .from("t")
        .and_where(Expr::custom(Dummy), args![])
        .eq("x", 1)
        .placeholder_format(PlaceholderFormat::Dollar)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id FROM t WHERE DUMMY($1, $2) AND x = $3");
    assert_eq!(args, vec![Value::from(42), Value::from(42), Value::from(1)]);
}

#[test]
fn null_valuers_in_equality() {
    let (sql, args) = Expr::eq(cols! {
        "name" => Value::valuer(NullString { value: "Name".into(), valid: true }),
        "age" => Value::valuer(NullInt64 { value: 0, valid: false }),
    })
    .to_sql()
    .unwrap();
    assert_eq!(sql, "name = ? AND age IS NULL");
    assert_eq!(args, vec![Value::from("Name")]);

    let (sql, args) = Expr::not_eq(cols! {
        "name" => Value::valuer(NullString { value: String::new(), valid: false }),
        "age" => Value::valuer(NullInt64 { value: 7, valid: true }),
    })
    .to_sql()
    .unwrap();
    assert_eq!(sql, "name IS NOT NULL AND age <> ?");
    assert_eq!(args, vec![Value::from(7i64)]);
}

#[test]
fn valuer_error_reaches_the_caller() {
    let err = qb::select(&["*"])
        .from("t")
        .eq("x", Value::valuer(Unreachable))
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, SqlError::Valuer(_)));
    assert_eq!(err.to_string(), "lookup failed");
}

#[test]
fn generic_to_sql_works_on_any_node() {
    let (sql, args) = to_sql(&Dummy).unwrap();
    assert_eq!(sql, "DUMMY(?, ?)");
    assert_eq!(args.len(), 2);

    let builder = qb::select(&["a"]).from("t").placeholder_format(PlaceholderFormat::Dollar);
    // As a plain node the markers are never restyled.
    let (sql, _) = to_sql(&builder.eq("b", 1)).unwrap();
    assert_eq!(sql, "SELECT a FROM t WHERE b = ?");
}

// ── Counting invariant ───────────────────────────────────────────────────────

#[test]
fn marker_count_matches_args_at_depth() {
    let inner = qb::select(&["id"])
        .from("orders")
        .and_where(Expr::gt(cols! { "total" => 100 }), args![])
        .and_where("region IN (?)", args![expr(placeholders(2), args!["eu", "us"])]);
    let case = Case::new()
        .when(Expr::eq(cols! { "kind" => vec![1, 2] }), expr("?", args!["low"]))
        .otherwise(expr("?", args!["high"]));
    let (sql, args) = qb::select(&["u.id"])
        .column(alias(case, "bucket"), args![])
        .from("users u")
        .and_where("u.id IN (?) AND u.flag ?? 'x'", args![inner])
        .and_where(Expr::or(vec![
            Expr::eq(cols! { "a" => None::<i32> }),
            Expr::lt_or_eq(cols! { "b" => 3.5 }),
        ]), args![])
        .to_sql()
        .unwrap();

    assert_eq!(count_placeholders(&sql), args.len());
    assert_eq!(
        args,
        vec![
            Value::from(1),
            Value::from(2),
            Value::from("low"),
            Value::from("high"),
            Value::from(100),
            Value::from("eu"),
            Value::from("us"),
            Value::from(3.5),
        ]
    );

    let dollar = PlaceholderFormat::Dollar.replace_placeholders(&sql);
    assert!(dollar.contains(&format!("${}", args.len())));
    assert!(!dollar.contains(&format!("${}", args.len() + 1)));
    assert!(dollar.contains("u.flag ? 'x'"));
}

// ── Threads ──────────────────────────────────────────────────────────────────

#[test]
fn trees_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Expr>();
    assert_send_sync::<Case>();
    assert_send_sync::<Value>();
    assert_send_sync::<sqlcompose::SelectQb>();
    assert_send_sync::<sqlcompose::InsertQb>();
    assert_send_sync::<sqlcompose::UpdateQb>();
    assert_send_sync::<sqlcompose::DeleteQb>();
}

#[test]
fn shared_tree_compiles_identically_on_many_threads() {
    let qb = Arc::new(
        qb::select(&["a"])
            .from("t")
            .and_where(expr("EXISTS(?)", args![Expr::custom(Dummy)]), args![])
            .eq("b", vec![1, 2, 3]),
    );
    let expected = qb.to_sql().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let qb = Arc::clone(&qb);
            thread::spawn(move || qb.to_sql().unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn statement_builder_from_toml() {
    let sb: StatementBuilder = toml::from_str(r#"placeholder_format = "dollar""#).unwrap();
    assert_eq!(sb, StatementBuilder::dollar());

    let (sql, _) = sb.update("t").set("a", 1).to_sql().unwrap();
    assert_eq!(sql, "UPDATE t SET a = $1");

    let sb: StatementBuilder = toml::from_str("").unwrap();
    assert_eq!(sb.placeholder_format, PlaceholderFormat::Question);

    assert!(toml::from_str::<StatementBuilder>(r#"placeholder_format = "colon""#).is_err());
}

// ── Driver hand-off ──────────────────────────────────────────────────────────

#[test]
fn built_query_hands_params_to_the_driver() {
    let built = StatementBuilder::dollar()
        .insert("users")
        .columns(&["name", "tags", "meta", "nickname"])
        .values(args![
            "alice",
            vec!["a", "b"],
            serde_json::json!({ "admin": true }),
            None::<String>
        ])
        .suffix("RETURNING id", args![])
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "INSERT INTO users (name,tags,meta,nickname) VALUES ($1,$2,$3,$4) RETURNING id"
    );
    let params = built.params_ref();
    assert_eq!(params.len(), 4);
    assert!(built.args[1].is_array());
    assert!(built.args[3].is_null());
}
