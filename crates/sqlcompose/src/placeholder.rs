//! `?` marker scanning and placeholder styles.
//!
//! Every node compiles to text that uses a single `?` per argument slot. A
//! literal `?` is written as `??` and never consumes an argument. Once a whole
//! statement is compiled, [`PlaceholderFormat`] restyles the markers for the
//! target driver.

use crate::error::SqlResult;
use crate::expr::SqlBuf;
use serde::Deserialize;

/// A piece of SQL text between markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Plain text, no markers inside.
    Text(&'a str),
    /// An escaped `??`.
    Escaped,
    /// The n-th marker (1-based).
    Marker(usize),
}

/// Iterator splitting SQL text into [`Segment`]s, left to right.
pub(crate) struct Segments<'a> {
    rest: &'a str,
    count: usize,
    pending: Option<Segment<'a>>,
}

pub(crate) fn segments(sql: &str) -> Segments<'_> {
    Segments {
        rest: sql,
        count: 0,
        pending: None,
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if let Some(seg) = self.pending.take() {
            return Some(seg);
        }
        if self.rest.is_empty() {
            return None;
        }

        let Some(pos) = self.rest.find('?') else {
            let text = self.rest;
            self.rest = "";
            return Some(Segment::Text(text));
        };

        let text = &self.rest[..pos];
        let seg = if self.rest[pos + 1..].starts_with('?') {
            self.rest = &self.rest[pos + 2..];
            Segment::Escaped
        } else {
            self.rest = &self.rest[pos + 1..];
            self.count += 1;
            Segment::Marker(self.count)
        };

        if text.is_empty() {
            Some(seg)
        } else {
            self.pending = Some(seg);
            Some(Segment::Text(text))
        }
    }
}

/// Copy `sql` into `buf`, calling `replace` for every marker with its 1-based
/// index. The callback is responsible for writing whatever takes the marker's
/// place (a `?`, a nested expression, ...). Escaped `??` is copied unchanged.
pub(crate) fn rewrite_placeholders<F>(sql: &str, buf: &mut SqlBuf, mut replace: F) -> SqlResult<()>
where
    F: FnMut(&mut SqlBuf, usize) -> SqlResult<()>,
{
    for seg in segments(sql) {
        match seg {
            Segment::Text(text) => buf.push_str(text),
            Segment::Escaped => buf.push_str("??"),
            Segment::Marker(i) => replace(buf, i)?,
        }
    }
    Ok(())
}

/// Count the markers in `sql` (escaped `??` excluded).
pub fn count_placeholders(sql: &str) -> usize {
    segments(sql)
        .filter(|seg| matches!(seg, Segment::Marker(_)))
        .count()
}

/// `n` comma-separated markers: `?,?,?`.
///
/// # Example
/// ```ignore
/// select(&[]).column(format!("IF(d IN ({}), 1, 0)", placeholders(3)), args![1, 2, 3]);
/// ```
pub fn placeholders(n: usize) -> String {
    let mut out = String::with_capacity(n.saturating_mul(2));
    for i in 0..n {
        if i > 0 {
            out.push(',');
        }
        out.push('?');
    }
    out
}

/// Placeholder style of the final SQL text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderFormat {
    /// `?` markers, text returned unchanged.
    #[default]
    Question,
    /// Postgres style `$1, $2, ...`; `??` becomes a literal `?`.
    Dollar,
}

impl PlaceholderFormat {
    /// Restyle the markers of a fully compiled statement.
    pub fn replace_placeholders(&self, sql: &str) -> String {
        match self {
            PlaceholderFormat::Question => sql.to_string(),
            PlaceholderFormat::Dollar => {
                let mut out = String::with_capacity(sql.len() + 8);
                for seg in segments(sql) {
                    match seg {
                        Segment::Text(text) => out.push_str(text),
                        Segment::Escaped => out.push('?'),
                        Segment::Marker(i) => {
                            out.push('$');
                            out.push_str(&i.to_string());
                        }
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_markers_and_escapes() {
        let segs: Vec<_> = segments("a = ? AND b ?? c AND d = ?").collect();
        assert_eq!(
            segs,
            vec![
                Segment::Text("a = "),
                Segment::Marker(1),
                Segment::Text(" AND b "),
                Segment::Escaped,
                Segment::Text(" c AND d = "),
                Segment::Marker(2),
            ]
        );
    }

    #[test]
    fn adjacent_markers() {
        let segs: Vec<_> = segments("?,?").collect();
        assert_eq!(
            segs,
            vec![Segment::Marker(1), Segment::Text(","), Segment::Marker(2)]
        );
        assert_eq!(segments("").count(), 0);
    }

    #[test]
    fn counts_only_real_markers() {
        assert_eq!(count_placeholders("x = ? AND y ?? z AND w IN (?,?)"), 3);
        assert_eq!(count_placeholders("no markers"), 0);
    }

    #[test]
    fn placeholders_list() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
    }

    #[test]
    fn question_format_keeps_text() {
        let sql = "SELECT test WHERE x = ? AND y = ?";
        assert_eq!(PlaceholderFormat::Question.replace_placeholders(sql), sql);
    }

    #[test]
    fn dollar_format_numbers_markers() {
        assert_eq!(
            PlaceholderFormat::Dollar.replace_placeholders("SELECT test WHERE x = ? AND y = ?"),
            "SELECT test WHERE x = $1 AND y = $2"
        );
        assert_eq!(
            PlaceholderFormat::Dollar.replace_placeholders("data ?? 'key' AND id IN (?,?)"),
            "data ? 'key' AND id IN ($1,$2)"
        );

        let sql = vec!["?"; 12].join(",");
        assert_eq!(
            PlaceholderFormat::Dollar.replace_placeholders(&sql),
            "$1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12"
        );
    }

    #[test]
    fn rewrite_calls_back_per_marker() {
        let mut buf = SqlBuf::new();
        let mut seen = Vec::new();
        rewrite_placeholders("a ?? ? b ?", &mut buf, |buf, i| {
            seen.push(i);
            buf.push_str("<x>");
            Ok(())
        })
        .unwrap();
        assert_eq!(buf.sql(), "a ?? <x> b <x>");
        assert_eq!(seen, vec![1, 2]);
    }
}
