//! # Table — Fixed-Schema Tabular Data
//!
//! The in-memory table type shared by every fetcher and by the walk driver.
//! A `Table` carries a fixed column list declared up front and rows of
//! typed `Field` cells, one cell per column, always — a response that
//! omitted a field yields `Field::Null` in that column, never a ragged row.
//! Downstream consumers concatenate tables row-wise and index columns by
//! name, so the column set must be identical across every table produced
//! for the same domain.
//!
//! Also hosts the row-wise `concat`, the `left_join` used to attach
//! membership codes to account rows, and CSV export.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A single typed cell value. Timestamps and derived ids are `Int`,
/// everything else is `Str`, absent data is `Null`.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Null,
    Int(i64),
    Str(String),
}

impl Field {
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Field::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Null => Ok(()),
            Field::Int(v) => write!(f, "{}", v),
            Field::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Int(v)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Str(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Str(s)
    }
}

impl From<Option<String>> for Field {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(s) => Field::Str(s),
            None => Field::Null,
        }
    }
}

/// A fixed-schema table: a declared column list and rows of `Field` cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Field>>,
}

impl Table {
    /// An empty table carrying the declared schema. This is what an
    /// all-failed fetch batch returns: zero rows, full column set.
    pub fn empty(columns: &[&str]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append one row. The row must match the declared column count.
    pub fn push_row(&mut self, row: Vec<Field>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Cell lookup by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Field> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Vec<&Field> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| &r[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Keep only rows satisfying the predicate.
    pub fn retain_rows<F: FnMut(&[Field]) -> bool>(&mut self, mut pred: F) {
        self.rows.retain(|r| pred(r));
    }

    /// Rewrite one column in place. No-op if the column is not declared.
    pub fn map_column<F: FnMut(&Field) -> Field>(&mut self, name: &str, mut f: F) {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
    }

    /// Row-wise concatenation of same-schema tables. Zero inputs (or all
    /// empty) produce an empty table with the declared schema, so callers
    /// never have to special-case a batch where every fetch failed.
    pub fn concat<I: IntoIterator<Item = Table>>(columns: &[&str], tables: I) -> Table {
        let mut out = Table::empty(columns);
        for t in tables {
            debug_assert_eq!(t.columns, out.columns);
            out.rows.extend(t.rows);
        }
        out
    }

    /// Left join on a shared key column: every row of `self` survives, and
    /// gains the non-key columns of the first matching row in `other`
    /// (`Null`s when there is no match).
    pub fn left_join(&self, other: &Table, on: &str) -> Table {
        let other_key = other.column_index(on);
        let extra: Vec<(usize, &String)> = other
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() != on)
            .collect();

        let mut columns = self.columns.clone();
        columns.extend(extra.iter().map(|(_, c)| (*c).clone()));

        let mut rows = Vec::with_capacity(self.rows.len());
        let self_key = self.column_index(on);
        for row in &self.rows {
            let mut joined = row.clone();
            let matched = match (self_key, other_key) {
                (Some(sk), Some(ok)) => {
                    other.rows.iter().find(|r| r[ok] == row[sk])
                }
                _ => None,
            };
            match matched {
                Some(m) => joined.extend(extra.iter().map(|(i, _)| m[*i].clone())),
                None => joined.extend(extra.iter().map(|_| Field::Null)),
            }
            rows.push(joined);
        }

        Table { columns, rows }
    }

    /// Write the table as CSV with a header row.
    pub fn to_csv<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_csv_row(w, self.columns.iter().map(|c| c.as_str()))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|f| f.to_string()).collect();
            write_csv_row(w, cells.iter().map(|c| c.as_str()))?;
        }
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.to_csv(&mut w)?;
        w.flush()
    }
}

fn write_csv_row<'a, I: Iterator<Item = &'a str>>(w: &mut impl Write, cells: I) -> io::Result<()> {
    let mut first = true;
    for cell in cells {
        if !first {
            write!(w, ",")?;
        }
        first = false;
        if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::empty(&["username", "rating"]);
        t.push_row(vec!["alice".into(), Field::Int(1500)]);
        t.push_row(vec!["bob".into(), Field::Null]);
        t
    }

    #[test]
    fn empty_table_keeps_schema() {
        let t = Table::empty(&["a", "b"]);
        assert_eq!(t.columns(), &["a".to_string(), "b".to_string()]);
        assert!(t.is_empty());
    }

    #[test]
    fn get_by_column_name() {
        let t = sample();
        assert_eq!(t.get(0, "rating"), Some(&Field::Int(1500)));
        assert_eq!(t.get(1, "rating"), Some(&Field::Null));
        assert_eq!(t.get(0, "missing"), None);
    }

    #[test]
    fn concat_of_nothing_is_empty_with_schema() {
        let t = Table::concat(&["a", "b"], std::iter::empty());
        assert_eq!(t.columns().len(), 2);
        assert!(t.is_empty());
    }

    #[test]
    fn concat_appends_rows_in_order() {
        let t = Table::concat(&["username", "rating"], vec![sample(), sample()]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.get(2, "username"), Some(&Field::Str("alice".into())));
    }

    #[test]
    fn left_join_attaches_matching_columns() {
        let accounts = sample();
        let mut membership = Table::empty(&["membership_code", "username"]);
        membership.push_row(vec!["premium".into(), "alice".into()]);

        let joined = accounts.left_join(&membership, "username");
        assert_eq!(
            joined.columns(),
            &["username".to_string(), "rating".to_string(), "membership_code".to_string()]
        );
        assert_eq!(joined.get(0, "membership_code"), Some(&Field::Str("premium".into())));
        // bob has no membership row: key column survives, payload is Null
        assert_eq!(joined.get(1, "membership_code"), Some(&Field::Null));
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn left_join_against_empty_table_fills_nulls() {
        let accounts = sample();
        let membership = Table::empty(&["membership_code", "username"]);
        let joined = accounts.left_join(&membership, "username");
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.get(0, "membership_code"), Some(&Field::Null));
    }

    #[test]
    fn retain_rows_filters() {
        let mut t = sample();
        t.retain_rows(|r| r[1] != Field::Null);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0, "username"), Some(&Field::Str("alice".into())));
    }

    #[test]
    fn map_column_rewrites_in_place() {
        let mut t = sample();
        t.map_column("rating", |f| match f.as_int() {
            Some(v) => Field::Int(v + 1),
            None => Field::Null,
        });
        assert_eq!(t.get(0, "rating"), Some(&Field::Int(1501)));
        assert_eq!(t.get(1, "rating"), Some(&Field::Null));
    }

    #[test]
    fn csv_escapes_separators_and_quotes() {
        let mut t = Table::empty(&["name", "note"]);
        t.push_row(vec!["a,b".into(), Field::Str("say \"hi\"".into())]);
        let mut buf = Vec::new();
        t.to_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name,note\n\"a,b\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn csv_renders_null_as_empty_cell() {
        let t = sample();
        let mut buf = Vec::new();
        t.to_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("bob,\n"));
    }
}
