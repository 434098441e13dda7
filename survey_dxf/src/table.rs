//! Minimal CSV tables: reading uploads, merging schemas and writing output.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Column added to merged point tables holding the source file base name.
pub const LAYER_COLUMN: &str = "Layer";

/// How the column sets of several uploads are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMerge {
    /// First file's columns, then columns first seen in later files.
    #[default]
    Union,
    /// Only the first file's columns, in order. Extra columns of later files
    /// are dropped and columns they lack are blank, as a reindex on the first
    /// header would do. Selected with `schema_merge = "first_file"`.
    FirstFile,
}

/// Ordered list of column names with a lookup index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for c in columns {
            schema.push(c);
        }
        schema
    }

    /// Appends a column unless it is already present. Returns its index.
    pub fn push<S: Into<String>>(&mut self, column: S) -> usize {
        let column = column.into();
        if let Some(&idx) = self.index.get(&column) {
            return idx;
        }
        self.index.insert(column.clone(), self.columns.len());
        self.columns.push(column);
        self.columns.len() - 1
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A parsed CSV upload: header plus string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Schema,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    schema: &'a Schema,
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell value for `column`, `None` when the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.schema
            .index_of(column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}

impl Table {
    /// Creates a table from already split cells. Rows are padded or cut to
    /// the header width.
    pub fn new(name: &str, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let schema = Schema::new(columns);
        let width = schema.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        Self {
            name: name.to_string(),
            schema,
            rows,
        }
    }

    /// Parses CSV text. The first non-blank record is the header. Quoted
    /// fields may span lines.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = split_records(text).into_iter();
        let header = records.next().ok_or_else(|| ConvertError::Csv {
            file: name.to_string(),
            message: "missing header row".to_string(),
        })?;
        let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();
        let width = columns.len();
        let mut rows = Vec::new();
        for (idx, fields) in records.enumerate() {
            if fields.len() > width {
                log::debug!(
                    "{}: data row {} has {} fields, header has {}",
                    name,
                    idx + 1,
                    fields.len(),
                    width
                );
            }
            rows.push(fields);
        }
        Ok(Self::new(name, columns, rows))
    }

    /// Parses raw upload bytes, which must be UTF-8.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| ConvertError::Csv {
            file: name.to_string(),
            message: e.to_string(),
        })?;
        Self::parse(name, text)
    }

    /// Reads a CSV file. The table is named after the file stem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("default");
        let bytes = std::fs::read(path)?;
        Self::from_bytes(name, &bytes)
    }

    /// Base name of the upload this table came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.schema.contains(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            schema: &self.schema,
            values,
        })
    }

    /// Writes the table as CSV, header first.
    pub fn write_csv<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        write_record(writer, self.columns())?;
        for row in &self.rows {
            write_record(writer, row)?;
        }
        Ok(())
    }
}

/// Merges several uploads into one table and tags every row with the base
/// name of its file in the [`LAYER_COLUMN`].
///
/// The first table's columns set the order. Cells for columns a file does
/// not have are empty strings.
pub fn harmonize(tables: &[Table], merge: SchemaMerge) -> Table {
    let mut schema = Schema::default();
    for (i, table) in tables.iter().enumerate() {
        if i == 0 || merge == SchemaMerge::Union {
            for column in table.columns() {
                schema.push(column.as_str());
            }
        }
    }
    let layer_idx = schema.push(LAYER_COLUMN);

    let mut rows = Vec::new();
    for table in tables {
        let mapping: Vec<Option<usize>> = schema
            .columns()
            .iter()
            .map(|c| table.schema.index_of(c))
            .collect();
        for values in &table.rows {
            let mut out: Vec<String> = mapping
                .iter()
                .map(|m| m.and_then(|i| values.get(i)).cloned().unwrap_or_default())
                .collect();
            out[layer_idx] = table.name.clone();
            rows.push(out);
        }
    }
    Table {
        name: "combined".to_string(),
        schema,
        rows,
    }
}

/// Splits CSV text into records, honouring double quotes and `""` escapes.
/// Line breaks inside quotes belong to the field. Blank lines are skipped.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                push_record(&mut records, std::mem::take(&mut fields));
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        push_record(&mut records, fields);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(fields);
    }
}

/// Writes one CSV record, quoting fields that need it.
pub(crate) fn write_record<W, S>(writer: &mut W, fields: &[S]) -> std::io::Result<()>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    let line = fields
        .iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", line)
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_quotes() {
        assert_eq!(
            split_records(r#"1,"Fence, north","say ""hi""",x"#),
            vec![vec!["1", "Fence, north", r#"say "hi""#, "x"]]
        );
        assert_eq!(
            split_records("a,,b\r\nc,d,\n"),
            vec![vec!["a", "", "b"], vec!["c", "d", ""]]
        );
    }

    #[test]
    fn quoted_line_breaks_stay_in_the_field() {
        let csv = "ID,Latitude,Longitude,Elevation,Remarks\n\
                   1,38.9,-77.0,10.0,\"IP found\nnear fence\"\n\
                   2,38.8,-77.1,11.0,gate\n";
        let t = Table::parse("pts", csv).unwrap();
        assert_eq!(t.len(), 2);
        let remarks: Vec<_> = t
            .rows()
            .map(|r| r.get("Remarks").unwrap_or_default().to_string())
            .collect();
        assert_eq!(remarks, ["IP found\nnear fence", "gate"]);
    }

    #[test]
    fn written_tables_parse_back() {
        let t = Table::new(
            "out",
            vec!["Name".into(), "Remarks".into()],
            vec![
                vec!["A".into(), "two\nlines, \"quoted\"".into()],
                vec!["B".into(), "plain".into()],
            ],
        );
        let mut buf = Vec::new();
        t.write_csv(&mut buf).unwrap();
        let back = Table::from_bytes("out", &buf).unwrap();
        assert_eq!(back.columns(), t.columns());
        let rows: Vec<_> = back.rows().map(|r| r.values().to_vec()).collect();
        let expected: Vec<_> = t.rows().map(|r| r.values().to_vec()).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn parse_pads_short_rows_and_strips_bom() {
        let csv = "\u{feff}ID,Latitude,Remarks\n1,38.9\n\n2,38.8,gate\n";
        let t = Table::parse("pts", csv).unwrap();
        assert_eq!(t.columns(), ["ID", "Latitude", "Remarks"]);
        assert_eq!(t.len(), 2);
        let first = t.rows().next().unwrap();
        assert_eq!(first.get("Remarks"), Some(""));
        assert_eq!(first.get("Missing"), None);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            Table::parse("empty", "\n\n"),
            Err(ConvertError::Csv { .. })
        ));
    }

    #[test]
    fn harmonize_first_file_drops_extra_columns() {
        let a = Table::parse("a", "ID,Latitude\n1,38.9\n").unwrap();
        let b = Table::parse("b", "Latitude,Extra\n38.8,x\n").unwrap();
        let merged = harmonize(&[a, b], SchemaMerge::FirstFile);
        assert_eq!(merged.columns(), ["ID", "Latitude", "Layer"]);
        let rows: Vec<_> = merged.rows().map(|r| r.values().to_vec()).collect();
        assert_eq!(rows[1], vec!["", "38.8", "b"]);
    }

    #[test]
    fn write_quotes_when_needed() {
        let t = Table::new(
            "out",
            vec!["Name".into(), "Remarks".into()],
            vec![vec!["A".into(), "edge, \"old\"".into()]],
        );
        let mut buf = Vec::new();
        t.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Name,Remarks\nA,\"edge, \"\"old\"\"\"\n"
        );
    }
}
