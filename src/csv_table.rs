//! Minimal CSV table reader.
//!
//! Reads a whole CSV export into memory as a header row plus string records.
//! Double-quoted fields are honoured, including embedded commas, doubled
//! quotes (`""`) and line breaks, so an AmScope `Length` cell such as
//! `"8.0,3.0"` arrives as a single field. Blank lines are skipped.

use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// A parsed CSV file: the header row and every data record, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl CsvTable {
    /// Builds a table from already split rows; mostly useful for tests and
    /// callers that obtained their rows elsewhere.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// Position of `name` in the header row, ignoring surrounding whitespace
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads and splits a CSV file.
///
/// The first non-blank record is taken as the header row. A file with no
/// header at all yields an empty table.
///
/// # Arguments
///
/// * `input_file_path` - Path to the CSV file
///
/// # Returns
///
/// * `Result<CsvTable>` - The parsed table, or an IO error
pub fn read_csv_table(input_file_path: impl AsRef<Path>) -> Result<CsvTable> {
    let file = File::open(input_file_path.as_ref())?;
    let reader = BufReader::new(file);

    let mut rows: Vec<Vec<String>> = Vec::new();
    // Holds a record whose quoted field spans several physical lines
    let mut pending = String::new();

    for line_result in reader.lines() {
        let line = line_result?;

        if pending.is_empty() {
            pending = line;
        } else {
            pending.push('\n');
            pending.push_str(&line);
        }

        if scan_record(&pending).1 {
            continue;
        }

        let record = std::mem::take(&mut pending);
        if record.trim().is_empty() {
            continue;
        }
        rows.push(parse_csv_line(&record));
    }

    if !pending.is_empty() {
        warn!("Unterminated quoted field at end of {:?}", input_file_path.as_ref());
        rows.push(parse_csv_line(&pending));
    }

    let mut rows = rows.into_iter();
    let Some(mut headers) = rows.next() else {
        return Ok(CsvTable::default());
    };

    // Spreadsheet exports often lead with a UTF-8 byte order mark
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let records: Vec<Vec<String>> = rows.collect();
    debug!(
        "Read {} columns and {} records from {:?}",
        headers.len(),
        records.len(),
        input_file_path.as_ref()
    );

    Ok(CsvTable { headers, records })
}

/// Splits one logical CSV record into fields.
///
/// Quoted fields have their enclosing quotes removed and `""` collapsed to
/// `"`. A quote only opens a quoted section at the start of a field;
/// elsewhere it is an ordinary character, so `5" slide` stays as written.
/// Whitespace is preserved; callers trim where they need to.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    scan_record(line).0
}

/// Splits `text` into fields and reports whether it ends inside an open
/// quoted field, i.e. whether the record continues on the next line.
fn scan_record(text: &str) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }
    fields.push(field);

    (fields, in_quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn splits_plain_fields() {
        assert_eq!(parse_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(parse_csv_line(""), vec![""]);
    }

    #[test]
    fn keeps_commas_inside_quotes() {
        assert_eq!(
            parse_csv_line(r#"1,"8.0,3.0",µm"#),
            vec!["1", "8.0,3.0", "µm"]
        );
    }

    #[test]
    fn collapses_doubled_quotes() {
        assert_eq!(
            parse_csv_line(r#""say ""hi""",x"#),
            vec![r#"say "hi""#, "x"]
        );
    }

    #[test]
    fn quote_inside_unquoted_field_is_literal() {
        assert_eq!(
            parse_csv_line(r#"S1,"8.0,3.0",5" slide"#),
            vec!["S1", "8.0,3.0", r#"5" slide"#]
        );
        assert_eq!(
            parse_csv_line(r#"5" slide,"8.0,3.0""#),
            vec![r#"5" slide"#, "8.0,3.0"]
        );
    }

    #[test]
    fn inch_marks_in_last_column_keep_rows_apart() {
        let file = write_csv(concat!(
            "Name,Length,Note\n",
            "S1,\"8.0,3.0\",5\" slide\n",
            "S2,\"10.0,4.0\",6\" slide\n",
            "S3,\"9.0,3.5\",\n",
            "S4,\"9.5,3.6\",\n",
        ));
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.records[0], vec!["S1", "8.0,3.0", r#"5" slide"#]);
        assert_eq!(table.records[1], vec!["S2", "10.0,4.0", r#"6" slide"#]);
    }

    #[test]
    fn inch_marks_in_first_column_keep_rows_apart() {
        let file = write_csv(concat!(
            "Note,Length\n",
            "5\" slide,\"8.0,3.0\"\n",
            "S2,\"10.0,4.0\"\n",
            "S3,\"9.0,3.5\"\n",
        ));
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.records[0], vec![r#"5" slide"#, "8.0,3.0"]);
        assert_eq!(table.records[2], vec!["S3", "9.0,3.5"]);
    }

    #[test]
    fn reads_header_and_records() {
        let file = write_csv("Name,Length\r\nS1,\"8.0,3.0\"\r\n\r\nS2,\"10.0, 4.0\"\r\n");
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.headers, vec!["Name", "Length"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1], vec!["S2", "10.0, 4.0"]);
        assert_eq!(table.column_index("Length"), Some(1));
        assert_eq!(table.column_index("Width"), None);
    }

    #[test]
    fn strips_byte_order_mark() {
        let file = write_csv("\u{feff}Length\n\"8.0,3.0\"\n");
        let table = read_csv_table(file.path()).unwrap();
        assert_eq!(table.column_index("Length"), Some(0));
    }

    #[test]
    fn joins_quoted_field_across_lines() {
        let file = write_csv("Note,Length\n\"two\nlines\",\"9.0,3.5\"\n");
        let table = read_csv_table(file.path()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0], vec!["two\nlines", "9.0,3.5"]);
    }

    #[test]
    fn empty_file_gives_empty_table() {
        let file = write_csv("");
        let table = read_csv_table(file.path()).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_csv_table("/definitely/not/here.csv");
        assert!(matches!(result, Err(crate::error::AnalyzerError::Io(_))));
    }
}
