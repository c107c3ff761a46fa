//! RFC 4180 CSV tables.
//!
//! A [`CsvTable`] is a header row plus rectangular string rows. Quoted
//! fields may contain commas, doubled quotes and line breaks. Blank lines
//! are skipped, so a trailing newline (or several) is harmless.

use crate::{Error, Result};
use dosimeter_analysis::{admissible_count, reduce_homogeneous, truncate};
use std::fmt::Write as _;
use std::path::Path;

/// Header plus rows of string cells, every row as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Read and parse a CSV file.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<CsvTable> {
    let text = std::fs::read_to_string(path)?;
    CsvTable::parse(&text)
}

/// Write a table to a CSV file, replacing any existing file.
pub fn write_csv<P: AsRef<Path>>(path: P, table: &CsvTable) -> Result<()> {
    std::fs::write(path, table.to_csv_string())?;
    Ok(())
}

fn csv_error(line: usize, reason: impl Into<String>) -> Error {
    Error::Csv {
        line,
        reason: reason.into(),
    }
}

impl CsvTable {
    /// Build a table, checking every row against the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some(i) = rows.iter().position(|r| r.len() != headers.len()) {
            // +2: 1-based, after the header line
            return Err(csv_error(
                i + 2,
                format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    rows[i].len()
                ),
            ));
        }
        Ok(Self { headers, rows })
    }

    /// Parse CSV text. The first record is the header.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_records(text)?.into_iter();

        let Some((_, headers)) = records.next() else {
            return Err(csv_error(1, "missing header row"));
        };

        let mut rows = Vec::new();
        for (line, record) in records {
            if record.len() != headers.len() {
                return Err(csv_error(
                    line,
                    format!(
                        "expected {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                ));
            }
            rows.push(record);
        }

        Ok(Self { headers, rows })
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of the column called `name`.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Numeric values of the column called `name`.
    ///
    /// Surrounding whitespace is ignored; empty cells are parse errors.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::ParseNumber {
                        row,
                        column: name.to_string(),
                        value: cell.to_string(),
                    })
            })
            .collect()
    }

    /// First `m` rows with every column, or the whole table when it is shorter.
    pub fn truncated(&self, m: usize) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: truncate(&self.rows, m).rows().to_vec(),
        }
    }

    /// Prefix of admissible `25 + 6k` length, plus whether any rows were cut.
    pub fn truncated_to_admissible(&self) -> Result<(Self, bool)> {
        let m = admissible_count(self.len())?;
        let cut = truncate(&self.rows, m);
        let table = Self {
            headers: self.headers.clone(),
            rows: cut.rows().to_vec(),
        };
        Ok((table, cut.is_truncated()))
    }

    /// Rows kept by homogeneous thinning of `percent` percent, truncated to an
    /// admissible length.
    pub fn reduced(&self, percent: f64) -> Result<Self> {
        Ok(Self {
            headers: self.headers.clone(),
            rows: reduce_homogeneous(&self.rows, percent)?,
        })
    }

    /// Serialize as CSV text with `\n` line endings.
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, &self.headers);
        for row in &self.rows {
            write_record(&mut out, row);
        }
        out
    }
}

fn write_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // a lone empty field would read back as a blank line
        if field.contains([',', '"', '\n', '\r']) || (fields.len() == 1 && field.is_empty()) {
            let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Split text into records, each tagged with the line it starts on.
fn parse_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            '"' => return Err(csv_error(line, "unexpected quote in field")),
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                // a blank line has no separator and no quoted field
                let blank = record.is_empty() && field.is_empty() && !quoted;
                if !blank {
                    record.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut record)));
                }
                quoted = false;
                line += 1;
                record_line = line;
            }
            _ if quoted => {
                return Err(csv_error(line, "characters after closing quote"));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(csv_error(record_line, "unterminated quoted field"));
    }
    if quoted || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push((record_line, record));
    }

    Ok(records)
}
