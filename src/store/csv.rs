//! Directory of CSV files, one `<worksheet>.csv` per worksheet.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::{Row, Sheet, TabularStore};
use crate::error::StoreError;
use crate::utils::debug_log;

#[derive(Debug, Clone)]
pub(crate) struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn worksheet_path(&self, worksheet: &str) -> PathBuf {
        self.dir.join(format!("{worksheet}.csv"))
    }
}

impl TabularStore for CsvStore {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn read(&self, worksheet: &str) -> Result<Sheet, StoreError> {
        let start = Instant::now();
        let path = self.worksheet_path(worksheet);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::missing_worksheet(worksheet));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let sheet = parse_sheet(&content)?;
        debug_log(format!(
            "read {} rows from {} ({:.2}ms)",
            sheet.rows.len(),
            path.display(),
            start.elapsed().as_secs_f64() * 1000.0
        ));
        Ok(sheet)
    }

    fn update(&self, worksheet: &str, sheet: &Sheet) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        let path = self.worksheet_path(worksheet);
        write_atomically(&path, &render_sheet(sheet))?;
        debug_log(format!("wrote {} rows to {}", sheet.rows.len(), path.display()));
        Ok(())
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub(crate) fn render_sheet(sheet: &Sheet) -> String {
    let mut out = String::new();
    let header: Vec<String> = sheet.columns.iter().map(|c| csv_escape(c)).collect();
    let _ = writeln!(out, "{}", header.join(","));
    for row in &sheet.rows {
        let cells: Vec<String> = sheet
            .columns
            .iter()
            .map(|c| csv_escape(row.get(c).map(String::as_str).unwrap_or("")))
            .collect();
        let _ = writeln!(out, "{}", cells.join(","));
    }
    out
}

/// Parse CSV text into a sheet. The first record is the header; empty cells
/// are left out of the row map.
pub(crate) fn parse_sheet(content: &str) -> Result<Sheet, StoreError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = parse_records(content)?.into_iter();

    let Some((_, header)) = records.next() else {
        return Ok(Sheet::default());
    };
    let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();
    let mut sheet = Sheet::with_columns(columns);

    for (line, fields) in records {
        if fields.len() > sheet.columns.len()
            && fields[sheet.columns.len()..].iter().any(|f| !f.is_empty())
        {
            return Err(StoreError::Csv {
                line,
                reason: format!(
                    "{} fields but the header has {}",
                    fields.len(),
                    sheet.columns.len()
                ),
            });
        }
        let row: Row = sheet
            .columns
            .iter()
            .zip(fields)
            .filter(|(_, value)| !value.is_empty())
            .map(|(column, value)| (column.clone(), value))
            .collect();
        sheet.rows.push(row);
    }
    Ok(sheet)
}

/// Split CSV text into records, tagging each with the line it started on.
/// Blank lines are skipped.
fn parse_records(content: &str) -> Result<Vec<(usize, Vec<String>)>, StoreError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted_field = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

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
            '"' if field.is_empty() && !quoted_field => {
                in_quotes = true;
                quoted_field = true;
            }
            '"' => {
                return Err(StoreError::Csv {
                    line,
                    reason: "stray quote inside an unquoted field".to_string(),
                });
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                record_line = line;
            }
            _ => {
                if quoted_field {
                    return Err(StoreError::Csv {
                        line,
                        reason: "text after a closing quote".to_string(),
                    });
                }
                field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(StoreError::Csv {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() || quoted_field {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_header_and_rows() {
        let sheet = parse_sheet(
            "name,completed_at,registered_date\nAlice,2025-06-02 09:00:00,2025-06-02\n",
        )
        .unwrap();
        assert_eq!(sheet.columns, vec!["name", "completed_at", "registered_date"]);
        assert_eq!(
            sheet.rows,
            vec![row(&[
                ("name", "Alice"),
                ("completed_at", "2025-06-02 09:00:00"),
                ("registered_date", "2025-06-02"),
            ])]
        );
    }

    #[test]
    fn handles_quotes_commas_and_newlines() {
        let sheet = parse_sheet("name,note\r\n\"Kim, Chul-soo\",\"said \"\"hi\"\"\nthen left\"\r\n")
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0]["name"], "Kim, Chul-soo");
        assert_eq!(sheet.rows[0]["note"], "said \"hi\"\nthen left");
    }

    #[test]
    fn strips_bom_and_skips_blank_lines() {
        let sheet = parse_sheet("\u{feff}이름,완료시간\n\n홍길동,2025-06-02 10:00:00\n\n").unwrap();
        assert_eq!(sheet.columns, vec!["이름", "완료시간"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0]["이름"], "홍길동");
    }

    #[test]
    fn short_rows_leave_cells_absent() {
        let sheet = parse_sheet("name,completed_at\nBob\n").unwrap();
        assert_eq!(sheet.rows[0].get("completed_at"), None);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let sheet = parse_sheet("name\nAlice\nBob").unwrap();
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_sheet("name\n\"Alice\n").unwrap_err();
        assert!(matches!(err, StoreError::Csv { line: 2, .. }));
    }

    #[test]
    fn extra_non_empty_fields_are_an_error() {
        let err = parse_sheet("name\nAlice,surprise\n").unwrap_err();
        assert!(matches!(err, StoreError::Csv { line: 2, .. }));
        assert!(parse_sheet("name\nAlice,,\n").is_ok());
    }

    #[test]
    fn empty_file_is_an_empty_sheet() {
        assert!(parse_sheet("").unwrap().is_empty());
    }

    #[test]
    fn render_escapes_and_orders_by_header() {
        let mut sheet = Sheet::with_columns(["name", "completed_at"]);
        sheet.rows.push(row(&[("completed_at", "2025-06-02 10:00:00"), ("name", "Lee, Ann")]));
        sheet.rows.push(row(&[("name", "Bob")]));
        assert_eq!(
            render_sheet(&sheet),
            "name,completed_at\n\"Lee, Ann\",2025-06-02 10:00:00\nBob,\n"
        );
    }

    #[test]
    fn store_roundtrip_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("board"));
        assert!(matches!(
            store.read("Sheet1"),
            Err(StoreError::MissingWorksheet { .. })
        ));

        let mut sheet = Sheet::with_columns(["name", "completed_at", "registered_date"]);
        sheet.rows.push(row(&[
            ("name", "Alice"),
            ("completed_at", "2025-06-02 09:00:00"),
            ("registered_date", "2025-06-02"),
        ]));
        store.update("Sheet1", &sheet).unwrap();

        assert_eq!(store.read("Sheet1").unwrap(), sheet);
        assert!(!store.worksheet_path("Sheet1").with_extension("csv.tmp").exists());
    }
}
