//! Tabular extractor for CSV and XLSX uploads.
//!
//! The first row is treated as the header. The rendering mimics a dataframe
//! dump: right-aligned columns separated by two spaces, each data row
//! prefixed with its zero-based index.

use crate::types::{AppError, AppResult};
use calamine::{open_workbook_from_rs, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::debug;

/// Rows/columns read from an upload, all cells as strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Extract and render a table; `extension` selects the reader
pub fn extract(bytes: &[u8], extension: &str) -> AppResult<String> {
    let table = match extension {
        "xlsx" => read_xlsx(bytes)?,
        _ => read_csv(bytes)?,
    };

    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Parsed tabular upload"
    );
    Ok(render(&table))
}

pub fn read_csv(bytes: &[u8]) -> AppResult<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::Decode(format!("Failed to read CSV header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| AppError::Decode(format!("Failed to read CSV row: {e}")))?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(Table { headers, rows })
}

/// Read the first worksheet of an XLSX workbook
pub fn read_xlsx(bytes: &[u8]) -> AppResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::Decode(format!("Failed to open workbook: {e}")))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Decode("Workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| AppError::Decode(format!("Failed to read worksheet '{sheet}': {e}")))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

    let headers = rows.next().unwrap_or_default();
    Ok(Table {
        headers,
        rows: rows.collect(),
    })
}

/// Render a table as aligned text
pub fn render(table: &Table) -> String {
    if table.rows.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            table.headers.join(", ")
        );
    }

    let columns = table
        .rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);

    let cell = |row: &[String], col: usize| -> String { row.get(col).cloned().unwrap_or_default() };

    let index_width = (table.rows.len() - 1).to_string().len();
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            table
                .rows
                .iter()
                .map(|r| cell(r, col).chars().count())
                .chain(std::iter::once(cell(&table.headers, col).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (col, width) in widths.iter().enumerate() {
        out.push_str(&format!("  {:>width$}", cell(&table.headers, col), width = width));
    }

    for (idx, row) in table.rows.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{:<width$}", idx, width = index_width));
        for (col, width) in widths.iter().enumerate() {
            out.push_str(&format!("  {:>width$}", cell(row, col), width = width));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_csv_header_and_row() {
        let rendered = extract(b"a,b\n1,2\n", "csv").unwrap();
        assert_eq!(rendered, "   a  b\n0  1  2");

        let header_pos = rendered.find('a').unwrap();
        assert!(header_pos < rendered.find('b').unwrap());
        assert!(rendered.find('b').unwrap() < rendered.find('1').unwrap());
        assert!(rendered.find('1').unwrap() < rendered.find('2').unwrap());
    }

    #[test]
    fn test_columns_are_right_aligned() {
        let rendered = extract(b"name,qty\nwidget,3\nx,12\n", "csv").unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "     name  qty");
        assert_eq!(lines[1], "0  widget    3");
        assert_eq!(lines[2], "1       x   12");
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = read_csv(b"a,b,c\n1\n2,3,4\n").unwrap();
        assert_eq!(table.rows[0], vec!["1".to_string()]);
        let rendered = render(&table);
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_header_only_csv() {
        let rendered = extract(b"a,b\n", "csv").unwrap();
        assert_eq!(rendered, "Empty DataFrame\nColumns: [a, b]\nIndex: []");
    }

    #[test]
    fn test_invalid_utf8_csv() {
        let err = extract(&[b'a', b',', 0xFF, b'\n'], "csv").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    fn create_test_xlsx() -> Vec<u8> {
        let files = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#,
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
            ),
            (
                "xl/worksheets/sheet1.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>gene</t></is></c><c r="B1" t="inlineStr"><is><t>count</t></is></c></row><row r="2"><c r="A2" t="inlineStr"><is><t>tp53</t></is></c><c r="B2"><v>7</v></c></row></sheetData></worksheet>"#,
            ),
        ];

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in files {
            writer.start_file(name, FileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_xlsx_first_sheet() {
        let table = read_xlsx(&create_test_xlsx()).unwrap();
        assert_eq!(table.headers, vec!["gene".to_string(), "count".to_string()]);
        assert_eq!(table.rows, vec![vec!["tp53".to_string(), "7".to_string()]]);

        let rendered = extract(&create_test_xlsx(), "xlsx").unwrap();
        assert!(rendered.contains("gene"));
        assert!(rendered.contains("tp53"));
    }

    #[test]
    fn test_invalid_xlsx() {
        let err = extract(b"not a workbook", "xlsx").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
