//! Spreadsheet encoding
//!
//! The workbook format sits behind [`WorkbookCodec`]. The built-in codec
//! writes an Excel 2003 XML workbook, which spreadsheet applications open as
//! a legacy `.xls` file.

use crate::domain::tabular::{row, COLUMNS};
use crate::domain::Entry;
use crate::error::Result;

/// One sheet of header plus rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(i64),
}

impl Sheet {
    /// The fixed five-column entry sheet
    pub fn from_entries(name: &str, entries: &[Entry]) -> Self {
        let rows = entries
            .iter()
            .map(|entry| {
                let [date_iso, day, notes, _, id] = row(entry);
                vec![
                    Cell::Text(date_iso),
                    Cell::Text(day),
                    Cell::Text(notes),
                    Cell::Number(entry.last_updated),
                    Cell::Text(id),
                ]
            })
            .collect();

        Sheet {
            name: name.to_string(),
            header: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

/// Serializer from a sheet to workbook bytes
pub trait WorkbookCodec {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>>;
}

/// Excel 2003 XML spreadsheet
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetXml;

impl WorkbookCodec for SpreadsheetXml {
    fn extension(&self) -> &'static str {
        "xls"
    }

    fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>> {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<?mso-application progid=\"Excel.Sheet\"?>\n");
        out.push_str(
            "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
             xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">\n",
        );
        out.push_str(&format!(
            " <Worksheet ss:Name=\"{}\">\n  <Table>\n",
            escape_xml(&sheet.name)
        ));

        let header: Vec<Cell> = sheet.header.iter().cloned().map(Cell::Text).collect();
        push_row(&mut out, &header);
        for cells in &sheet.rows {
            push_row(&mut out, cells);
        }

        out.push_str("  </Table>\n </Worksheet>\n</Workbook>\n");
        Ok(out.into_bytes())
    }
}

fn push_row(out: &mut String, cells: &[Cell]) {
    out.push_str("   <Row>\n");
    for cell in cells {
        match cell {
            Cell::Text(text) => out.push_str(&format!(
                "    <Cell><Data ss:Type=\"String\">{}</Data></Cell>\n",
                escape_xml(text)
            )),
            Cell::Number(n) => out.push_str(&format!(
                "    <Cell><Data ss:Type=\"Number\">{}</Data></Cell>\n",
                n
            )),
        }
    }
    out.push_str("   </Row>\n");
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            c => escaped.push(c),
        }
    }
    escaped
}
