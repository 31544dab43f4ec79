use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::ExtractError;
use crate::model::AssembledTable;

pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// File name for one page's export: `report.pdf`, page 3 and `xlsx` give
/// `report_pagina3.xlsx`.
///
/// Only one trailing `.pdf` (any case) is removed, so `a.pdf.pdf` keeps its
/// inner `.pdf` and `notes.pdf.txt` is left alone.
#[must_use]
pub fn export_file_name(file_name: &str, page: u32, extension: &str) -> String {
    let stem = file_name
        .len()
        .checked_sub(4)
        .filter(|&cut| file_name.is_char_boundary(cut))
        .filter(|&cut| file_name[cut..].eq_ignore_ascii_case(".pdf"))
        .map_or(file_name, |cut| &file_name[..cut]);
    format!("{stem}_pagina{page}.{extension}")
}

fn fill_worksheet(worksheet: &mut Worksheet, table: &AssembledTable) -> Result<(), ExtractError> {
    let records = std::iter::once(table.header()).chain(table.rows().iter().map(Vec::as_slice));
    for (row_index, record) in records.enumerate() {
        let row = u32::try_from(row_index)
            .map_err(|_| ExtractError::InvalidTable("too many rows for a worksheet".to_string()))?;
        for (col_index, cell) in record.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let col = u16::try_from(col_index).map_err(|_| {
                ExtractError::InvalidTable("too many columns for a worksheet".to_string())
            })?;
            worksheet.write_string(row, col, cell.as_str())?;
        }
    }
    Ok(())
}

fn build_workbook(table: &AssembledTable, sheet_name: &str) -> Result<Workbook, ExtractError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;
    fill_worksheet(worksheet, table)?;
    Ok(workbook)
}

/// Encodes the table as an in-memory workbook. The header is row 0, the
/// body follows, and every cell is written as text.
pub fn xlsx_bytes(table: &AssembledTable, sheet_name: &str) -> Result<Vec<u8>, ExtractError> {
    let mut workbook = build_workbook(table, sheet_name)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx(path: &Path, table: &AssembledTable) -> Result<(), ExtractError> {
    let mut workbook = build_workbook(table, DEFAULT_SHEET_NAME)?;
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SHEET_NAME, export_file_name, xlsx_bytes};
    use crate::model::AssembledTable;

    #[test]
    fn strips_pdf_extension_from_export_names() {
        assert_eq!(export_file_name("report.pdf", 3, "xlsx"), "report_pagina3.xlsx");
        assert_eq!(export_file_name("REPORT.PDF", 1, "xlsx"), "REPORT_pagina1.xlsx");
        assert_eq!(export_file_name("notes", 2, "csv"), "notes_pagina2.csv");
        assert_eq!(export_file_name("a.pdf.pdf", 4, "xlsx"), "a.pdf_pagina4.xlsx");
        assert_eq!(export_file_name("é.pdf", 5, "xlsx"), "é_pagina5.xlsx");
    }

    #[test]
    fn writes_a_zip_container() {
        let table = AssembledTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string(), String::new()]],
        )
        .expect("table should be valid");

        let bytes = xlsx_bytes(&table, DEFAULT_SHEET_NAME).expect("workbook should encode");
        assert!(bytes.starts_with(b"PK"));
    }
}
