use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::AssembledTable;

fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    table: &AssembledTable,
) -> Result<(), ExtractError> {
    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, table: &AssembledTable, delimiter: u8) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_records(&mut writer, table)
}

pub fn csv_string(table: &AssembledTable, delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_records(&mut writer, table)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidTable(format!("invalid utf-8 csv output: {error}")))
}
