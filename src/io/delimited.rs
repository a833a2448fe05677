//! Comma- and tab-separated tables.

use crate::data::{Cell, RawTable, TextTable};
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Read a delimited file. The first record is the header.
pub fn read_delimited<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<RawTable> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(RawTable::new(header, rows))
}

/// Write a rendered table as a delimited file.
pub fn write_delimited<P: AsRef<Path>>(path: P, delimiter: u8, table: &TextTable) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(BufWriter::new(file));

    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}
