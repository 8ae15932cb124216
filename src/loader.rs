//! CSV loading of porting records

use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::models::{CsvRecord, PortingRecord};

/// Load every row of a registry export. Any malformed row fails the load.
pub fn load_csv(path: &Path) -> Result<Vec<PortingRecord>> {
    info!("Reading porting records from {:?}", path);
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let records = read_records(reader)?;
    info!("Parsed {} porting records", records.len());
    Ok(records)
}

/// Parse records from any CSV source with a header row
pub fn load_from_reader<R: Read>(source: R) -> Result<Vec<PortingRecord>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    read_records(reader)
}

/// Required columns, each with its registry-export spelling
const REQUIRED_COLUMNS: [(&str, &str); 4] = [
    ("cedente", "Cedente"),
    ("receptor", "Receptor"),
    ("mes", "Mes"),
    ("lineas", "Lineas"),
];

/// Header problems are reported as row 0
fn check_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<()> {
    let headers = reader.headers().map_err(|e| EngineError::InputShape {
        row: 0,
        message: e.to_string(),
    })?;
    for (name, alias) in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == name || h == alias) {
            return Err(EngineError::InputShape {
                row: 0,
                message: format!("missing column '{}'", name),
            });
        }
    }
    Ok(())
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<PortingRecord>> {
    check_headers(&mut reader)?;
    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CsvRecord>().enumerate() {
        let row_no = i + 1;
        let raw = row.map_err(|e| EngineError::InputShape {
            row: row_no,
            message: e.to_string(),
        })?;
        records.push(raw.to_record(row_no)?);
    }
    debug!("Validated {} rows", records.len());
    Ok(records)
}
