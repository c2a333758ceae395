// src/process/mod.rs
use csv::{ReaderBuilder, Trim};
use std::{fs, io::ErrorKind, path::Path};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

pub mod decode;
pub mod normalize;
pub mod raw_table;
pub mod reshape;
pub mod select;
pub mod utils;

pub use normalize::{normalize, NormalizedTable};
pub use raw_table::RawTable;
pub use reshape::{pivot, reshape, LongRecord, LongRecords};
pub use select::{select, Selection};

/// Read `path`, decode it with the configured primary encoding (then the
/// fallback), and parse it as a header + rows table.
#[tracing::instrument(level = "info", skip(path, config), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<RawTable> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PipelineError::FileNotFound(path.to_path_buf()),
        _ => PipelineError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let (primary, fallback) = config.encodings()?;
    let (text, used) = decode::decode_with_fallback(&bytes, primary, fallback).ok_or_else(|| {
        PipelineError::Decode {
            path: path.to_path_buf(),
            tried: vec![primary.name().to_string(), fallback.name().to_string()],
        }
    })?;

    let table = parse_table(&text, config.delimiter_byte()?)?;
    info!(
        encoding = used.name(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded table"
    );
    Ok(table)
}

/// Parse already-decoded delimited text. The first record is the header row.
pub fn parse_table(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true) // ragged rows get padded in RawTable::new
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|source| PipelineError::Csv { record: 0, source })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|source| PipelineError::Csv {
            record: idx + 1,
            source,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(rows = rows.len(), "parsed records");

    Ok(RawTable::new(headers, rows))
}
