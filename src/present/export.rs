// src/present/export.rs

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::process::LongRecord;

/// `region: Utf8`, `month: Utf8`, `count: Float64 (nullable)`.
pub fn long_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("region", DataType::Utf8, false),
        Field::new("month", DataType::Utf8, false),
        Field::new("count", DataType::Float64, true),
    ]))
}

/// Build one Arrow batch from long records; missing counts become nulls.
pub fn records_to_batch(records: &[LongRecord<'_>]) -> Result<RecordBatch> {
    let mut region = StringBuilder::new();
    let mut month = StringBuilder::new();
    let mut count = Float64Builder::with_capacity(records.len());
    for rec in records {
        region.append_value(rec.region);
        month.append_value(rec.month);
        count.append_option(rec.count);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(region.finish()),
        Arc::new(month.finish()),
        Arc::new(count.finish()),
    ];
    RecordBatch::try_new(long_schema(), columns).context("building long record batch")
}

/// Write the records to a Snappy-compressed Parquet file at `path`.
pub fn write_records_parquet<P: AsRef<Path>>(path: P, records: &[LongRecord<'_>]) -> Result<()> {
    let path = path.as_ref();
    let batch = records_to_batch(records)?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, long_schema(), Some(props))
        .context("creating Arrow writer")?;
    writer.write(&batch).context("writing long records")?;
    writer.close().context("closing parquet writer")?;

    info!(path = %path.display(), rows = records.len(), "wrote parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_parquet_read_back() -> Result<()> {
        let records = vec![
            LongRecord { region: "인천", month: "11월", count: Some(10.0) },
            LongRecord { region: "인천", month: "12월", count: None },
            LongRecord { region: "김포", month: "11월", count: Some(5.0) },
        ];
        let dir = tempdir()?;
        let path = dir.path().join("long.parquet");
        write_records_parquet(&path, &records)?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let batches: Vec<RecordBatch> = reader.collect::<std::result::Result<_, _>>()?;
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 3);

        let regions = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("region column");
        assert_eq!(regions.value(2), "김포");

        let counts = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("count column");
        assert_eq!(counts.value(0), 10.0);
        assert!(counts.is_null(1));
        Ok(())
    }

    #[test]
    fn test_empty_records() -> Result<()> {
        let batch = records_to_batch(&[])?;
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema().field(2).name(), "count");
        Ok(())
    }
}
