// src/config.rs

use encoding_rs::Encoding;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{PipelineError, Result};

/// File name of the KOSIS export the dashboard was built around.
pub const DEFAULT_INPUT: &str = "관제탑_관제량_20250906112544.xlsx - 데이터.csv";

/// How the region column is found in the header row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionColumn {
    /// A header with exactly this name.
    Named(String),
    /// Whatever the first column is.
    First,
}

impl Default for RegionColumn {
    fn default() -> Self {
        RegionColumn::Named("지역(1)".into())
    }
}

/// Titles handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub legend: String,
    pub markers: bool,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            title: "월별 공항 관제량 추이".into(),
            x_axis: "기간".into(),
            y_axis: "관제량 (대)".into(),
            legend: "지역".into(),
            markers: true,
        }
    }
}

/// Everything the pipeline needs to know about the input file and its layout.
///
/// Every field has a default, so a YAML file only has to name what it changes:
///
/// ```yaml
/// fallback_encoding: euc-kr
/// region_column: first
/// total_sentinel: 합계
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// WHATWG label tried first.
    pub primary_encoding: String,
    /// WHATWG label tried when the primary fails. `euc-kr` covers cp949.
    pub fallback_encoding: String,
    pub delimiter: char,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub region_column: RegionColumn,
    /// Name the region column is renamed to.
    pub region_label: String,
    /// Region value of the aggregate row.
    pub total_sentinel: String,
    /// Appended to the month number when relabelling period columns.
    pub month_suffix: String,
    /// Appended to the year when two periods share a month label.
    pub year_suffix: String,
    /// Text of the unit row some exports carry under the header. A row whose
    /// every period cell holds exactly this text is dropped.
    pub unit_marker: Option<String>,
    pub chart: ChartLabels,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            primary_encoding: "utf-8".into(),
            fallback_encoding: "euc-kr".into(),
            delimiter: ',',
            region_column: RegionColumn::default(),
            region_label: "지역".into(),
            total_sentinel: "합계".into(),
            month_suffix: "월".into(),
            year_suffix: "년".into(),
            unit_marker: Some("관제량 (대)".into()),
            chart: ChartLabels::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a YAML config file; missing keys fall back to defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("reading {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)
            .map_err(|e| PipelineError::Config(format!("parsing config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the encoding labels and the delimiter.
    pub fn validate(&self) -> Result<()> {
        self.encodings()?;
        self.delimiter_byte()?;
        Ok(())
    }

    /// Resolve the (primary, fallback) encodings from their labels.
    pub fn encodings(&self) -> Result<(&'static Encoding, &'static Encoding)> {
        Ok((
            lookup_encoding(&self.primary_encoding)?,
            lookup_encoding(&self.fallback_encoding)?,
        ))
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(PipelineError::Config(format!(
                "delimiter {:?} is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}

fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| PipelineError::Config(format!("unknown encoding label `{}`", label)))
}
