use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    collections::HashSet,
    fs,
    io::Write,
    path::Path,
};

use crate::config::ChartLabels;
use crate::process::{LongRecord, NormalizedTable};

/// Line chart handed to whatever draws it: month on x, count on y, one
/// series (colour) per region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub legend_title: String,
    pub markers: bool,
    /// Month categories in table column order.
    pub x: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// Aligned with [`ChartSpec::x`]; `null` where the count is missing.
    pub values: Vec<Option<f64>>,
}

impl ChartSpec {
    pub fn build(table: &NormalizedTable, records: &[LongRecord<'_>], labels: &ChartLabels) -> Self {
        let present: HashSet<&str> = records.iter().map(|r| r.month).collect();
        let x: Vec<String> = table
            .columns
            .iter()
            .filter(|c| present.contains(c.as_str()))
            .cloned()
            .collect();

        let mut series: Vec<Series> = Vec::new();
        for rec in records {
            let idx = match series.iter().position(|s| s.name == rec.region) {
                Some(i) => i,
                None => {
                    series.push(Series {
                        name: rec.region.to_string(),
                        values: vec![None; x.len()],
                    });
                    series.len() - 1
                }
            };
            if let Some(col) = x.iter().position(|m| m == rec.month) {
                series[idx].values[col] = rec.count;
            }
        }

        Self {
            title: labels.title.clone(),
            x_title: labels.x_axis.clone(),
            y_title: labels.y_axis.clone(),
            legend_title: labels.legend.clone(),
            markers: labels.markers,
            x,
            series,
        }
    }

    /// Write pretty JSON via a temp file renamed over `path`.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "chart.json".into());
        let tmp_path = dir.join(format!(".{}.tmp", file_name));
        let mut tmp = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        serde_json::to_writer_pretty(&mut tmp, self).context("serializing chart")?;
        tmp.write_all(b"\n")?;

        fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
        Ok(())
    }
}
