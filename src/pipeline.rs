// src/pipeline.rs

use std::path::Path;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::present::ChartSpec;
use crate::process::{load_table, normalize, select, LongRecord, NormalizedTable, Selection};

/// One run of the dashboard: the file is loaded and normalized when this is
/// built, and nothing is shared between runs.
#[derive(Debug)]
pub struct Dashboard {
    config: PipelineConfig,
    table: NormalizedTable,
}

/// What the chart area shows for a selection. The table view is always
/// available through [`Dashboard::table`].
#[derive(Debug)]
pub enum View<'a> {
    Chart {
        records: Vec<LongRecord<'a>>,
        spec: ChartSpec,
    },
    /// Nothing selected (or nothing matched). Not an error.
    EmptySelection,
}

impl Dashboard {
    /// Load → normalize.
    pub fn load<P: AsRef<Path>>(path: P, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let raw = load_table(path, &config)?;
        let table = normalize(&raw, &config)?;
        Ok(Self::from_table(config, table))
    }

    pub fn from_table(config: PipelineConfig, table: NormalizedTable) -> Self {
        Self { config, table }
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The selection surface: every region label, in table order.
    pub fn regions(&self) -> &[String] {
        &self.table.regions
    }

    pub fn default_selection(&self) -> Selection {
        Selection::all(&self.table)
    }

    /// Reshape → select → chart description.
    pub fn view(&self, selection: &Selection) -> View<'_> {
        selection.warn_unknown(&self.table);
        let records: Vec<LongRecord<'_>> = select(self.table.records(), selection).collect();
        if records.is_empty() {
            if selection.is_empty() {
                warn!("no regions selected, skipping chart");
            } else if self.table.num_rows() == 0 {
                warn!(selected = selection.len(), "table has no regions, skipping chart");
            } else {
                warn!(selected = selection.len(), "selection matched no regions, skipping chart");
            }
            return View::EmptySelection;
        }

        info!(
            selected = selection.len(),
            records = records.len(),
            "built chart view"
        );
        let spec = ChartSpec::build(&self.table, &records, &self.config.chart);
        View::Chart { records, spec }
    }
}
