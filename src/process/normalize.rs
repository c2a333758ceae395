use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, RegionColumn};
use crate::error::{PipelineError, Result};
use crate::process::raw_table::RawTable;
use crate::process::utils::{clean_str, split_period};

/// One row per region, one column per month, total row removed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// Canonical name of the region axis (e.g. `지역`).
    pub region_label: String,
    /// Column labels in source order; period columns read `MM월`.
    pub columns: Vec<String>,
    /// Region labels in source order, unique.
    pub regions: Vec<String>,
    /// `cells[r][c]` is the source text for `regions[r]` × `columns[c]`.
    pub cells: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn num_rows(&self) -> usize {
        self.regions.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, region: &str) -> Option<&[String]> {
        self.regions
            .iter()
            .position(|r| r == region)
            .map(|i| self.cells[i].as_slice())
    }
}

/// Label a period column gets once the year is dropped.
pub fn month_label(header: &str, suffix: &str) -> Option<String> {
    split_period(header).map(|(_, month)| format!("{}{}", month, suffix))
}

/// Rename the region column, drop the total and metadata rows, relabel
/// `YYYY.MM` columns to `MM월`.
#[tracing::instrument(level = "info", skip_all, fields(columns = raw.headers.len(), rows = raw.rows.len()))]
pub fn normalize(raw: &RawTable, config: &PipelineConfig) -> Result<NormalizedTable> {
    let region_idx = find_region_column(raw, &config.region_column)?;
    let region_header = raw.headers[region_idx].trim();

    let value_idx: Vec<usize> = (0..raw.headers.len()).filter(|&i| i != region_idx).collect();
    let columns = relabel_columns(
        &raw.headers,
        &value_idx,
        &config.month_suffix,
        &config.year_suffix,
    );

    let period_idx: Vec<usize> = value_idx
        .iter()
        .copied()
        .filter(|&i| split_period(&raw.headers[i]).is_some())
        .collect();
    if period_idx.is_empty() {
        return Err(PipelineError::schema(format!(
            "no `year.month` columns among {:?}",
            raw.headers
        )));
    }

    let mut regions = Vec::with_capacity(raw.rows.len());
    let mut cells = Vec::with_capacity(raw.rows.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (line, row) in raw.rows.iter().enumerate() {
        let region = clean_str(&row[region_idx]);
        if region.is_empty() {
            debug!(line, "skipping row without region");
            continue;
        }
        if region == config.total_sentinel {
            info!(line, region, "dropping total row");
            continue;
        }
        if is_metadata_row(
            row,
            region,
            region_header,
            &period_idx,
            config.unit_marker.as_deref(),
        ) {
            warn!(line, region, "dropping metadata row");
            continue;
        }
        if !seen.insert(region.to_string()) {
            return Err(PipelineError::schema(format!(
                "region `{}` appears more than once",
                region
            )));
        }
        regions.push(region.to_string());
        cells.push(value_idx.iter().map(|&i| row[i].clone()).collect());
    }

    info!(
        regions = regions.len(),
        columns = columns.len(),
        "normalized table"
    );
    Ok(NormalizedTable {
        region_label: config.region_label.clone(),
        columns,
        regions,
        cells,
    })
}

fn find_region_column(raw: &RawTable, spec: &RegionColumn) -> Result<usize> {
    match spec {
        RegionColumn::Named(name) => raw.column_index(name).ok_or_else(|| {
            PipelineError::schema(format!(
                "region column `{}` not found in {:?}",
                name, raw.headers
            ))
        }),
        RegionColumn::First if raw.headers.is_empty() => {
            Err(PipelineError::schema("input has no columns"))
        }
        RegionColumn::First => Ok(0),
    }
}

/// `YYYY.MM` → `MM월`, everything else unchanged. When two periods share a
/// month (`2024.01`, `2025.01`) both keep their year: `2024년 01월`.
fn relabel_columns(
    headers: &[String],
    value_idx: &[usize],
    suffix: &str,
    year_suffix: &str,
) -> Vec<String> {
    let mut month_uses: HashMap<String, usize> = HashMap::new();
    for &i in value_idx {
        if let Some(label) = month_label(&headers[i], suffix) {
            *month_uses.entry(label).or_default() += 1;
        }
    }

    value_idx
        .iter()
        .map(|&i| {
            let header = &headers[i];
            match split_period(header) {
                Some((year, month)) => {
                    let label = format!("{}{}", month, suffix);
                    if month_uses.get(&label).copied().unwrap_or(0) > 1 {
                        warn!(header = %header, "month label collides, keeping year");
                        format!("{}{} {}{}", year, year_suffix, month, suffix)
                    } else {
                        label
                    }
                }
                None => header.trim().to_string(),
            }
        })
        .collect()
}

/// A repeated header, or a unit row whose every period cell is the
/// configured marker. Unparseable counts do not make a row metadata.
fn is_metadata_row(
    row: &[String],
    region: &str,
    region_header: &str,
    period_idx: &[usize],
    unit_marker: Option<&str>,
) -> bool {
    if region == region_header {
        return true;
    }
    match unit_marker {
        Some(marker) => period_idx.iter().all(|&i| clean_str(&row[i]) == marker),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::parse_table;

    fn raw(text: &str) -> RawTable {
        parse_table(text, b',').unwrap()
    }

    fn first_column() -> PipelineConfig {
        PipelineConfig {
            region_column: RegionColumn::First,
            total_sentinel: "Total".into(),
            ..Default::default()
        }
    }

    #[test]
    fn scenario_drops_total_and_relabels() {
        let table = normalize(
            &raw("Region,2024.11,2024.12\nA,10,20\nB,5,15\nTotal,15,35\n"),
            &first_column(),
        )
        .unwrap();

        assert_eq!(table.region_label, "지역");
        assert_eq!(table.columns, vec!["11월", "12월"]);
        assert_eq!(table.regions, vec!["A", "B"]);
        assert_eq!(table.row("A").unwrap(), ["10", "20"]);
        assert_eq!(table.row("B").unwrap(), ["5", "15"]);
        assert!(table.row("Total").is_none());
    }

    #[test]
    fn month_label_passes_non_periods_through() {
        assert_eq!(month_label("2024.11", "월").as_deref(), Some("11월"));
        assert_eq!(month_label("Region", "월"), None);
    }

    #[test]
    fn named_region_column_anywhere() {
        let cfg = PipelineConfig::default();
        let table = normalize(
            &raw("2024.11,지역(1),비고,2024.12\n3,인천,x,4\n9,합계,,9\n"),
            &cfg,
        )
        .unwrap();
        assert_eq!(table.columns, vec!["11월", "비고", "12월"]);
        assert_eq!(table.regions, vec!["인천"]);
        assert_eq!(table.cells, vec![vec!["3", "x", "4"]]);
    }

    #[test]
    fn missing_region_column_is_schema_error() {
        let err = normalize(&raw("Region,2024.11\nA,1\n"), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn no_period_columns_is_schema_error() {
        let err = normalize(&raw("Region,Count\nA,1\n"), &first_column()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn duplicate_region_is_schema_error() {
        let err = normalize(&raw("Region,2024.11\nA,1\nA,2\n"), &first_column()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn metadata_rows_dropped_by_content_not_position() {
        let cfg = PipelineConfig::default();
        let text = "지역(1),2024.11,2024.12\n\
                    지역(1),관제량 (대),관제량 (대)\n\
                    인천,10,20\n\
                    김포,-,\n\
                    합계,10,20\n";
        let table = normalize(&raw(text), &cfg).unwrap();
        assert_eq!(table.regions, vec!["인천", "김포"]);
    }

    #[test]
    fn unit_row_dropped_by_marker() {
        let text = "지역(1),2024.11,2024.12\n\
                    단위,관제량 (대),관제량 (대)\n\
                    인천,10,20\n";
        let table = normalize(&raw(text), &PipelineConfig::default()).unwrap();
        assert_eq!(table.regions, vec!["인천"]);

        let no_marker = PipelineConfig {
            unit_marker: None,
            ..Default::default()
        };
        let table = normalize(&raw(text), &no_marker).unwrap();
        assert_eq!(table.regions, vec!["단위", "인천"]);
    }

    #[test]
    fn all_dash_row_is_kept_with_missing_counts() {
        let text = "지역(1),2024.11,2024.12\n\
                    인천,10,20\n\
                    울진,-,-\n\
                    합계,10,20\n";
        let table = normalize(&raw(text), &PipelineConfig::default()).unwrap();
        assert_eq!(table.regions, vec!["인천", "울진"]);

        let counts: Vec<_> = table
            .records()
            .filter(|r| r.region == "울진")
            .map(|r| r.count)
            .collect();
        assert_eq!(counts, vec![None, None]);
    }

    #[test]
    fn thousands_separated_row_is_kept_with_missing_counts() {
        let text = "지역(1),2024.11,2024.12\n\
                    인천,\"21,004\",\"22,310\"\n\
                    김포,500,600\n";
        let table = normalize(&raw(text), &PipelineConfig::default()).unwrap();
        assert_eq!(table.regions, vec!["인천", "김포"]);
        assert_eq!(table.row("인천").unwrap(), ["21,004", "22,310"]);

        let counts: Vec<_> = table
            .records()
            .filter(|r| r.region == "인천")
            .map(|r| r.count)
            .collect();
        assert_eq!(counts, vec![None, None]);
        assert_eq!(table.records().len(), 4);
    }

    #[test]
    fn first_data_row_kept_when_it_is_data() {
        let table = normalize(&raw("Region,2024.11\nA,1\nB,2\n"), &first_column()).unwrap();
        assert_eq!(table.regions, vec!["A", "B"]);
    }

    #[test]
    fn blank_region_rows_skipped() {
        let table = normalize(&raw("Region,2024.11\n,1\nA,2\n"), &first_column()).unwrap();
        assert_eq!(table.regions, vec!["A"]);
    }

    #[test]
    fn colliding_months_keep_year() {
        let table = normalize(
            &raw("Region,2024.12,2025.01,2025.12\nA,1,2,3\n"),
            &first_column(),
        )
        .unwrap();
        assert_eq!(table.columns, vec!["2024년 12월", "01월", "2025년 12월"]);
    }

    #[test]
    fn colliding_months_use_configured_year_suffix() {
        let cfg = PipelineConfig {
            year_suffix: "/".into(),
            month_suffix: String::new(),
            ..first_column()
        };
        let table = normalize(&raw("Region,2024.12,2025.12\nA,1,2\n"), &cfg).unwrap();
        assert_eq!(table.columns, vec!["2024/ 12", "2025/ 12"]);
    }

    #[test]
    fn fullwidth_digits_are_not_periods() {
        let err = normalize(&raw("Region,２０２４.１１\nA,1\n"), &first_column()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }
}
