use std::collections::HashMap;

use crate::error::{PipelineError, Result};
use crate::process::normalize::NormalizedTable;
use crate::process::utils::parse_count;

/// One (region, month) cell of a [`NormalizedTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongRecord<'a> {
    pub region: &'a str,
    pub month: &'a str,
    /// `None` when the source cell was blank or not a number.
    pub count: Option<f64>,
}

/// Row-major walk over a table's cells. Cheap to clone; every clone restarts
/// from wherever the original was.
#[derive(Debug, Clone)]
pub struct LongRecords<'a> {
    table: &'a NormalizedTable,
    row: usize,
    col: usize,
}

impl<'a> Iterator for LongRecords<'a> {
    type Item = LongRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let table: &'a NormalizedTable = self.table;
        let cols = table.num_columns();
        if cols == 0 || self.row >= table.num_rows() {
            return None;
        }
        let rec = LongRecord {
            region: &table.regions[self.row],
            month: &table.columns[self.col],
            count: parse_count(&table.cells[self.row][self.col]),
        };
        self.col += 1;
        if self.col == cols {
            self.col = 0;
            self.row += 1;
        }
        Some(rec)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let cols = self.table.num_columns();
        let remaining = if cols == 0 {
            0
        } else {
            (self.table.num_rows() * cols).saturating_sub(self.row * cols + self.col)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LongRecords<'_> {}

/// Unpivot `table` into (region, month, count) records.
pub fn reshape(table: &NormalizedTable) -> LongRecords<'_> {
    LongRecords {
        table,
        row: 0,
        col: 0,
    }
}

impl NormalizedTable {
    pub fn records(&self) -> LongRecords<'_> {
        reshape(self)
    }
}

/// Inverse of [`reshape`]: regions and months keep first-seen order, missing
/// counts become empty cells. A repeated (region, month) pair is an error.
pub fn pivot<'a, I>(region_label: &str, records: I) -> Result<NormalizedTable>
where
    I: IntoIterator<Item = LongRecord<'a>>,
{
    let mut regions: Vec<String> = Vec::new();
    let mut columns: Vec<String> = Vec::new();
    let mut region_pos: HashMap<&'a str, usize> = HashMap::new();
    let mut column_pos: HashMap<&'a str, usize> = HashMap::new();
    let mut values: HashMap<(usize, usize), Option<f64>> = HashMap::new();

    for rec in records {
        let r = *region_pos.entry(rec.region).or_insert_with(|| {
            regions.push(rec.region.to_string());
            regions.len() - 1
        });
        let c = *column_pos.entry(rec.month).or_insert_with(|| {
            columns.push(rec.month.to_string());
            columns.len() - 1
        });
        if values.insert((r, c), rec.count).is_some() {
            return Err(PipelineError::schema(format!(
                "duplicate record for ({}, {})",
                rec.region, rec.month
            )));
        }
    }

    let cells = (0..regions.len())
        .map(|r| {
            (0..columns.len())
                .map(|c| match values.get(&(r, c)) {
                    Some(Some(v)) => v.to_string(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    Ok(NormalizedTable {
        region_label: region_label.to_string(),
        columns,
        regions,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(regions: &[&str], columns: &[&str], cells: &[&[&str]]) -> NormalizedTable {
        NormalizedTable {
            region_label: "지역".into(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            regions: regions.iter().map(|s| s.to_string()).collect(),
            cells: cells
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn scenario() -> NormalizedTable {
        table(&["A", "B"], &["11월", "12월"], &[&["10", "20"], &["5", "15"]])
    }

    #[test]
    fn scenario_records_in_row_major_order() {
        let t = scenario();
        let got: Vec<_> = reshape(&t).map(|r| (r.region, r.month, r.count)).collect();
        assert_eq!(
            got,
            vec![
                ("A", "11월", Some(10.0)),
                ("A", "12월", Some(20.0)),
                ("B", "11월", Some(5.0)),
                ("B", "12월", Some(15.0)),
            ]
        );
    }

    #[test]
    fn length_is_rows_times_columns() {
        let t = table(
            &["인천", "김포", "제주"],
            &["11월", "12월", "01월", "비고"],
            &[
                &["1", "2", "3", "x"],
                &["", "-", "3", ""],
                &["7", "8", "n/a", "9"],
            ],
        );
        let records = t.records();
        assert_eq!(records.len(), 12);
        assert_eq!(records.count(), 12);
    }

    #[test]
    fn coercion_never_drops_records() {
        let t = table(&["A"], &["11월", "12월", "01월"], &[&["", "abc", "3"]]);
        let counts: Vec<_> = t.records().map(|r| r.count).collect();
        assert_eq!(counts, vec![None, None, Some(3.0)]);
    }

    #[test]
    fn restartable_and_exact_size() {
        let t = scenario();
        let mut it = t.records();
        it.next();
        assert_eq!(it.len(), 3);
        let rest: Vec<_> = it.clone().collect();
        assert_eq!(rest.len(), 3);
        assert_eq!(it.collect::<Vec<_>>(), rest);
        assert_eq!(t.records().len(), 4);
    }

    #[test]
    fn empty_tables_yield_nothing() {
        assert_eq!(reshape(&table(&["A"], &[], &[&[]])).count(), 0);
        assert_eq!(reshape(&table(&[], &["11월"], &[])).count(), 0);
    }

    #[test]
    fn pivot_round_trips() {
        let t = scenario();
        let back = pivot(&t.region_label, t.records()).unwrap();
        assert_eq!(back, t);
        let again = pivot(&back.region_label, back.records()).unwrap();
        assert_eq!(again, t);
    }

    #[test]
    fn pivot_rejects_duplicates() {
        let recs = vec![
            LongRecord { region: "A", month: "11월", count: Some(1.0) },
            LongRecord { region: "A", month: "11월", count: Some(2.0) },
        ];
        assert!(matches!(pivot("지역", recs), Err(PipelineError::Schema(_))));
    }
}
