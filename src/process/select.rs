use std::collections::BTreeSet;
use tracing::warn;

use crate::process::normalize::NormalizedTable;
use crate::process::reshape::LongRecord;

/// The regions a user asked to see. Rebuilt on every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    labels: BTreeSet<String>,
}

impl Selection {
    /// Every region on the table's axis; the default view.
    pub fn all(table: &NormalizedTable) -> Self {
        Self::from_labels(table.regions.iter().cloned())
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// `*` selects every region, a blank line selects none, anything else is
    /// a comma-separated list of labels.
    pub fn parse(input: &str, table: &NormalizedTable) -> Self {
        match input.trim() {
            "*" => Self::all(table),
            other => Self::from_labels(other.split(',')),
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.labels.contains(region)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Selected labels that are not on the table's region axis.
    pub fn unknown_labels<'s>(&'s self, table: &NormalizedTable) -> Vec<&'s str> {
        self.labels
            .iter()
            .filter(|l| !table.regions.iter().any(|r| r == *l))
            .map(String::as_str)
            .collect()
    }

    /// Log labels that match nothing; they are otherwise ignored.
    pub fn warn_unknown(&self, table: &NormalizedTable) {
        let unknown = self.unknown_labels(table);
        if !unknown.is_empty() {
            warn!(?unknown, "selected regions not present in table");
        }
    }
}

/// Keep only records whose region is selected. An empty selection yields an
/// empty sequence.
pub fn select<'a, 's, I>(
    records: I,
    selection: &'s Selection,
) -> impl Iterator<Item = LongRecord<'a>> + 's
where
    I: IntoIterator<Item = LongRecord<'a>>,
    I::IntoIter: 's,
{
    records
        .into_iter()
        .filter(move |rec| selection.contains(rec.region))
}
