//! Dashboard statistics derived from the client list

use std::collections::HashMap;

use crate::{Client, Tag};

/// Label shown when a table has no entries.
pub const NONE_LABEL: &str = "None";

/// Chart colours, cycled by series index.
pub const PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#84CC16", "#F97316",
    "#EC4899", "#6366F1",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Value counts in first-seen order.
///
/// A case-insensitive table files every occurrence under the casing it was
/// first seen with: `Concur` then `concur` is one bucket, `Concur: 2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    buckets: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    fold_case: bool,
}

impl FrequencyTable {
    pub fn case_insensitive<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Self::build(values, true)
    }

    pub fn exact<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        Self::build(values, false)
    }

    fn build<'a>(values: impl IntoIterator<Item = &'a str>, fold_case: bool) -> Self {
        let mut table = Self {
            fold_case,
            ..Self::default()
        };
        for value in values {
            table.record(value);
        }
        table
    }

    fn key(&self, value: &str) -> String {
        if self.fold_case {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }

    fn record(&mut self, value: &str) {
        let key = self.key(value);
        match self.index.get(&key) {
            Some(&slot) => self.buckets[slot].1 += 1,
            None => {
                self.index.insert(key, self.buckets.len());
                self.buckets.push((value.to_string(), 1));
            }
        }
    }

    /// Count for `value`, folding case when the table does.
    pub fn count(&self, value: &str) -> usize {
        self.index
            .get(&self.key(value))
            .map(|&slot| self.buckets[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Highest-count bucket; ties go to the bucket seen first.
    pub fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in self.iter() {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name)
    }

    pub fn series(&self) -> Vec<ChartSlice> {
        let total = self.total();
        self.iter()
            .enumerate()
            .map(|(index, (name, value))| ChartSlice {
                name: name.to_string(),
                value,
                percentage: if total == 0 {
                    0.0
                } else {
                    value as f64 * 100.0 / total as f64
                },
                color: palette_color(index),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
    pub percentage: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_onboardings: usize,
    pub total_tmcs: usize,
    pub total_ssos: usize,
    pub most_integrated_tmc: String,
    pub most_integrated_sso: String,
    pub status_breakdown: FrequencyTable,
    pub tmc_counts: FrequencyTable,
    pub sso_counts: FrequencyTable,
}

impl DashboardStats {
    pub fn compute(clients: &[Client]) -> Self {
        let tmc_counts = FrequencyTable::case_insensitive(tag_values(clients, |c| &c.tmcs));
        let sso_counts =
            FrequencyTable::case_insensitive(tag_values(clients, |c| &c.sso_systems));
        let status_breakdown = FrequencyTable::exact(clients.iter().map(|c| c.status.as_str()));

        Self {
            total_onboardings: clients.len(),
            total_tmcs: tmc_counts.len(),
            total_ssos: sso_counts.len(),
            most_integrated_tmc: tmc_counts.most_frequent().unwrap_or(NONE_LABEL).to_string(),
            most_integrated_sso: sso_counts.most_frequent().unwrap_or(NONE_LABEL).to_string(),
            status_breakdown,
            tmc_counts,
            sso_counts,
        }
    }
}

fn tag_values<'a>(
    clients: &'a [Client],
    field: impl Fn(&'a Client) -> &'a Vec<Tag> + 'a,
) -> impl Iterator<Item = &'a str> + 'a {
    clients
        .iter()
        .flat_map(move |client| field(client).iter().map(|tag| tag.value.as_str()))
}
