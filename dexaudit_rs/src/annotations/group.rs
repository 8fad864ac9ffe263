//! Two-level grouping: outer key -> order bucket -> payloads.

use std::collections::BTreeMap;

use serde::Serialize;

use super::format::{Annotation, AnnotationFormat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    pub format: String,
    /// Sorted by key.
    pub groups: Vec<AnnotationGroup>,
    #[serde(skip)]
    pub separate_groups: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationGroup {
    pub key: String,
    /// Sorted by rank; equal ranks keep first-seen order.
    pub entries: Vec<OrderedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedEntry {
    pub order: String,
    #[serde(skip)]
    pub rank: i64,
    /// Scan order.
    pub payloads: Vec<String>,
}

impl AnnotationReport {
    pub fn record_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.entries)
            .map(|e| e.payloads.len())
            .sum()
    }
}

/// Partition records into (group key, order label) buckets and sort.
pub fn build_report(
    format: &AnnotationFormat,
    records: impl IntoIterator<Item = Annotation>,
) -> AnnotationReport {
    let mut groups: BTreeMap<String, Vec<OrderedEntry>> = BTreeMap::new();

    for record in records {
        let entries = groups.entry(record.group_key()).or_default();
        match entries.iter_mut().find(|e| e.order == record.order.label) {
            Some(entry) => entry.payloads.push(record.payload),
            None => entries.push(OrderedEntry {
                order: record.order.label,
                rank: record.order.rank,
                payloads: vec![record.payload],
            }),
        }
    }

    let groups = groups
        .into_iter()
        .map(|(key, mut entries)| {
            entries.sort_by_key(|e| e.rank);
            AnnotationGroup { key, entries }
        })
        .collect();

    AnnotationReport {
        format: format.name().to_string(),
        groups,
        separate_groups: format.separate_groups(),
    }
}
