//! Segment filter: restricts the sales table to the segment marketplaces and
//! derives the category of every retained record.

use crate::types::{SalesRecord, SegmentRecord};
use std::collections::HashSet;

const CATEGORY_DELIMITER: char = '-';

/// Leading segment of a variant name, up to the first `-`.
/// Names without a delimiter are their own category.
pub fn category_key(variant_name: &str) -> &str {
    variant_name
        .split_once(CATEGORY_DELIMITER)
        .map_or(variant_name, |(head, _)| head)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    /// Allow-list entries present in the data, in allow-list order.
    pub effective_marketplaces: Vec<String>,
    pub records: Vec<SegmentRecord>,
}

impl Segment {
    /// Narrow the segment to a user-chosen subset of marketplaces.
    ///
    /// An empty selection means "no restriction". Entries that are not
    /// effective marketplaces select nothing.
    pub fn select(&self, selection: &[String]) -> Vec<SegmentRecord> {
        if selection.is_empty() {
            return self.records.clone();
        }
        let chosen: HashSet<&str> = selection.iter().map(String::as_str).collect();
        for name in &chosen {
            if !self.effective_marketplaces.iter().any(|m| m == name) {
                log::warn!("Selected marketplace {} has no data in this segment", name);
            }
        }
        self.records
            .iter()
            .filter(|r| chosen.contains(r.marketplace_key.as_str()))
            .cloned()
            .collect()
    }
}

/// Keep the records whose marketplace is on the allow-list and present in the
/// data, deriving their category along the way.
pub fn filter<S: AsRef<str>>(records: &[SalesRecord], allow_list: &[S]) -> Segment {
    let present: HashSet<&str> = records.iter().map(|r| r.marketplace_key.as_str()).collect();

    let mut effective_marketplaces: Vec<String> = Vec::new();
    for name in allow_list.iter().map(AsRef::as_ref) {
        if !present.contains(name) {
            log::debug!("Allow-listed marketplace {} not present in data", name);
            continue;
        }
        if !effective_marketplaces.iter().any(|m| m == name) {
            effective_marketplaces.push(name.to_string());
        }
    }

    let effective: HashSet<&str> = effective_marketplaces.iter().map(String::as_str).collect();
    let records: Vec<SegmentRecord> = records
        .iter()
        .filter(|r| effective.contains(r.marketplace_key.as_str()))
        .map(|r| SegmentRecord {
            marketplace_key: r.marketplace_key.clone(),
            variant_name: r.variant_name.clone(),
            category: category_key(&r.variant_name).to_string(),
            quantity: r.quantity,
        })
        .collect();

    log::info!(
        "Segment filter kept {} records across {} marketplaces",
        records.len(),
        effective_marketplaces.len()
    );
    Segment {
        effective_marketplaces,
        records,
    }
}
