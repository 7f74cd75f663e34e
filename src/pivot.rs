//! Marketplace × category cross-tabulation.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotTable {
    marketplaces: Vec<String>,
    categories: Vec<String>,
    cells: BTreeMap<(String, String), u64>,
}

#[derive(Debug, Serialize)]
struct PivotCell<'a> {
    marketplace: &'a str,
    category: &'a str,
    quantity: u64,
}

impl PivotTable {
    /// Build from (marketplace, category) totals. Row and column labels are
    /// sorted lexically.
    pub fn from_totals(totals: HashMap<(String, String), u64>) -> Self {
        let mut marketplaces: BTreeSet<String> = BTreeSet::new();
        let mut categories: BTreeSet<String> = BTreeSet::new();
        for (m, c) in totals.keys() {
            marketplaces.insert(m.clone());
            categories.insert(c.clone());
        }
        Self {
            marketplaces: marketplaces.into_iter().collect(),
            categories: categories.into_iter().collect(),
            cells: totals.into_iter().collect(),
        }
    }

    pub fn marketplaces(&self) -> &[String] {
        &self.marketplaces
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Cell value; absent combinations are 0.
    pub fn get(&self, marketplace: &str, category: &str) -> u64 {
        self.cells
            .get(&(marketplace.to_string(), category.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.cells.values().sum()
    }

    pub fn row_total(&self, marketplace: &str) -> u64 {
        self.cells
            .iter()
            .filter(|((m, _), _)| m == marketplace)
            .map(|(_, q)| *q)
            .sum()
    }

    pub fn column_total(&self, category: &str) -> u64 {
        self.cells
            .iter()
            .filter(|((_, c), _)| c == category)
            .map(|(_, q)| *q)
            .sum()
    }

    /// Zero-filled matrix: one row per marketplace, one column per category.
    pub fn dense_rows(&self) -> Vec<(String, Vec<u64>)> {
        self.marketplaces
            .iter()
            .map(|m| {
                let row = self.categories.iter().map(|c| self.get(m, c)).collect();
                (m.clone(), row)
            })
            .collect()
    }
}

impl Serialize for PivotTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cells: Vec<PivotCell<'_>> = self
            .cells
            .iter()
            .map(|((m, c), q)| PivotCell {
                marketplace: m,
                category: c,
                quantity: *q,
            })
            .collect();
        let mut s = serializer.serialize_struct("PivotTable", 3)?;
        s.serialize_field("marketplaces", &self.marketplaces)?;
        s.serialize_field("categories", &self.categories)?;
        s.serialize_field("cells", &cells)?;
        s.end()
    }
}
