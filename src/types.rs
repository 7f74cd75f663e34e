use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Header of the quantity column. Sales exports name it after the SQL
/// aggregate that produced it, so both spellings are accepted.
pub const QUANTITY_COLUMN: &str = "quantity";
pub const QUANTITY_EXPORT_COLUMN: &str = "SUM(quantity)";

#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub marketplace_key: Option<String>,
    pub variant_name: Option<String>,
    #[serde(alias = "SUM(quantity)")]
    pub quantity: Option<String>,
}

/// One validated row of the sales table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub marketplace_key: String,
    pub variant_name: String,
    pub quantity: u64,
}

impl SalesRecord {
    pub fn new(marketplace_key: &str, variant_name: &str, quantity: u64) -> Self {
        Self {
            marketplace_key: marketplace_key.to_string(),
            variant_name: variant_name.to_string(),
            quantity,
        }
    }
}

/// A record that survived the segment filter, with its category derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    pub marketplace_key: String,
    pub variant_name: String,
    pub category: String,
    pub quantity: u64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProductRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Product")]
    #[tabled(rename = "Product")]
    pub product: String,
    #[serde(rename = "Quantity")]
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MarketplaceRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Marketplace")]
    #[tabled(rename = "Marketplace")]
    pub marketplace: String,
    #[serde(rename = "TotalQuantity")]
    #[tabled(rename = "TotalQuantity")]
    pub total_quantity: String,
    #[serde(rename = "MarketShare")]
    #[tabled(rename = "MarketShare")]
    pub market_share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "TotalQuantity")]
    #[tabled(rename = "TotalQuantity")]
    pub total_quantity: String,
    #[serde(rename = "CategoryShare")]
    #[tabled(rename = "CategoryShare")]
    pub category_share: String,
}
