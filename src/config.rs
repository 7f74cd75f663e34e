//! Report configuration: the America segment allow-list and runtime settings.

use std::env;
use std::path::PathBuf;

/// Marketplaces that make up the America segment, in display order.
pub const AMERICA_MARKETPLACES: &[&str] = &[
    "AmazonUS",
    "EtsyDecoroHomeArt",
    "EtsyIslamicDecorGifts",
    "EtsyIwa",
    "EtsyMapwoodA",
    "EtsyShukran",
    "ShopifyCfwEn",
    "ShopifyIslamicEn",
    "ShopifyShkuranEn",
    "ShopifyUppEn",
    "Walmart",
];

pub const TOP_PRODUCTS: usize = 20;
pub const TOP_MARKETPLACES: usize = 3;
pub const TOP_CATEGORIES: usize = 5;

const DEFAULT_SOURCE_PATH: &str = "sirket_son_1.csv";

/// Runtime settings for the report binary.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// CSV file holding the sales table
    pub source_path: PathBuf,

    /// Directory the exported CSV/JSON files are written to
    pub output_dir: PathBuf,

    /// Segment allow-list
    pub allow_list: Vec<String>,

    /// Initial marketplace selection (empty = all)
    pub selection: Vec<String>,

    /// Length of the product ranking
    pub top_products: usize,
}

impl ReportConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SALES_SOURCE_PATH` (default: sirket_son_1.csv)
    /// - `SALES_OUTPUT_DIR` (default: current directory)
    /// - `SALES_MARKETPLACES` comma-separated selection (default: empty)
    /// - `SALES_TOP_PRODUCTS` (default: 20, never above 20)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            source_path: lookup("SALES_SOURCE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_PATH)),

            output_dir: lookup("SALES_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),

            allow_list: AMERICA_MARKETPLACES.iter().map(|m| m.to_string()).collect(),

            selection: lookup("SALES_MARKETPLACES")
                .map(|s| parse_marketplace_list(&s))
                .unwrap_or_default(),

            top_products: lookup("SALES_TOP_PRODUCTS")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .map(|n| n.min(TOP_PRODUCTS))
                .unwrap_or(TOP_PRODUCTS),
        }
    }
}

/// Split a comma-separated marketplace list, dropping blanks and repeats.
pub fn parse_marketplace_list(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in s.split(',') {
        let name = part.trim();
        if !name.is_empty() && !out.iter().any(|m| m == name) {
            out.push(name.to_string());
        }
    }
    out
}
