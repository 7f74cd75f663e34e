use crate::aggregate::{self, with_shares, AggregateGroup};
use crate::config::{TOP_CATEGORIES, TOP_MARKETPLACES, TOP_PRODUCTS};
use crate::error::ReportError;
use crate::filter;
use crate::pivot::PivotTable;
use crate::rank::{rank, top_n};
use crate::types::{
    CategoryRankingRow, MarketplaceRankingRow, ProductRankingRow, SalesRecord, SegmentRecord,
};
use crate::util::{format_int, format_percent};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductShare {
    pub name: String,
    pub quantity: u64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceShare {
    pub marketplace: String,
    pub quantity: u64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub quantity: u64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub top_marketplace: Option<Leader>,
    pub top_product: Option<Leader>,
    pub top_category: Option<Leader>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub top3_marketplace_share: f64,
    pub top20_product_share: f64,
    pub top5_category_share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_units: u64,
    pub marketplace_count: usize,
    pub product_count: usize,
    pub category_count: usize,
    pub top_products: Vec<ProductShare>,
    pub top_products_quantity: u64,
    pub marketplace_ranking: Vec<MarketplaceShare>,
    pub category_ranking: Vec<CategoryShare>,
    pub pivot: PivotTable,
    pub narrative: Narrative,
    pub highlights: Highlights,
}

/// Ensure a grouping accounts for every unit of the record set.
fn check_grouping<K>(
    name: &str,
    totals: &HashMap<K, u64>,
    total_units: u64,
) -> Result<(), ReportError> {
    let grouped = aggregate::grand_total(totals)?;
    if grouped != total_units {
        return Err(ReportError::InvariantViolation(format!(
            "{} grouping sums to {} but the records hold {} units",
            name, grouped, total_units
        )));
    }
    Ok(())
}

fn combined_quantity<K>(groups: &[AggregateGroup<K>]) -> u64 {
    groups.iter().map(|g| g.total_quantity).sum()
}

fn leader(ranked: &[(String, u64)]) -> Option<Leader> {
    ranked.first().map(|(name, quantity)| Leader {
        name: name.clone(),
        quantity: *quantity,
    })
}

/// Build the full report for an already filtered record set.
pub fn compose_report(records: &[SegmentRecord], top_products: usize) -> Result<Report, ReportError> {
    let total_units = aggregate::total_quantity(records)?;

    let product_totals = aggregate::by_product(records)?;
    let marketplace_totals = aggregate::by_marketplace(records)?;
    let category_totals = aggregate::by_category(records)?;
    let pair_totals = aggregate::by_marketplace_category(records)?;
    check_grouping("product", &product_totals, total_units)?;
    check_grouping("marketplace", &marketplace_totals, total_units)?;
    check_grouping("category", &category_totals, total_units)?;
    check_grouping("marketplace/category", &pair_totals, total_units)?;

    let marketplace_count = marketplace_totals.len();
    let product_count = product_totals.len();
    let category_count = category_totals.len();

    let products = rank(product_totals);
    let marketplaces = rank(marketplace_totals);
    let categories = rank(category_totals);

    let top = with_shares(top_n(&products, top_products.min(TOP_PRODUCTS)), total_units)?;
    let marketplace_groups = with_shares(&marketplaces, total_units)?;
    let category_groups = with_shares(&categories, total_units)?;

    let top_products_quantity = combined_quantity(&top);
    let narrative = Narrative {
        top3_marketplace_share: aggregate::share_percent(
            combined_quantity(top_n(&marketplace_groups, TOP_MARKETPLACES)),
            total_units,
        ),
        top20_product_share: aggregate::share_percent(
            top_n(&products, TOP_PRODUCTS).iter().map(|(_, q)| *q).sum(),
            total_units,
        ),
        top5_category_share: aggregate::share_percent(
            combined_quantity(top_n(&category_groups, TOP_CATEGORIES)),
            total_units,
        ),
    };
    let highlights = Highlights {
        top_marketplace: leader(&marketplaces),
        top_product: leader(&products),
        top_category: leader(&categories),
    };

    log::info!(
        "Composed report: {} units, {} marketplaces, {} products, {} categories",
        total_units,
        marketplace_count,
        product_count,
        category_count
    );

    Ok(Report {
        total_units,
        marketplace_count,
        product_count,
        category_count,
        top_products: top
            .into_iter()
            .map(|g| ProductShare {
                name: g.key,
                quantity: g.total_quantity,
                share_percent: g.share_percent,
            })
            .collect(),
        top_products_quantity,
        marketplace_ranking: marketplace_groups
            .into_iter()
            .map(|g| MarketplaceShare {
                marketplace: g.key,
                quantity: g.total_quantity,
                share_percent: g.share_percent,
            })
            .collect(),
        category_ranking: category_groups
            .into_iter()
            .map(|g| CategoryShare {
                category: g.key,
                quantity: g.total_quantity,
                share_percent: g.share_percent,
            })
            .collect(),
        pivot: PivotTable::from_totals(pair_totals),
        narrative,
        highlights,
    })
}

/// Filter the loaded table to the segment, apply the marketplace selection
/// and compose the report.
pub fn generate_report<S: AsRef<str>>(
    records: &[SalesRecord],
    allow_list: &[S],
    selection: &[String],
    top_products: usize,
) -> Result<Report, ReportError> {
    let segment = filter::filter(records, allow_list);
    compose_report(&segment.select(selection), top_products)
}

pub fn product_rows(report: &Report) -> Vec<ProductRankingRow> {
    report
        .top_products
        .iter()
        .enumerate()
        .map(|(idx, p)| ProductRankingRow {
            rank: idx + 1,
            product: p.name.clone(),
            quantity: format_int(p.quantity),
            share_pct: format_percent(p.share_percent),
        })
        .collect()
}

pub fn marketplace_rows(report: &Report) -> Vec<MarketplaceRankingRow> {
    report
        .marketplace_ranking
        .iter()
        .enumerate()
        .map(|(idx, m)| MarketplaceRankingRow {
            rank: idx + 1,
            marketplace: m.marketplace.clone(),
            total_quantity: format_int(m.quantity),
            market_share: format_percent(m.share_percent),
        })
        .collect()
}

pub fn category_rows(report: &Report) -> Vec<CategoryRankingRow> {
    report
        .category_ranking
        .iter()
        .enumerate()
        .map(|(idx, c)| CategoryRankingRow {
            rank: idx + 1,
            category: c.category.clone(),
            total_quantity: format_int(c.quantity),
            category_share: format_percent(c.share_percent),
        })
        .collect()
}
