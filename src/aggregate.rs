use crate::error::ReportError;
use crate::types::SegmentRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

fn add_quantity(acc: u64, quantity: u64, what: &str) -> Result<u64, ReportError> {
    acc.checked_add(quantity)
        .ok_or_else(|| ReportError::QuantityOverflow(what.to_string()))
}

/// Units held by a record set.
pub fn total_quantity(records: &[SegmentRecord]) -> Result<u64, ReportError> {
    records
        .iter()
        .try_fold(0u64, |acc, r| add_quantity(acc, r.quantity, "total units"))
}

/// Sum `quantity` over records sharing the same group key.
pub fn aggregate<K, F>(records: &[SegmentRecord], key_fn: F) -> Result<HashMap<K, u64>, ReportError>
where
    K: Eq + Hash,
    F: Fn(&SegmentRecord) -> K,
{
    let mut totals: HashMap<K, u64> = HashMap::new();
    for r in records {
        let slot = totals.entry(key_fn(r)).or_insert(0);
        *slot = add_quantity(*slot, r.quantity, "a group total")?;
    }
    Ok(totals)
}

pub fn by_product(records: &[SegmentRecord]) -> Result<HashMap<String, u64>, ReportError> {
    aggregate(records, |r| r.variant_name.clone())
}

pub fn by_marketplace(records: &[SegmentRecord]) -> Result<HashMap<String, u64>, ReportError> {
    aggregate(records, |r| r.marketplace_key.clone())
}

pub fn by_category(records: &[SegmentRecord]) -> Result<HashMap<String, u64>, ReportError> {
    aggregate(records, |r| r.category.clone())
}

pub fn by_marketplace_category(
    records: &[SegmentRecord],
) -> Result<HashMap<(String, String), u64>, ReportError> {
    aggregate(records, |r| (r.marketplace_key.clone(), r.category.clone()))
}

pub fn grand_total<K>(totals: &HashMap<K, u64>) -> Result<u64, ReportError> {
    totals
        .values()
        .try_fold(0u64, |acc, q| add_quantity(acc, *q, "a grand total"))
}

/// `quantity` as a percentage of `grand_total`; 0 when the grand total is 0.
pub fn share_percent(quantity: u64, grand_total: u64) -> f64 {
    if grand_total == 0 {
        return 0.0;
    }
    quantity as f64 / grand_total as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateGroup<K> {
    pub key: K,
    pub total_quantity: u64,
    pub share_percent: f64,
}

/// Attach shares to ranked totals. A zero grand total alongside a non-zero
/// group means the grouping is inconsistent and is reported, not repaired.
pub fn with_shares<K: Clone>(
    ranked: &[(K, u64)],
    grand_total: u64,
) -> Result<Vec<AggregateGroup<K>>, ReportError> {
    if grand_total == 0 && ranked.iter().any(|(_, q)| *q > 0) {
        return Err(ReportError::InvariantViolation(
            "grand total is 0 but some groups have non-zero quantity".to_string(),
        ));
    }
    Ok(ranked
        .iter()
        .map(|(key, total)| AggregateGroup {
            key: key.clone(),
            total_quantity: *total,
            share_percent: share_percent(*total, grand_total),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(marketplace: &str, variant: &str, category: &str, quantity: u64) -> SegmentRecord {
        SegmentRecord {
            marketplace_key: marketplace.to_string(),
            variant_name: variant.to_string(),
            category: category.to_string(),
            quantity,
        }
    }

    fn sample() -> Vec<SegmentRecord> {
        vec![
            rec("AmazonUS", "Rug-Red", "Rug", 10),
            rec("Walmart", "Rug-Blue", "Rug", 5),
            rec("AmazonUS", "Lamp-Gold", "Lamp", 3),
            rec("AmazonUS", "Rug-Red", "Rug", 2),
        ]
    }

    #[test]
    fn groupings_sum_to_record_total() {
        let data = sample();
        let total: u64 = data.iter().map(|r| r.quantity).sum();
        assert_eq!(total_quantity(&data).unwrap(), total);
        assert_eq!(grand_total(&by_product(&data).unwrap()).unwrap(), total);
        assert_eq!(grand_total(&by_marketplace(&data).unwrap()).unwrap(), total);
        assert_eq!(grand_total(&by_category(&data).unwrap()).unwrap(), total);
        assert_eq!(
            grand_total(&by_marketplace_category(&data).unwrap()).unwrap(),
            total
        );
    }

    #[test]
    fn duplicate_rows_are_summed() {
        let products = by_product(&sample()).unwrap();
        assert_eq!(products["Rug-Red"], 12);
        let pairs = by_marketplace_category(&sample()).unwrap();
        assert_eq!(pairs[&("AmazonUS".to_string(), "Rug".to_string())], 12);
        assert_eq!(pairs.get(&("Walmart".to_string(), "Lamp".to_string())), None);
    }

    #[test]
    fn shares_sum_to_hundred() {
        let totals = by_category(&sample()).unwrap();
        let mut ranked: Vec<(String, u64)> = totals.clone().into_iter().collect();
        ranked.sort();
        let groups = with_shares(&ranked, grand_total(&totals).unwrap()).unwrap();
        let sum: f64 = groups.iter().map(|g| g.share_percent).sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn zero_grand_total_gives_zero_shares() {
        assert_eq!(share_percent(0, 0), 0.0);
        assert_eq!(share_percent(5, 0), 0.0);
        let groups = with_shares(&[("A".to_string(), 0)], 0).unwrap();
        assert_eq!(groups[0].share_percent, 0.0);
        assert!(with_shares::<String>(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn zero_grand_total_with_quantity_is_violation() {
        let err = with_shares(&[("A".to_string(), 4)], 0).unwrap_err();
        assert!(matches!(err, ReportError::InvariantViolation(_)));
    }

    #[test]
    fn overflowing_quantities_are_reported() {
        let data = vec![
            rec("AmazonUS", "Rug-Red", "Rug", u64::MAX),
            rec("AmazonUS", "Rug-Red", "Rug", 1),
        ];
        assert!(matches!(
            total_quantity(&data),
            Err(ReportError::QuantityOverflow(_))
        ));
        assert!(matches!(
            by_product(&data),
            Err(ReportError::QuantityOverflow(_))
        ));

        let mut totals = HashMap::new();
        totals.insert("Rug-Red", u64::MAX);
        totals.insert("Rug-Blue", 1);
        assert!(grand_total(&totals).is_err());
    }
}
