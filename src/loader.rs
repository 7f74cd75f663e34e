use crate::error::LoadError;
use crate::types::{RawRow, SalesRecord, QUANTITY_COLUMN, QUANTITY_EXPORT_COLUMN};
use crate::util::parse_quantity_safe;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub marketplaces: usize,
    /// Rows repeating an earlier (marketplace, variant) pair. They are summed
    /// downstream like any other row.
    pub duplicate_pairs: usize,
}

pub fn load_sales(path: &Path) -> Result<(Vec<SalesRecord>, LoadReport), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = load_sales_from_reader(file)?;
    log::info!(
        "Loaded {} sales rows from {}",
        loaded.1.total_rows,
        path.display()
    );
    Ok(loaded)
}

pub fn load_sales_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<SalesRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    check_headers(rdr.headers()?)?;

    let mut records: Vec<SalesRecord> = Vec::new();
    let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
    let mut marketplaces: HashSet<String> = HashSet::new();
    let mut duplicate_pairs = 0usize;

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = idx as u64 + 2;
        let row = result?;

        let marketplace_key = required_text(row.marketplace_key, "marketplace_key", line)?;
        let variant_name = required_text(row.variant_name, "variant_name", line)?;
        let quantity = parse_quantity_safe(row.quantity.as_deref()).ok_or_else(|| {
            LoadError::InvalidRow {
                line,
                reason: format!(
                    "quantity {:?} is not a non-negative integer",
                    row.quantity.as_deref().unwrap_or("")
                ),
            }
        })?;

        if !seen_pairs.insert((marketplace_key.clone(), variant_name.clone())) {
            duplicate_pairs += 1;
        }
        marketplaces.insert(marketplace_key.clone());
        records.push(SalesRecord {
            marketplace_key,
            variant_name,
            quantity,
        });
    }

    if duplicate_pairs > 0 {
        log::warn!(
            "{} rows repeat a (marketplace, variant) pair; their quantities are summed",
            duplicate_pairs
        );
    }

    let report = LoadReport {
        total_rows: records.len(),
        marketplaces: marketplaces.len(),
        duplicate_pairs,
    };
    Ok((records, report))
}

fn check_headers(headers: &StringRecord) -> Result<(), LoadError> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    for column in ["marketplace_key", "variant_name"] {
        if !has(column) {
            return Err(LoadError::MissingColumn(column.to_string()));
        }
    }
    match (has(QUANTITY_COLUMN), has(QUANTITY_EXPORT_COLUMN)) {
        (false, false) => return Err(LoadError::MissingColumn(QUANTITY_COLUMN.to_string())),
        (true, true) => {
            return Err(LoadError::ConflictingColumns(
                QUANTITY_COLUMN.to_string(),
                QUANTITY_EXPORT_COLUMN.to_string(),
            ))
        }
        _ => {}
    }
    Ok(())
}

fn required_text(value: Option<String>, column: &str, line: u64) -> Result<String, LoadError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LoadError::InvalidRow {
            line,
            reason: format!("{} is blank", column),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<(Vec<SalesRecord>, LoadReport), LoadError> {
        load_sales_from_reader(csv.as_bytes())
    }

    #[test]
    fn loads_export_with_aggregate_column_name() {
        let csv = "marketplace_key,variant_name,SUM(quantity)\n\
                   AmazonUS,Rug-Red,10\n\
                   Walmart, Rug-Blue ,5.0\n";
        let (records, report) = load(csv).unwrap();
        assert_eq!(
            records,
            vec![
                SalesRecord::new("AmazonUS", "Rug-Red", 10),
                SalesRecord::new("Walmart", "Rug-Blue", 5),
            ]
        );
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.marketplaces, 2);
        assert_eq!(report.duplicate_pairs, 0);
    }

    #[test]
    fn ignores_extra_columns_and_order() {
        let csv = "quantity,sku_id,variant_name,marketplace_key\n3,17,Lamp-Gold,AmazonUS\n";
        let (records, _) = load(csv).unwrap();
        assert_eq!(records, vec![SalesRecord::new("AmazonUS", "Lamp-Gold", 3)]);
    }

    #[test]
    fn missing_column_is_named() {
        let err = load("marketplace_key,quantity\nAmazonUS,1\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "variant_name"));

        let err = load("marketplace_key,variant_name,qty\nAmazonUS,Rug,1\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "quantity"));
        assert_eq!(err.to_string(), "missing required column `quantity`");
    }

    #[test]
    fn both_quantity_columns_are_rejected() {
        let csv = "marketplace_key,variant_name,quantity,SUM(quantity)\nAmazonUS,Rug,1,1\n";
        let err = load(csv).unwrap_err();
        assert!(matches!(err, LoadError::ConflictingColumns(..)));
        assert_eq!(
            err.to_string(),
            "columns `quantity` and `SUM(quantity)` both hold the quantity; keep only one"
        );
    }

    #[test]
    fn invalid_quantity_reports_line() {
        let csv = "marketplace_key,variant_name,quantity\nAmazonUS,Rug,1\nWalmart,Lamp,-2\n";
        match load(csv).unwrap_err() {
            LoadError::InvalidRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("-2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_variant_is_rejected() {
        let csv = "marketplace_key,variant_name,quantity\nAmazonUS,,4\n";
        let err = load(csv).unwrap_err();
        assert_eq!(err.to_string(), "line 2: variant_name is blank");
    }

    #[test]
    fn counts_duplicate_pairs() {
        let csv = "marketplace_key,variant_name,quantity\n\
                   AmazonUS,Rug-Red,1\nAmazonUS,Rug-Red,2\nWalmart,Rug-Red,3\n";
        let (records, report) = load(csv).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(report.duplicate_pairs, 1);
    }

    #[test]
    fn header_only_source_is_empty_not_an_error() {
        let (records, report) = load("marketplace_key,variant_name,quantity\n").unwrap();
        assert!(records.is_empty());
        assert_eq!(report.total_rows, 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_sales(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
