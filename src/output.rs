use crate::pivot::PivotTable;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the pivot as a zero-filled matrix with a `Marketplace` label column.
pub fn write_pivot_csv(path: &Path, pivot: &PivotTable) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["Marketplace".to_string()];
    header.extend(pivot.categories().iter().cloned());
    wtr.write_record(&header)?;
    for (marketplace, row) in pivot.dense_rows() {
        let mut record = vec![marketplace];
        record.extend(row.iter().map(|q| q.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn preview_pivot(pivot: &PivotTable, max_rows: usize) {
    if pivot.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    let mut header = vec!["Marketplace".to_string()];
    header.extend(pivot.categories().iter().cloned());
    builder.push_record(header);
    for (marketplace, row) in pivot.dense_rows().into_iter().take(max_rows) {
        let mut record = vec![marketplace];
        record.extend(row.iter().map(|q| q.to_string()));
        builder.push_record(record);
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn pivot_csv_is_zero_filled() {
        let mut totals = HashMap::new();
        totals.insert(("AmazonUS".to_string(), "Rug".to_string()), 10);
        totals.insert(("Walmart".to_string(), "Lamp".to_string()), 2);
        let pivot = PivotTable::from_totals(totals);

        let dir = tempdir().unwrap();
        let path = dir.path().join("pivot.csv");
        write_pivot_csv(&path, &pivot).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Marketplace,Lamp,Rug\nAmazonUS,0,10\nWalmart,2,0\n");
    }
}
