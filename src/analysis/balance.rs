// src/analysis/balance.rs

use std::collections::BTreeMap;
use chrono::NaiveDate;

use crate::analysis::assemble::AssembledRecord;

/// One point of the export/import/balance time series.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub export: f64,
    pub import: f64,
    pub balance: f64,
}

/// One row of the per-product balance table.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub ncm: String,
    pub product: String,
    pub export: f64,
    pub import: f64,
    pub balance: f64,
}

/// Outer-aligns the two flows by calendar date: a date present in only one
/// flow reads 0 on the other side. Balance = export − import.
pub fn balance_series(export: &[AssembledRecord], import: &[AssembledRecord]) -> Vec<BalancePoint> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in export {
        by_date.entry(record.date).or_insert((0.0, 0.0)).0 += record.fob;
    }
    for record in import {
        by_date.entry(record.date).or_insert((0.0, 0.0)).1 += record.fob;
    }
    by_date
        .into_iter()
        .map(|(date, (export, import))| BalancePoint {
            date,
            export,
            import,
            balance: export - import,
        })
        .collect()
}

/// Outer-aligns the two flows by product: a product appearing in only one
/// flow still appears in the table with the missing flow's value as 0.
/// Rows come out sorted by balance descending for the consolidated table.
pub fn balance_by_product(export: &[AssembledRecord], import: &[AssembledRecord]) -> Vec<BalanceRow> {
    let mut by_ncm: BTreeMap<&str, (&str, f64, f64)> = BTreeMap::new();
    for record in export {
        let entry = by_ncm
            .entry(record.ncm.as_str())
            .or_insert((record.product.as_str(), 0.0, 0.0));
        entry.1 += record.fob;
    }
    for record in import {
        let entry = by_ncm
            .entry(record.ncm.as_str())
            .or_insert((record.product.as_str(), 0.0, 0.0));
        entry.2 += record.fob;
    }

    let mut rows: Vec<BalanceRow> = by_ncm
        .into_iter()
        .map(|(ncm, (product, export, import))| BalanceRow {
            ncm: ncm.to_string(),
            product: product.to_string(),
            export,
            import,
            balance: export - import,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.balance
            .partial_cmp(&a.balance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ncm.cmp(&b.ncm))
    });
    rows
}

/// Picks the `n` products with the largest absolute balance, then re-sorts
/// them ascending by signed balance so the chart runs from the deepest
/// deficit to the largest surplus.
pub fn top_impact(rows: &[BalanceRow], n: usize) -> Vec<BalanceRow> {
    let mut ranked: Vec<BalanceRow> = rows.to_vec();
    ranked.sort_by(|a, b| {
        b.balance
            .abs()
            .partial_cmp(&a.balance.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ncm.cmp(&b.ncm))
    });
    ranked.truncate(n);
    ranked.sort_by(|a, b| {
        a.balance
            .partial_cmp(&b.balance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ncm.cmp(&b.ncm))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ncm: &str, product: &str, year: i32, month: u32, fob: f64) -> AssembledRecord {
        AssembledRecord {
            year,
            month,
            ncm: ncm.to_string(),
            country_code: "249".to_string(),
            state: "SP".to_string(),
            fob,
            kg: 1.0,
            product: product.to_string(),
            country: "Estados Unidos".to_string(),
            date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
        }
    }

    #[test]
    fn one_sided_product_reads_zero_on_the_missing_flow() {
        let export = vec![record("2709", "Petroleo", 2023, 1, 100.0)];
        let import: Vec<AssembledRecord> = Vec::new();

        let rows = balance_by_product(&export, &import);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].export, 100.0);
        assert_eq!(rows[0].import, 0.0);
        assert_eq!(rows[0].balance, 100.0);
    }

    #[test]
    fn series_outer_aligns_dates() {
        let export = vec![
            record("2709", "Petroleo", 2023, 1, 100.0),
            record("2709", "Petroleo", 2023, 3, 40.0),
        ];
        let import = vec![
            record("8471", "Maquinas", 2023, 2, 60.0),
            record("8471", "Maquinas", 2023, 3, 90.0),
        ];

        let series = balance_series(&export, &import);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!((series[0].export, series[0].import, series[0].balance), (100.0, 0.0, 100.0));
        assert_eq!((series[1].export, series[1].import, series[1].balance), (0.0, 60.0, -60.0));
        assert_eq!((series[2].export, series[2].import, series[2].balance), (40.0, 90.0, -50.0));
    }

    #[test]
    fn balance_column_matches_export_minus_import() {
        let export = vec![
            record("2709", "Petroleo", 2023, 1, 100.0),
            record("2709", "Petroleo", 2023, 2, 50.0),
            record("1001", "Trigo", 2023, 1, 30.0),
        ];
        let import = vec![
            record("2709", "Petroleo", 2023, 1, 20.0),
            record("8471", "Maquinas", 2023, 1, 80.0),
        ];

        let rows = balance_by_product(&export, &import);
        for row in &rows {
            assert_eq!(row.balance, row.export - row.import);
        }
        // Sorted by balance descending.
        assert_eq!(rows[0].ncm, "2709");
        assert_eq!(rows[0].balance, 130.0);
        assert_eq!(rows[2].ncm, "8471");
        assert_eq!(rows[2].balance, -80.0);
    }

    #[test]
    fn top_impact_ranks_by_magnitude_then_sorts_by_sign() {
        let rows = vec![
            BalanceRow { ncm: "1".into(), product: "a".into(), export: 10.0, import: 0.0, balance: 10.0 },
            BalanceRow { ncm: "2".into(), product: "b".into(), export: 0.0, import: 90.0, balance: -90.0 },
            BalanceRow { ncm: "3".into(), product: "c".into(), export: 50.0, import: 0.0, balance: 50.0 },
            BalanceRow { ncm: "4".into(), product: "d".into(), export: 0.0, import: 5.0, balance: -5.0 },
        ];

        let top = top_impact(&rows, 3);
        // 10 and -5 are the smallest magnitudes; -5 is dropped first.
        let balances: Vec<f64> = top.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![-90.0, 10.0, 50.0]);
    }
}
