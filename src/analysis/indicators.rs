// src/analysis/indicators.rs

use std::collections::HashMap;
use chrono::NaiveDate;

use crate::data::WorldRecord;
use crate::analysis::assemble::AssembledRecord;

/// Derived per-product row for the detailed product view.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductIndicator {
    pub ncm: String,
    pub product: String,
    /// Summed FOB over the filtered selection.
    pub total_fob: f64,
    /// Share of this product in the filtered total, in percent. 0 when the
    /// selection total is 0.
    pub share: f64,
    /// Worldwide FOB for the same product; 0 when the product is absent from
    /// the world set. None when no world totals were loaded.
    pub world_fob: Option<f64>,
    /// Selection FOB over world FOB, in percent. 0 when the world FOB is 0.
    pub concentration: Option<f64>,
}

/// Groups the selection by product, computes share-in-mix and, when world
/// totals are available, the concentration coefficient. Output is sorted by
/// selection total descending (ties broken by NCM code so repeated runs are
/// byte-identical).
pub fn product_indicators(
    records: &[AssembledRecord],
    world: Option<&[WorldRecord]>,
) -> Vec<ProductIndicator> {
    let mut totals: HashMap<&str, (f64, &str)> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.ncm.as_str()).or_insert((0.0, record.product.as_str()));
        entry.0 += record.fob;
    }
    let selection_total: f64 = totals.values().map(|(fob, _)| fob).sum();

    let world_totals: Option<HashMap<&str, f64>> = world.map(|world| {
        let mut map: HashMap<&str, f64> = HashMap::new();
        for record in world {
            *map.entry(record.ncm.as_str()).or_insert(0.0) += record.fob;
        }
        map
    });

    let mut indicators: Vec<ProductIndicator> = totals
        .into_iter()
        .map(|(ncm, (total_fob, product))| {
            let share = if selection_total > 0.0 {
                total_fob / selection_total * 100.0
            } else {
                0.0
            };
            let world_fob = world_totals
                .as_ref()
                .map(|map| map.get(ncm).copied().unwrap_or(0.0));
            let concentration = world_fob.map(|world_fob| {
                if world_fob > 0.0 {
                    total_fob / world_fob * 100.0
                } else {
                    0.0
                }
            });
            ProductIndicator {
                ncm: ncm.to_string(),
                product: product.to_string(),
                total_fob,
                share,
                world_fob,
                concentration,
            }
        })
        .collect();

    indicators.sort_by(|a, b| {
        b.total_fob
            .partial_cmp(&a.total_fob)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ncm.cmp(&b.ncm))
    });
    indicators
}

/// Monthly FOB totals for the evolution line chart, in date order.
pub fn monthly_totals(records: &[AssembledRecord]) -> Vec<(NaiveDate, f64)> {
    let mut by_date: std::collections::BTreeMap<NaiveDate, f64> = std::collections::BTreeMap::new();
    for record in records {
        *by_date.entry(record.date).or_insert(0.0) += record.fob;
    }
    by_date.into_iter().collect()
}

/// Summed FOB over the whole selection, for the headline metric.
pub fn total_fob(records: &[AssembledRecord]) -> f64 {
    records.iter().map(|r| r.fob).sum()
}
