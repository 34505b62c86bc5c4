// src/analysis/assemble.rs

use std::collections::HashSet;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use log::{info, warn};

use crate::data::{DataStore, Flow, WorldRecord};
use crate::analysis::filter::{
    AnalysisMode, FilterSpec, PartitionPlan, partition_plan, within_month_bounds, WORLD, ALL_UFS,
};

/// A trade row after assembly: raw partition fields plus the derived product
/// and country names (raw code substituted when the lookup misses — rows are
/// never dropped for a missing reference entry) and the calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRecord {
    pub year: i32,
    pub month: u32,
    pub ncm: String,
    pub country_code: String,
    pub state: String,
    pub fob: f64,
    pub kg: f64,
    pub product: String,
    pub country: String,
    pub date: NaiveDate,
}

/// What the tariff monitor did to the export set, for the banner in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorOutcome {
    /// False when the monitored list could not be loaded; the toggle then has
    /// no filtering effect and the UI shows a warning instead of counts.
    pub applied: bool,
    pub rows_before: usize,
    pub rows_after: usize,
}

/// The materialized output of one analysis trigger. Fully recomputed per
/// trigger; the UI swaps it in wholesale, discarding the previous result.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub mode: AnalysisMode,
    pub country_label: String,
    pub uf_label: String,
    pub export: Vec<AssembledRecord>,
    pub import: Vec<AssembledRecord>,
    /// Filtered world totals; present only in export/import mode.
    pub world: Option<Vec<WorldRecord>>,
    pub monitor: Option<MonitorOutcome>,
}

impl AnalysisResult {
    /// The record set the single-flow views (overview, products, tables)
    /// operate on. Balance mode has its own two-flow views.
    pub fn selection(&self) -> &[AssembledRecord] {
        match self.mode {
            AnalysisMode::Import => &self.import,
            _ => &self.export,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.export.is_empty() && self.import.is_empty()
    }
}

/// Runs one full analysis: validates the spec, resolves the partition plan,
/// assembles each requested flow, loads world totals when the mode needs
/// them, and applies the tariff-monitor and explicit-NCM intersections.
pub fn run_analysis(store: &mut DataStore, spec: &FilterSpec, current_year: i32) -> Result<AnalysisResult> {
    spec.validate()?;
    let plan = partition_plan(spec.start, spec.end, current_year);

    let country_code = if spec.country == WORLD {
        None
    } else {
        Some(
            store
                .tables
                .country_code_by_name
                .get(&spec.country)
                .cloned()
                .ok_or_else(|| anyhow!("País desconhecido: {}", spec.country))?,
        )
    };
    let uf = if spec.uf == ALL_UFS { None } else { Some(spec.uf.clone()) };

    let mut export = Vec::new();
    let mut import = Vec::new();
    for &flow in spec.mode.flows() {
        let assembled = assemble_flow(
            store,
            flow,
            spec,
            plan,
            country_code.as_deref(),
            uf.as_deref(),
            current_year,
        )?;
        info!("{} {}: {} registros montados", spec.mode.label(), flow.as_str(), assembled.len());
        match flow {
            Flow::Export => export = assembled,
            Flow::Import => import = assembled,
        }
    }

    let mut world = match spec.mode.world_flow() {
        Some(flow) => Some(assemble_world(store, flow, spec, plan, current_year)?),
        None => None,
    };

    // Tariff monitor first, then the explicit NCM list; both intersections
    // apply when both are given.
    let mut monitor = None;
    if spec.mode == AnalysisMode::Export && spec.monitor {
        let rows_before = export.len();
        if store.monitored_ncms.is_empty() {
            warn!("Monitor de Tarifados está ativo, mas a lista de NCMs não pôde ser carregada.");
            monitor = Some(MonitorOutcome { applied: false, rows_before, rows_after: rows_before });
        } else {
            let monitored = &store.monitored_ncms;
            export.retain(|r| monitored.contains(&r.ncm));
            if let Some(world) = world.as_mut() {
                world.retain(|r| monitored.contains(&r.ncm));
            }
            monitor = Some(MonitorOutcome { applied: true, rows_before, rows_after: export.len() });
        }
    }

    let ncm_set = spec.ncm_set();
    if !ncm_set.is_empty() {
        retain_ncms(&mut export, &ncm_set);
        retain_ncms(&mut import, &ncm_set);
        if let Some(world) = world.as_mut() {
            world.retain(|r| ncm_set.contains(&r.ncm));
        }
    }

    Ok(AnalysisResult {
        mode: spec.mode,
        country_label: spec.country.clone(),
        uf_label: spec.uf.clone(),
        export,
        import,
        world,
        monitor,
    })
}

fn retain_ncms(records: &mut Vec<AssembledRecord>, ncms: &HashSet<String>) {
    records.retain(|r| ncms.contains(&r.ncm));
}

/// Assembles one flow direction: conditional partition loads, country/UF
/// equality filters, historical + current-year concatenation in load order,
/// name attachment, month-boundary trim.
fn assemble_flow(
    store: &mut DataStore,
    flow: Flow,
    spec: &FilterSpec,
    plan: PartitionPlan,
    country_code: Option<&str>,
    uf: Option<&str>,
    current_year: i32,
) -> Result<Vec<AssembledRecord>> {
    let mut assembled = Vec::new();

    if plan.historical {
        let partition = store.trade_partition(flow, "historico")?;
        for record in partition.iter() {
            if record.year < spec.start.year || record.year > spec.end.year {
                continue;
            }
            if matches_filters(record.country.as_str(), record.state.as_str(), country_code, uf)
                && within_month_bounds(record.year, record.month, spec.start, spec.end)
            {
                assembled.push(assemble_record(store, record)?);
            }
        }
    }

    if plan.current_year {
        let partition = store.trade_partition(flow, &format!("historico_{}", current_year))?;
        for record in partition.iter() {
            if matches_filters(record.country.as_str(), record.state.as_str(), country_code, uf)
                && within_month_bounds(record.year, record.month, spec.start, spec.end)
            {
                assembled.push(assemble_record(store, record)?);
            }
        }
    }

    Ok(assembled)
}

fn matches_filters(country: &str, state: &str, country_code: Option<&str>, uf: Option<&str>) -> bool {
    country_code.map_or(true, |code| country == code) && uf.map_or(true, |uf| state == uf)
}

fn assemble_record(store: &DataStore, record: &crate::data::TradeRecord) -> Result<AssembledRecord> {
    let date = NaiveDate::from_ymd_opt(record.year, record.month, 1)
        .ok_or_else(|| anyhow!("Invalid year/month in partition: {}-{}", record.year, record.month))?;
    let product = store
        .tables
        .product_name(&record.ncm)
        .unwrap_or(record.ncm.as_str())
        .to_string();
    let country = store
        .tables
        .country_name(&record.country)
        .unwrap_or(record.country.as_str())
        .to_string();
    Ok(AssembledRecord {
        year: record.year,
        month: record.month,
        ncm: record.ncm.clone(),
        country_code: record.country.clone(),
        state: record.state.clone(),
        fob: record.fob,
        kg: record.kg,
        product,
        country,
        date,
    })
}

/// World totals: the historical world partition bounded by the year range,
/// plus the current-year world partition when the plan touches it, trimmed by
/// the same month-boundary predicate as the selection.
fn assemble_world(
    store: &mut DataStore,
    flow: Flow,
    spec: &FilterSpec,
    plan: PartitionPlan,
    current_year: i32,
) -> Result<Vec<WorldRecord>> {
    let mut combined: Vec<WorldRecord> = store
        .world_partition(flow, "world_totals")?
        .iter()
        .filter(|r| r.year >= spec.start.year && r.year <= spec.end.year)
        .cloned()
        .collect();

    if plan.current_year {
        combined.extend(store.world_partition(flow, &format!("world_totals_{}", current_year))?.iter().cloned());
    }

    combined.retain(|r| within_month_bounds(r.year, r.month, spec.start, spec.end));
    Ok(combined)
}
