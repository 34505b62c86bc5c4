// src/analysis/filter.rs

use std::collections::HashSet;
use anyhow::{Result, anyhow};

use crate::data::Flow;

/// Country selector value meaning "all partners".
pub const WORLD: &str = "Mundo";
/// State selector value meaning "all states".
pub const ALL_UFS: &str = "Todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Export,
    Import,
    Balance,
}

impl AnalysisMode {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Export => "Exportação",
            AnalysisMode::Import => "Importação",
            AnalysisMode::Balance => "Saldo Comercial",
        }
    }

    /// Flow directions this mode needs assembled.
    pub fn flows(&self) -> &'static [Flow] {
        match self {
            AnalysisMode::Export => &[Flow::Export],
            AnalysisMode::Import => &[Flow::Import],
            AnalysisMode::Balance => &[Flow::Export, Flow::Import],
        }
    }

    /// The single flow whose world totals feed the concentration coefficient.
    /// Balance mode has no concentration view and loads no world totals.
    pub fn world_flow(&self) -> Option<Flow> {
        match self {
            AnalysisMode::Export => Some(Flow::Export),
            AnalysisMode::Import => Some(Flow::Import),
            AnalysisMode::Balance => None,
        }
    }
}

/// A calendar month. Ord derives year-then-month, which is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

/// Everything the user chose in the sidebar, resolved to plain values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub mode: AnalysisMode,
    pub start: Period,
    pub end: Period,
    /// Partner country name, or [`WORLD`] for all partners.
    pub country: String,
    /// UF abbreviation, or [`ALL_UFS`] for all states.
    pub uf: String,
    /// Free-text NCM list exactly as typed.
    pub ncm_text: String,
    /// Tariff-monitor toggle; only honored in export mode.
    pub monitor: bool,
}

impl FilterSpec {
    /// Fails fast, before any data access, when the range is inverted.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(anyhow!("A data de início não pode ser posterior à data de fim."));
        }
        Ok(())
    }

    /// Parses the free-text NCM list: codes separated by comma, whitespace or
    /// newlines; empty tokens dropped.
    pub fn ncm_set(&self) -> HashSet<String> {
        parse_ncm_list(&self.ncm_text)
    }
}

/// Which partitions the requested range touches, relative to the current
/// year: "historical" holds complete years up to (current - 1), the
/// current-year partition holds the partial year in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlan {
    pub historical: bool,
    pub current_year: bool,
}

pub fn partition_plan(start: Period, end: Period, current_year: i32) -> PartitionPlan {
    PartitionPlan {
        historical: start <= Period::new(current_year - 1, 12),
        current_year: end >= Period::new(current_year, 1),
    }
}

/// Month-boundary predicate: a row survives unless it falls in the start
/// year before the start month, or in the end year after the end month.
/// Year bounds are enforced separately when loading the historical partition.
pub fn within_month_bounds(year: i32, month: u32, start: Period, end: Period) -> bool {
    !((year == start.year && month < start.month) || (year == end.year && month > end.month))
}

pub fn parse_ncm_list(text: &str) -> HashSet<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(start: Period, end: Period) -> FilterSpec {
        FilterSpec {
            mode: AnalysisMode::Export,
            start,
            end,
            country: WORLD.to_string(),
            uf: ALL_UFS.to_string(),
            ncm_text: String::new(),
            monitor: false,
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let bad = spec(Period::new(2024, 6), Period::new(2024, 5));
        assert!(bad.validate().is_err());
        let same_month = spec(Period::new(2024, 5), Period::new(2024, 5));
        assert!(same_month.validate().is_ok());
    }

    #[test]
    fn plan_matches_partition_boundaries() {
        // Entirely in complete prior years.
        let plan = partition_plan(Period::new(2023, 1), Period::new(2023, 12), 2025);
        assert_eq!(plan, PartitionPlan { historical: true, current_year: false });

        // Entirely in the current partial year.
        let plan = partition_plan(Period::new(2025, 2), Period::new(2025, 6), 2025);
        assert_eq!(plan, PartitionPlan { historical: false, current_year: true });

        // Straddles the boundary: both partitions needed to cover the range.
        let plan = partition_plan(Period::new(2024, 11), Period::new(2025, 3), 2025);
        assert_eq!(plan, PartitionPlan { historical: true, current_year: true });

        // Exact boundary months.
        let plan = partition_plan(Period::new(2024, 12), Period::new(2024, 12), 2025);
        assert_eq!(plan, PartitionPlan { historical: true, current_year: false });
        let plan = partition_plan(Period::new(2025, 1), Period::new(2025, 1), 2025);
        assert_eq!(plan, PartitionPlan { historical: false, current_year: true });
    }

    #[test]
    fn month_bounds_trim_only_edge_years() {
        let start = Period::new(2023, 3);
        let end = Period::new(2024, 9);
        assert!(!within_month_bounds(2023, 2, start, end));
        assert!(within_month_bounds(2023, 3, start, end));
        assert!(within_month_bounds(2023, 12, start, end));
        // Middle years are untouched by the month predicate.
        assert!(within_month_bounds(2024, 1, start, end));
        assert!(within_month_bounds(2024, 9, start, end));
        assert!(!within_month_bounds(2024, 10, start, end));
    }

    #[test]
    fn ncm_list_tokenizer_handles_mixed_separators() {
        let set = parse_ncm_list("1001, 2709\n 8471,,  \n27101259");
        assert_eq!(set.len(), 4);
        assert!(set.contains("1001"));
        assert!(set.contains("2709"));
        assert!(set.contains("8471"));
        assert!(set.contains("27101259"));
        assert!(parse_ncm_list("  \n, ").is_empty());
    }
}
