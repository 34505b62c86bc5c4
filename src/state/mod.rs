// src/state/mod.rs
use crate::analysis::{run_analysis, AnalysisMode, AnalysisResult, FilterSpec, Period};
use crate::analysis::filter::{ALL_UFS, WORLD};
use crate::data::DataStore;

/// Default partner when the country table has it; falls back to "Mundo".
const DEFAULT_COUNTRY: &str = "Estados Unidos";
/// First year covered by the published statistics.
pub const FIRST_YEAR: i32 = 1997;

// Screen/tab tracking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Charts,
    Tables,
}

/// Raw sidebar widget values. Turned into a [`FilterSpec`] when the user
/// triggers an analysis; editing these never touches the current result.
#[derive(Debug, Clone)]
pub struct SidebarState {
    pub mode: AnalysisMode,
    pub monitor: bool,
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
    pub country: String,
    pub uf: String,
    pub ncm_text: String,
}

impl SidebarState {
    fn new(current_year: i32, current_month: u32, tables: &crate::data::ReferenceTables) -> Self {
        let country = if tables.country_names.iter().any(|n| n == DEFAULT_COUNTRY) {
            DEFAULT_COUNTRY.to_string()
        } else {
            WORLD.to_string()
        };
        Self {
            mode: AnalysisMode::Export,
            monitor: false,
            start_year: current_year - 1,
            start_month: 1,
            end_year: current_year,
            end_month: current_month,
            country,
            uf: ALL_UFS.to_string(),
            ncm_text: String::new(),
        }
    }

    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            mode: self.mode,
            start: Period::new(self.start_year, self.start_month),
            end: Period::new(self.end_year, self.end_month),
            country: self.country.clone(),
            uf: self.uf.clone(),
            ncm_text: self.ncm_text.clone(),
            monitor: self.monitor,
        }
    }
}

// Core application state
pub struct AppState {
    pub store: DataStore,
    pub current_year: i32,

    pub sidebar: SidebarState,
    /// Replaced wholesale on every trigger; None before the first analysis.
    pub result: Option<AnalysisResult>,

    pub current_screen: Screen,
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(store: DataStore, current_year: i32, current_month: u32) -> Self {
        let sidebar = SidebarState::new(current_year, current_month, &store.tables);
        Self {
            store,
            current_year,
            sidebar,
            result: None,
            current_screen: Screen::Charts,
            error_message: None,
        }
    }

    /// The "Analisar Período" trigger: runs the whole request/response cycle
    /// and atomically replaces the prior result. On failure the prior result
    /// is discarded and the error surfaces through the modal.
    pub fn trigger_analysis(&mut self) {
        self.result = None;
        match run_analysis(&mut self.store, &self.sidebar.to_spec(), self.current_year) {
            Ok(result) => {
                self.result = Some(result);
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }
}
