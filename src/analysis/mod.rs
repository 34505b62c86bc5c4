// src/analysis/mod.rs
pub mod assemble;
pub mod balance;
pub mod filter;
pub mod indicators;

// Re-export commonly used types
pub use assemble::{run_analysis, AnalysisResult, AssembledRecord, MonitorOutcome};
pub use filter::{AnalysisMode, FilterSpec, Period};
