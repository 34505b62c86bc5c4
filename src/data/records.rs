// src/data/records.rs

use std::path::Path;
use anyhow::{Result, Context, anyhow};
use serde::Deserialize;

/// One pre-aggregated monthly trade row as stored in the partition files.
/// Immutable once loaded; derived fields (names, calendar date) are attached
/// later during assembly.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TradeRecord {
    #[serde(rename = "CO_ANO")]
    pub year: i32,
    #[serde(rename = "CO_MES")]
    pub month: u32,
    #[serde(rename = "CO_NCM")]
    pub ncm: String,
    #[serde(rename = "CO_PAIS")]
    pub country: String,
    #[serde(rename = "SG_UF_NCM")]
    pub state: String,
    #[serde(rename = "VL_FOB")]
    pub fob: f64,
    #[serde(rename = "KG_LIQUIDO")]
    pub kg: f64,
}

/// Worldwide FOB total per (year, month, product). Denominator source for the
/// concentration coefficient, nothing else.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorldRecord {
    #[serde(rename = "CO_ANO")]
    pub year: i32,
    #[serde(rename = "CO_MES")]
    pub month: u32,
    #[serde(rename = "CO_NCM")]
    pub ncm: String,
    #[serde(rename = "VL_FOB_MUNDO")]
    pub fob: f64,
}

/// Flow direction of a trade partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Export,
    Import,
}

impl Flow {
    /// Prefix used in partition file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Export => "export",
            Flow::Import => "import",
        }
    }
}

fn open_partition(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(anyhow!(
            "Arquivo de dados '{}' não encontrado. Verifique se os scripts de pré-processamento foram executados.",
            path.display()
        ));
    }
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("Failed to open partition file {}", path.display()))
}

pub fn load_trade_partition(path: &Path) -> Result<Vec<TradeRecord>> {
    let mut reader = open_partition(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: TradeRecord = result
            .with_context(|| format!("Malformed row in {}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_world_partition(path: &Path) -> Result<Vec<WorldRecord>> {
    let mut reader = open_partition(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: WorldRecord = result
            .with_context(|| format!("Malformed row in {}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_trade_partition_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export_historico.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "CO_ANO;CO_MES;CO_NCM;CO_PAIS;SG_UF_NCM;VL_FOB;KG_LIQUIDO").unwrap();
        writeln!(file, "2023;1;27090010;249;RJ;1500.5;300.0").unwrap();
        writeln!(file, "2023;2;10011100;160;MT;820.0;1000.0").unwrap();

        let records = load_trade_partition(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ncm, "27090010");
        assert_eq!(records[0].country, "249");
        assert_eq!(records[0].fob, 1500.5);
        assert_eq!(records[1].month, 2);
        assert_eq!(records[1].state, "MT");
    }

    #[test]
    fn missing_partition_is_a_blocking_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_trade_partition(&dir.path().join("import_historico.csv")).unwrap_err();
        assert!(err.to_string().contains("não encontrado"));
    }

    #[test]
    fn loads_world_partition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export_world_totals.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "CO_ANO;CO_MES;CO_NCM;VL_FOB_MUNDO").unwrap();
        writeln!(file, "2023;1;27090010;90000.0").unwrap();

        let records = load_world_partition(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fob, 90000.0);
    }
}
