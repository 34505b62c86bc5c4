// src/data/reference.rs

use std::collections::{HashMap, HashSet};
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use encoding_rs::WINDOWS_1252;
use log::warn;
use serde::Deserialize;

/// Placeholder entries in the country table that are not real trade partners.
const EXCLUDED_COUNTRY_NAMES: [&str; 2] = ["Bancos Centrais", "A Designar"];

/// The 26 states plus the federal district; anything else in UF.csv is a
/// bookkeeping code (e.g. "ND", "ZN") and is dropped.
const VALID_UFS: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA",
    "MT", "MS", "MG", "PA", "PB", "PR", "PE", "PI", "RJ", "RN",
    "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

#[derive(Debug, Deserialize)]
struct CountryRow {
    #[serde(rename = "CO_PAIS")]
    code: String,
    #[serde(rename = "NO_PAIS")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UfRow {
    #[serde(rename = "CO_UF")]
    code: String,
    #[serde(rename = "SG_UF")]
    abbr: String,
}

#[derive(Debug, Deserialize)]
struct NcmRow {
    #[serde(rename = "CO_NCM")]
    code: String,
    #[serde(rename = "NO_NCM_POR")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MonitoredRow {
    #[serde(rename = "CO_NCM")]
    code: String,
}

/// Code/name lookup tables shared read-only by every analysis. Loaded once at
/// startup; a missing file here halts the application.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    pub country_name_by_code: HashMap<String, String>,
    pub country_code_by_name: HashMap<String, String>,
    /// Sorted country names for the partner selector.
    pub country_names: Vec<String>,
    pub uf_code_by_abbr: HashMap<String, String>,
    /// Sorted UF abbreviations for the state selector.
    pub uf_abbrs: Vec<String>,
    pub product_name_by_code: HashMap<String, String>,
}

impl ReferenceTables {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut tables = ReferenceTables::default();

        for row in read_latin1_rows::<CountryRow>(&data_dir.join("PAIS.csv"))? {
            if EXCLUDED_COUNTRY_NAMES.contains(&row.name.as_str()) {
                continue;
            }
            tables.country_code_by_name.insert(row.name.clone(), row.code.clone());
            tables.country_name_by_code.insert(row.code, row.name.clone());
            tables.country_names.push(row.name);
        }
        tables.country_names.sort();

        for row in read_latin1_rows::<UfRow>(&data_dir.join("UF.csv"))? {
            if !VALID_UFS.contains(&row.abbr.as_str()) {
                continue;
            }
            tables.uf_code_by_abbr.insert(row.abbr.clone(), row.code);
            tables.uf_abbrs.push(row.abbr);
        }
        tables.uf_abbrs.sort();

        for row in read_latin1_rows::<NcmRow>(&data_dir.join("NCM.csv"))? {
            tables.product_name_by_code.insert(row.code, row.name);
        }

        Ok(tables)
    }

    pub fn product_name(&self, code: &str) -> Option<&str> {
        self.product_name_by_code.get(code).map(String::as_str)
    }

    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.country_name_by_code.get(code).map(String::as_str)
    }
}

/// Loads the tariff-monitor product list. A missing or unreadable file is not
/// fatal: the monitor degrades to an empty set and the toggle becomes a no-op.
pub fn load_monitored_ncms(path: &Path) -> HashSet<String> {
    match read_monitored(path) {
        Ok(codes) => codes,
        Err(e) => {
            warn!("Arquivo do Monitor de Tarifados não pôde ser carregado ({}): {}", path.display(), e);
            HashSet::new()
        }
    }
}

fn read_monitored(path: &Path) -> Result<HashSet<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut codes = HashSet::new();
    for result in reader.deserialize() {
        let row: MonitoredRow = result?;
        codes.insert(row.code);
    }
    Ok(codes)
}

/// Reads a semicolon-delimited, latin-1 encoded reference file and
/// deserializes every row.
fn read_latin1_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(anyhow!(
            "Erro: Arquivo auxiliar não encontrado no diretório 'dados'. Detalhe: {}",
            path.display()
        ));
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (decoded, _, _) = WINDOWS_1252.decode(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(decoded.as_bytes());
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result
            .with_context(|| format!("Malformed row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_reference_files(dir: &Path) {
        let mut pais = std::fs::File::create(dir.join("PAIS.csv")).unwrap();
        pais.write_all(b"CO_PAIS;NO_PAIS\n").unwrap();
        pais.write_all(b"249;Estados Unidos\n").unwrap();
        // latin-1 byte 0xE3 = 'a-tilde'
        pais.write_all(b"023;Alem\xE3o do Sul\n").unwrap();
        pais.write_all(b"990;Bancos Centrais\n").unwrap();
        pais.write_all(b"994;A Designar\n").unwrap();

        let mut uf = std::fs::File::create(dir.join("UF.csv")).unwrap();
        uf.write_all(b"CO_UF;SG_UF\n").unwrap();
        uf.write_all(b"35;SP\n").unwrap();
        uf.write_all(b"33;RJ\n").unwrap();
        uf.write_all(b"99;ND\n").unwrap();

        let mut ncm = std::fs::File::create(dir.join("NCM.csv")).unwrap();
        ncm.write_all(b"CO_NCM;NO_NCM_POR\n").unwrap();
        ncm.write_all(b"27090010;\xD3leos brutos de petr\xF3leo\n").unwrap();
    }

    #[test]
    fn filters_placeholder_countries_and_invalid_ufs() {
        let dir = tempfile::tempdir().unwrap();
        write_reference_files(dir.path());

        let tables = ReferenceTables::load(dir.path()).unwrap();
        assert_eq!(tables.country_names, vec!["Alemão do Sul", "Estados Unidos"]);
        assert!(tables.country_name("990").is_none());
        assert_eq!(tables.country_code_by_name["Estados Unidos"], "249");
        assert_eq!(tables.uf_abbrs, vec!["RJ", "SP"]);
        assert_eq!(
            tables.product_name("27090010"),
            Some("Óleos brutos de petróleo")
        );
    }

    #[test]
    fn missing_reference_file_is_a_blocking_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ReferenceTables::load(dir.path()).is_err());
    }

    #[test]
    fn missing_monitor_list_degrades_to_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let codes = load_monitored_ncms(&dir.path().join("lista_ncm_tarifados.csv"));
        assert!(codes.is_empty());
    }

    #[test]
    fn monitor_list_is_comma_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lista_ncm_tarifados.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "CO_NCM,DESCRICAO").unwrap();
        writeln!(file, "27090010,petroleo").unwrap();
        writeln!(file, "10011100,trigo").unwrap();

        let codes = load_monitored_ncms(&path);
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("27090010"));
    }
}
