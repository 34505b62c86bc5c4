// src/data/mod.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;

pub mod bootstrap;
pub mod records;
pub mod reference;

pub use records::{Flow, TradeRecord, WorldRecord};
pub use reference::ReferenceTables;

pub const TARIFF_MONITOR_FILE: &str = "lista_ncm_tarifados.csv";

/// Owns the data directory and everything loaded from it: the reference
/// tables (loaded once at startup), the tariff-monitor set, and a lazy
/// read-through cache of trade/world partitions keyed by (flow, partition
/// name). Nothing is evicted and nothing is mutated after load, so cached
/// partitions are shared read-only across repeated analyses.
pub struct DataStore {
    data_dir: PathBuf,
    pub tables: ReferenceTables,
    pub monitored_ncms: HashSet<String>,
    trade_cache: HashMap<(Flow, String), Arc<Vec<TradeRecord>>>,
    world_cache: HashMap<(Flow, String), Arc<Vec<WorldRecord>>>,
}

impl DataStore {
    /// Opens the data directory, loading reference tables and the monitor
    /// list. Fails when any reference file is missing.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let tables = ReferenceTables::load(data_dir)?;
        let monitored_ncms = reference::load_monitored_ncms(&data_dir.join(TARIFF_MONITOR_FILE));
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            tables,
            monitored_ncms,
            trade_cache: HashMap::new(),
            world_cache: HashMap::new(),
        })
    }

    fn partition_path(&self, flow: Flow, suffix: &str) -> PathBuf {
        self.data_dir.join(format!("{}_{}.csv", flow.as_str(), suffix))
    }

    /// Loads a trade partition, reading it from disk at most once.
    pub fn trade_partition(&mut self, flow: Flow, suffix: &str) -> Result<Arc<Vec<TradeRecord>>> {
        let key = (flow, suffix.to_string());
        if let Some(cached) = self.trade_cache.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let records = Arc::new(records::load_trade_partition(&self.partition_path(flow, suffix))?);
        self.trade_cache.insert(key, Arc::clone(&records));
        Ok(records)
    }

    /// Loads a world-totals partition, reading it from disk at most once.
    pub fn world_partition(&mut self, flow: Flow, suffix: &str) -> Result<Arc<Vec<WorldRecord>>> {
        let key = (flow, suffix.to_string());
        if let Some(cached) = self.world_cache.get(&key) {
            return Ok(Arc::clone(cached));
        }
        let records = Arc::new(records::load_world_partition(&self.partition_path(flow, suffix))?);
        self.world_cache.insert(key, Arc::clone(&records));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn seed_minimal_store(dir: &Path) {
        for (name, header) in [
            ("PAIS.csv", "CO_PAIS;NO_PAIS\n249;Estados Unidos\n"),
            ("UF.csv", "CO_UF;SG_UF\n35;SP\n"),
            ("NCM.csv", "CO_NCM;NO_NCM_POR\n27090010;Petroleo\n"),
        ] {
            std::fs::write(dir.join(name), header).unwrap();
        }
    }

    #[test]
    fn partition_reads_are_memoized() {
        let dir = tempfile::tempdir().unwrap();
        seed_minimal_store(dir.path());
        let path = dir.path().join("export_historico.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "CO_ANO;CO_MES;CO_NCM;CO_PAIS;SG_UF_NCM;VL_FOB;KG_LIQUIDO").unwrap();
        writeln!(file, "2023;1;27090010;249;SP;100.0;10.0").unwrap();

        let mut store = DataStore::open(dir.path()).unwrap();
        let first = store.trade_partition(Flow::Export, "historico").unwrap();

        // Deleting the file does not matter once the partition is cached.
        std::fs::remove_file(&path).unwrap();
        let second = store.trade_partition(Flow::Export, "historico").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn open_fails_without_reference_tables() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DataStore::open(dir.path()).is_err());
    }
}
