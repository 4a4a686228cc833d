//! Gene loci read from `<genes_dir>/<assembly>.bed`.
//!
//! Each file is BED6 with the gene symbol in the name column. A symbol
//! may occur on several rows (one per transcript).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use super::{apply_limit, GeneSource};
use crate::assembly::is_file_id;
use crate::bed::read_records;
use crate::collection::IntervalCollection;
use crate::error::{RemusError, Result};
use crate::interval::BedRecord;

#[derive(Debug, Default)]
struct GeneIndex {
    by_symbol: FxHashMap<String, Vec<BedRecord>>,
    symbols: Vec<String>,
}

impl GeneIndex {
    fn build(records: Vec<BedRecord>) -> Self {
        let mut by_symbol: FxHashMap<String, Vec<BedRecord>> = FxHashMap::default();
        for record in records {
            if let Some(symbol) = record.name.clone() {
                by_symbol.entry(symbol).or_default().push(record);
            }
        }

        let mut symbols: Vec<String> = by_symbol.keys().cloned().collect();
        symbols.sort_unstable();

        Self { by_symbol, symbols }
    }
}

/// File-backed gene registry.
///
/// Assemblies are indexed lazily on first use and kept for the lifetime of
/// the registry, which is one request.
#[derive(Debug)]
pub struct GenesDbRegistry {
    dir: PathBuf,
    indexes: Mutex<FxHashMap<String, Arc<GeneIndex>>>,
}

impl GenesDbRegistry {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            indexes: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn assembly_path(&self, assembly: &str) -> PathBuf {
        self.dir.join(format!("{}.bed", assembly))
    }

    /// Index for `assembly`, or `None` if there is no file for it.
    fn index(&self, assembly: &str) -> Result<Option<Arc<GeneIndex>>> {
        // Assembly names come from request input and name a file directly.
        if !is_file_id(assembly) {
            return Ok(None);
        }

        let mut indexes = self.indexes.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(index) = indexes.get(assembly) {
            return Ok(Some(Arc::clone(index)));
        }

        let path = self.assembly_path(assembly);
        if !path.is_file() {
            return Ok(None);
        }

        let records = read_records(&path).map_err(|e| RemusError::registry(&path, e))?;
        let index = Arc::new(GeneIndex::build(records));
        tracing::debug!(
            assembly,
            genes = index.symbols.len(),
            "indexed gene registry"
        );
        indexes.insert(assembly.to_string(), Arc::clone(&index));

        Ok(Some(index))
    }
}

impl GeneSource for GenesDbRegistry {
    fn get_bed(&self, assembly: &str, symbol: &str) -> Result<Option<IntervalCollection>> {
        let Some(index) = self.index(assembly)? else {
            return Ok(None);
        };

        Ok(index
            .by_symbol
            .get(symbol)
            .map(|records| IntervalCollection::new(records.clone())))
    }

    fn available_genomes(&self) -> Result<BTreeSet<String>> {
        let mut genomes = BTreeSet::new();
        if !self.dir.is_dir() {
            return Ok(genomes);
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "bed") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    genomes.insert(stem.to_string());
                }
            }
        }

        Ok(genomes)
    }

    fn get_matching_genes(
        &self,
        assembly: &str,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let Some(index) = self.index(assembly)? else {
            return Ok(Vec::new());
        };

        let pattern = pattern.to_uppercase();
        let matches: Vec<String> = index
            .symbols
            .iter()
            .filter(|symbol| symbol.to_uppercase().starts_with(&pattern))
            .cloned()
            .collect();

        Ok(apply_limit(matches, limit))
    }
}
