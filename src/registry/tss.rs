//! The promoter (transcription start site) catalog, one BED file.

use std::path::{Path, PathBuf};

use super::TssSource;
use crate::collection::IntervalCollection;
use crate::error::{RemusError, Result};

#[derive(Debug, Clone)]
pub struct TranscriptionStartSitesRegistry {
    path: PathBuf,
}

impl TranscriptionStartSitesRegistry {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TssSource for TranscriptionStartSitesRegistry {
    fn get_bed(&self) -> Result<IntervalCollection> {
        IntervalCollection::from_bed(&self.path).map_err(|e| RemusError::registry(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promoters.bed");
        std::fs::write(&path, "chr17\t41277400\t41277600\tp1@BRCA1\t0\t-\n").unwrap();

        let catalog = TranscriptionStartSitesRegistry::open(&path).get_bed().unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let registry = TranscriptionStartSitesRegistry::open("/nonexistent/promoters.bed");
        assert!(matches!(registry.get_bed(), Err(RemusError::Registry { .. })));
    }
}
