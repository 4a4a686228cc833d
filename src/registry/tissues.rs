//! Tissue catalogs read from `<tissues_dir>/<CODE>/<tissue>.bed`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{apply_limit, CatalogCode, TissueSource};
use crate::assembly::is_file_id;
use crate::collection::IntervalCollection;
use crate::error::{RemusError, Result};

/// File-backed tissue registry.
#[derive(Debug, Clone)]
pub struct TissuesFilesRegistry {
    dir: PathBuf,
}

impl TissuesFilesRegistry {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn catalog_path(&self, tissue: &str, code: CatalogCode) -> PathBuf {
        self.dir.join(code.as_str()).join(format!("{}.bed", tissue))
    }

    /// Every tissue with at least one catalog.
    fn tissues(&self) -> Result<BTreeSet<String>> {
        let mut tissues = BTreeSet::new();

        for code in CatalogCode::ALL {
            let code_dir = self.dir.join(code.as_str());
            if !code_dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&code_dir)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "bed") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        tissues.insert(stem.to_string());
                    }
                }
            }
        }

        Ok(tissues)
    }
}

impl TissueSource for TissuesFilesRegistry {
    fn get_bed(&self, tissue: &str, code: CatalogCode) -> Result<Option<IntervalCollection>> {
        // Tissue ids come from request input and name a file directly.
        if !is_file_id(tissue) {
            return Ok(None);
        }

        let path = self.catalog_path(tissue, code);
        if !path.is_file() {
            return Ok(None);
        }

        IntervalCollection::from_bed(&path)
            .map(Some)
            .map_err(|e| RemusError::registry(&path, e))
    }

    fn get_matching_tissues(&self, pattern: &str, limit: usize) -> Result<Vec<String>> {
        let pattern = pattern.to_lowercase();
        let matches: Vec<String> = self
            .tissues()?
            .into_iter()
            .filter(|tissue| tissue.to_lowercase().contains(&pattern))
            .collect();

        Ok(apply_limit(matches, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (tempfile::TempDir, TissuesFilesRegistry) {
        let dir = tempfile::tempdir().unwrap();
        for (code, tissue, content) in [
            ("ENH_F5", "brain", "chr1\t100\t200\n"),
            ("ENH_F5", "liver", "chr1\t300\t400\n"),
            ("CHRM", "brain", "chr1\t150\t250\n"),
            ("CHRM", "Brain stem", "chr1\t150\t250\n"),
        ] {
            let code_dir = dir.path().join(code);
            fs::create_dir_all(&code_dir).unwrap();
            fs::write(code_dir.join(format!("{}.bed", tissue)), content).unwrap();
        }
        let registry = TissuesFilesRegistry::open(dir.path());
        (dir, registry)
    }

    #[test]
    fn test_get_bed_by_code() {
        let (_dir, registry) = registry();

        let brain = registry
            .get_bed("brain", CatalogCode::EnhancersFantom5)
            .unwrap()
            .unwrap();
        assert_eq!(brain.records()[0].start(), 100);

        assert!(registry
            .get_bed("liver", CatalogCode::AccessibleChromatin)
            .unwrap()
            .is_none());
        assert!(registry
            .get_bed("brain", CatalogCode::EnhancersEncode)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_get_bed_rejects_path_like_ids() {
        let (_dir, registry) = registry();

        assert!(registry
            .get_bed("../ENH_F5/brain", CatalogCode::EnhancersFantom5)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_matching_tissues() {
        let (_dir, registry) = registry();

        assert_eq!(
            registry.get_matching_tissues("BRAIN", 0).unwrap(),
            vec!["Brain stem", "brain"]
        );
        assert_eq!(registry.get_matching_tissues("", 0).unwrap().len(), 3);
        assert_eq!(registry.get_matching_tissues("", 1).unwrap().len(), 1);
    }
}
