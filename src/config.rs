//! Runtime configuration: where the registry data lives.
//!
//! A data directory with the conventional layout needs no configuration
//! file at all:
//!
//! ```text
//! <data_dir>/
//!   genes/<assembly>.bed          gene loci (BED6, name = symbol)
//!   tissues/<CODE>/<tissue>.bed   ENH_F5, ENH_EN, CHRM catalogs
//!   tss/promoters.bed             transcription start sites
//!   genomes/<assembly>.genome     chromosome sizes
//! ```
//!
//! A TOML file can override any of these. Relative paths in the file
//! resolve against the file's directory.
//!
//! ```toml
//! data_dir = "/srv/remus"
//! tss_file = "fantom5/promoters.bed"
//! results_dir = "/tmp/remus"
//! log_filter = "remus=debug"
//! ```

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::IntervalEngine;
use crate::error::{RemusError, Result};
use crate::logging::DEFAULT_LOG_FILTER;
use crate::registry::{GenesDbRegistry, TissuesFilesRegistry, TranscriptionStartSitesRegistry};

/// Data directory used when nothing else is given.
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemusConfig {
    pub genes_dir: PathBuf,
    pub tissues_dir: PathBuf,
    pub tss_file: PathBuf,
    pub genomes_dir: PathBuf,
    /// Where composition results are persisted; system temp dir if unset
    pub results_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    genes_dir: Option<PathBuf>,
    tissues_dir: Option<PathBuf>,
    tss_file: Option<PathBuf>,
    genomes_dir: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    log_filter: Option<String>,
}

impl Default for RemusConfig {
    fn default() -> Self {
        Self::from_data_dir(DEFAULT_DATA_DIR)
    }
}

impl RemusConfig {
    /// Configuration for a data directory with the conventional layout.
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            genes_dir: data_dir.join("genes"),
            tissues_dir: data_dir.join("tissues"),
            tss_file: data_dir.join("tss").join("promoters.bed"),
            genomes_dir: data_dir.join("genomes"),
            results_dir: None,
            log_filter: None,
        }
    }

    /// Load a TOML configuration file.
    pub fn try_from(path: &Path) -> Result<RemusConfig> {
        let toml_str = read_to_string(path).map_err(|e| {
            RemusError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        Self::from_toml_str(&toml_str, base)
    }

    /// Parse TOML text, resolving relative paths against `base`.
    pub fn from_toml_str(toml_str: &str, base: &Path) -> Result<RemusConfig> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|e| RemusError::Config(e.to_string()))?;

        let resolve = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        let data_dir = resolve(file.data_dir.unwrap_or_else(|| PathBuf::from(".")));
        let layout = Self::from_data_dir(&data_dir);

        Ok(RemusConfig {
            genes_dir: file.genes_dir.map(resolve).unwrap_or(layout.genes_dir),
            tissues_dir: file.tissues_dir.map(resolve).unwrap_or(layout.tissues_dir),
            tss_file: file.tss_file.map(resolve).unwrap_or(layout.tss_file),
            genomes_dir: file.genomes_dir.map(resolve).unwrap_or(layout.genomes_dir),
            results_dir: file.results_dir.map(resolve),
            log_filter: file.log_filter,
        })
    }

    /// Effective default log filter.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Check that the registry locations exist.
    pub fn validate(&self) -> Result<()> {
        for (name, dir) in [
            ("genes_dir", &self.genes_dir),
            ("tissues_dir", &self.tissues_dir),
            ("genomes_dir", &self.genomes_dir),
        ] {
            if !dir.is_dir() {
                return Err(RemusError::Config(format!(
                    "{} {} is not a directory",
                    name,
                    dir.display()
                )));
            }
        }
        if !self.tss_file.is_file() {
            return Err(RemusError::Config(format!(
                "tss_file {} does not exist",
                self.tss_file.display()
            )));
        }
        Ok(())
    }

    pub fn genes_registry(&self) -> GenesDbRegistry {
        GenesDbRegistry::open(&self.genes_dir)
    }

    pub fn tissues_registry(&self) -> TissuesFilesRegistry {
        TissuesFilesRegistry::open(&self.tissues_dir)
    }

    pub fn tss_registry(&self) -> TranscriptionStartSitesRegistry {
        TranscriptionStartSitesRegistry::open(&self.tss_file)
    }

    pub fn engine(&self) -> IntervalEngine {
        IntervalEngine::new().with_genomes_dir(&self.genomes_dir)
    }
}
