//! Lookup services for gene loci, tissue catalogs and the TSS catalog.
//!
//! The composition core only sees the traits defined here. The file-backed
//! implementations read a directory layout described by [`crate::config::RemusConfig`];
//! tests plug in in-memory ones.

pub mod genes;
pub mod tissues;
pub mod tss;

use std::collections::BTreeSet;
use std::fmt;

use crate::collection::IntervalCollection;
use crate::error::Result;

pub use genes::GenesDbRegistry;
pub use tissues::TissuesFilesRegistry;
pub use tss::TranscriptionStartSitesRegistry;

/// Gene loci keyed by assembly and gene symbol.
pub trait GeneSource: Sync {
    /// All records for `symbol` on `assembly`, or `None` when unknown.
    fn get_bed(&self, assembly: &str, symbol: &str) -> Result<Option<IntervalCollection>>;

    /// Assemblies with gene data.
    fn available_genomes(&self) -> Result<BTreeSet<String>>;

    /// Gene symbols starting with `pattern` (case-insensitive), sorted.
    /// A `limit` of 0 returns every match.
    fn get_matching_genes(&self, assembly: &str, pattern: &str, limit: usize)
        -> Result<Vec<String>>;
}

/// Per-tissue regulatory catalogs.
pub trait TissueSource: Sync {
    /// The `code` catalog of `tissue`, or `None` when the tissue has none.
    fn get_bed(&self, tissue: &str, code: CatalogCode) -> Result<Option<IntervalCollection>>;

    /// Tissue identifiers containing `pattern` (case-insensitive), sorted.
    /// A `limit` of 0 returns every match.
    fn get_matching_tissues(&self, pattern: &str, limit: usize) -> Result<Vec<String>>;
}

/// The tissue-independent transcription start site (promoter) catalog.
pub trait TssSource: Sync {
    fn get_bed(&self) -> Result<IntervalCollection>;
}

/// Tissue catalog kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogCode {
    /// FANTOM5 enhancers
    EnhancersFantom5,
    /// ENCODE enhancers
    EnhancersEncode,
    /// Accessible chromatin
    AccessibleChromatin,
}

impl CatalogCode {
    pub const ALL: [CatalogCode; 3] = [
        CatalogCode::EnhancersFantom5,
        CatalogCode::EnhancersEncode,
        CatalogCode::AccessibleChromatin,
    ];

    /// Directory name of this catalog in the tissue data tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogCode::EnhancersFantom5 => "ENH_F5",
            CatalogCode::EnhancersEncode => "ENH_EN",
            CatalogCode::AccessibleChromatin => "CHRM",
        }
    }
}

impl fmt::Display for CatalogCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The registry handles one request works with.
#[derive(Clone, Copy)]
pub struct Registries<'a> {
    pub genes: &'a dyn GeneSource,
    pub tissues: &'a dyn TissueSource,
    pub tss: &'a dyn TssSource,
}

impl<'a> Registries<'a> {
    pub fn new(
        genes: &'a dyn GeneSource,
        tissues: &'a dyn TissueSource,
        tss: &'a dyn TssSource,
    ) -> Self {
        Self { genes, tissues, tss }
    }
}

/// Keep the first `limit` items; 0 keeps everything.
pub(crate) fn apply_limit(mut items: Vec<String>, limit: usize) -> Vec<String> {
    if limit > 0 {
        items.truncate(limit);
    }
    items
}
