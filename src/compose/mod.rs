//! Region-set composition.
//!
//! A request is a [`ParameterBundle`]. Each [`RegionCategory`] whose
//! required parameters are all present is resolved against the registries;
//! the resulting collections are unioned into one region set.
//!
//! ```text
//! ParameterBundle -> CategoryCollector -> CategoryMap -> merge -> CompositionResult
//! ```

pub mod category;
pub mod collector;
pub mod merger;
pub mod params;
pub mod resolvers;

use tracing::debug;

use crate::assembly::{normalize, GENE_REGISTRY_ALIAS};
use crate::engine::IntervalEngine;
use crate::error::Result;
use crate::registry::{GeneSource, Registries, TissueSource};

pub use category::RegionCategory;
pub use collector::{CategoryCollector, CategoryMap};
pub use merger::{merge, CompositionResult};
pub use params::{
    GatedParams, ParamValue, ParameterBundle, CHECKBOX_ON, TRANSCRIPTION_RANGE_PLACEHOLDER,
};
pub use resolvers::{RangeMode, Resolve, ResolverContext};

/// Run one composition request end to end.
pub fn compose(
    bundle: &ParameterBundle,
    registries: Registries<'_>,
    engine: &IntervalEngine,
) -> Result<CompositionResult> {
    let context = ResolverContext::new(registries, engine);
    let categories = CategoryCollector::new(bundle, &context).collect()?;
    debug!(active = ?categories.active(), "categories collected");

    merge(&categories, engine)
}

/// Gene symbols on `genome` starting with `pattern`.
///
/// Empty unless both are given and the registry has data for the genome.
pub fn matching_genes(
    genes: &dyn GeneSource,
    pattern: &str,
    genome: &str,
    limit: usize,
) -> Result<Vec<String>> {
    if pattern.is_empty() || genome.is_empty() {
        return Ok(Vec::new());
    }

    let genome = normalize(genome, GENE_REGISTRY_ALIAS);
    if !genes.available_genomes()?.contains(&genome) {
        debug!(%genome, "no gene data for genome");
        return Ok(Vec::new());
    }

    genes.get_matching_genes(&genome, pattern, limit)
}

/// Tissue identifiers containing `pattern`.
pub fn matching_tissues(
    tissues: &dyn TissueSource,
    pattern: &str,
    limit: usize,
) -> Result<Vec<String>> {
    tissues.get_matching_tissues(pattern, limit)
}
