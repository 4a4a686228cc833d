//! Per-category region resolvers.
//!
//! Each resolver returns zero or one collection so that every category's
//! output can be concatenated before the final union.

use tracing::{debug, warn};

use super::category::RegionCategory;
use super::params::GatedParams;
use crate::assembly::{normalize, FLANKING_ALIAS, GENE_REGISTRY_ALIAS};
use crate::collection::IntervalCollection;
use crate::engine::{IntervalEngine, SetOperation};
use crate::error::Result;
use crate::registry::{CatalogCode, Registries};

/// How per-tissue catalogs are combined before meeting the flanked genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// Region must be in every tissue's catalog
    All,
    /// Region must be in at least one tissue's catalog
    Any,
}

impl RangeMode {
    pub fn parse(range: &str) -> Option<Self> {
        match range {
            "all" => Some(RangeMode::All),
            "any" => Some(RangeMode::Any),
            _ => None,
        }
    }

    pub fn operation(&self) -> SetOperation {
        match self {
            RangeMode::All => SetOperation::Intersection,
            RangeMode::Any => SetOperation::Union,
        }
    }
}

/// Convert a kilobase distance to whole base pairs, truncating.
#[inline]
pub fn kilobases_to_bp(kilobases: f64) -> u64 {
    (kilobases * 1000.0) as u64
}

/// Runs one category's resolver on parameters that passed the gate.
pub trait Resolve {
    fn resolve(
        &self,
        category: RegionCategory,
        params: GatedParams<'_>,
    ) -> Result<Vec<IntervalCollection>>;
}

/// Registries and engine for one request.
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub registries: Registries<'a>,
    pub engine: &'a IntervalEngine,
}

impl<'a> ResolverContext<'a> {
    pub fn new(registries: Registries<'a>, engine: &'a IntervalEngine) -> Self {
        Self { registries, engine }
    }
}

impl Resolve for ResolverContext<'_> {
    fn resolve(
        &self,
        category: RegionCategory,
        params: GatedParams<'_>,
    ) -> Result<Vec<IntervalCollection>> {
        let gene_list = params.list("genes")?;
        let genome = params.text("genome")?;

        let Some(flank) = category.flank_params() else {
            return genes(self, &gene_list, genome);
        };
        let upstream = params.number(flank.upstream)?;
        let downstream = params.number(flank.downstream)?;

        if category == RegionCategory::TranscriptionFantom5 {
            // Request fields are kilobases; this resolver takes base pairs.
            return transcription_sites(
                self,
                &gene_list,
                genome,
                kilobases_to_bp(upstream),
                kilobases_to_bp(downstream),
            );
        }

        let Some(code) = category.catalog_code() else {
            return Ok(Vec::new());
        };
        let tissues = params.list("tissues")?;
        let range = params.text(flank.range)?;
        catalog_regions(
            self,
            code,
            &gene_list,
            &tissues,
            genome,
            range,
            upstream,
            downstream,
        )
    }
}

/// Union of the loci of `gene_symbols`.
///
/// Always one collection: empty when no symbol is known to the registry.
pub fn genes(
    ctx: &ResolverContext<'_>,
    gene_symbols: &[String],
    genome: &str,
) -> Result<Vec<IntervalCollection>> {
    let genome = normalize(genome, GENE_REGISTRY_ALIAS);

    let mut beds = Vec::with_capacity(gene_symbols.len());
    for symbol in gene_symbols {
        match ctx.registries.genes.get_bed(&genome, symbol)? {
            Some(bed) => beds.push(bed),
            None => debug!(gene = %symbol, %genome, "no registry entry for gene"),
        }
    }

    if beds.is_empty() {
        return Ok(vec![IntervalCollection::empty()]);
    }
    Ok(vec![ctx.engine.combine(&beds, SetOperation::Union, false)?.result])
}

/// Gene loci extended by `upstream`/`downstream` base pairs, unioned.
pub fn flanked_genes(
    ctx: &ResolverContext<'_>,
    gene_symbols: &[String],
    genome: &str,
    upstream: u64,
    downstream: u64,
) -> Result<IntervalCollection> {
    let genome = normalize(genome, FLANKING_ALIAS);
    let gene_beds = genes(ctx, gene_symbols, &genome)?;
    let flanked = ctx.engine.flank(&gene_beds, downstream, upstream, &genome)?;

    Ok(ctx.engine.combine(&flanked, SetOperation::Union, false)?.result)
}

/// Promoters within the flanked gene regions. Distances are in base pairs.
pub fn transcription_sites(
    ctx: &ResolverContext<'_>,
    gene_symbols: &[String],
    genome: &str,
    upstream: u64,
    downstream: u64,
) -> Result<Vec<IntervalCollection>> {
    let flanked = flanked_genes(ctx, gene_symbols, genome, upstream, downstream)?;
    let promoters = ctx.registries.tss.get_bed()?;

    let joined = ctx
        .engine
        .combine(&[flanked, promoters], SetOperation::Intersection, true)?;
    Ok(vec![joined.result])
}

/// FANTOM5 enhancers near the genes. Distances are in kilobases.
pub fn enhancers_fantom5(
    ctx: &ResolverContext<'_>,
    gene_symbols: &[String],
    tissues: &[String],
    genome: &str,
    range: &str,
    upstream_kb: f64,
    downstream_kb: f64,
) -> Result<Vec<IntervalCollection>> {
    catalog_regions(
        ctx,
        CatalogCode::EnhancersFantom5,
        gene_symbols,
        tissues,
        genome,
        range,
        upstream_kb,
        downstream_kb,
    )
}

/// ENCODE enhancers near the genes. Distances are in kilobases.
pub fn enhancers_encode(
    ctx: &ResolverContext<'_>,
    gene_symbols: &[String],
    tissues: &[String],
    genome: &str,
    range: &str,
    upstream_kb: f64,
    downstream_kb: f64,
) -> Result<Vec<IntervalCollection>> {
    catalog_regions(
        ctx,
        CatalogCode::EnhancersEncode,
        gene_symbols,
        tissues,
        genome,
        range,
        upstream_kb,
        downstream_kb,
    )
}

/// Accessible chromatin near the genes. Distances are in kilobases.
pub fn accessible_chromatin(
    ctx: &ResolverContext<'_>,
    gene_symbols: &[String],
    tissues: &[String],
    genome: &str,
    range: &str,
    upstream_kb: f64,
    downstream_kb: f64,
) -> Result<Vec<IntervalCollection>> {
    catalog_regions(
        ctx,
        CatalogCode::AccessibleChromatin,
        gene_symbols,
        tissues,
        genome,
        range,
        upstream_kb,
        downstream_kb,
    )
}

/// Tissue catalog entries of `code` overlapping the flanked genes.
///
/// Yields nothing when no tissue has a catalog, the flanked genes are
/// empty, the range mode is unknown, or the combined catalog is empty.
pub fn catalog_regions(
    ctx: &ResolverContext<'_>,
    code: CatalogCode,
    gene_symbols: &[String],
    tissues: &[String],
    genome: &str,
    range: &str,
    upstream_kb: f64,
    downstream_kb: f64,
) -> Result<Vec<IntervalCollection>> {
    let flanked = flanked_genes(
        ctx,
        gene_symbols,
        genome,
        kilobases_to_bp(upstream_kb),
        kilobases_to_bp(downstream_kb),
    )?;
    let catalogs = tissue_catalogs(ctx, tissues, code)?;

    if catalogs.is_empty() || flanked.is_empty() {
        debug!(
            %code,
            tissues_with_data = catalogs.len(),
            flanked_regions = flanked.len(),
            "nothing to intersect"
        );
        return Ok(Vec::new());
    }

    let Some(combined) = combine_by_range_mode(ctx.engine, range, &catalogs)? else {
        return Ok(Vec::new());
    };
    if combined.is_empty() {
        debug!(%code, range, "tissue catalogs have no regions in common");
        return Ok(Vec::new());
    }

    let joined = ctx
        .engine
        .combine(&[flanked, combined], SetOperation::Intersection, true)?;
    Ok(vec![joined.result])
}

/// Non-empty catalogs of `code` for every tissue that has one.
///
/// An empty catalog counts as missing data, so it never empties an `all`
/// intersection.
fn tissue_catalogs(
    ctx: &ResolverContext<'_>,
    tissues: &[String],
    code: CatalogCode,
) -> Result<Vec<IntervalCollection>> {
    let mut catalogs = Vec::with_capacity(tissues.len());
    for tissue in tissues {
        match ctx.registries.tissues.get_bed(tissue, code)? {
            Some(bed) if !bed.is_empty() => catalogs.push(bed),
            Some(_) => debug!(%tissue, %code, "empty catalog for tissue"),
            None => debug!(%tissue, %code, "no catalog for tissue"),
        }
    }
    Ok(catalogs)
}

/// Intersect (`all`) or union (`any`) the per-tissue catalogs.
/// Any other range value yields `None`.
pub fn combine_by_range_mode(
    engine: &IntervalEngine,
    range: &str,
    catalogs: &[IntervalCollection],
) -> Result<Option<IntervalCollection>> {
    let Some(mode) = RangeMode::parse(range) else {
        warn!(range, "unknown range mode, skipping category");
        return Ok(None);
    };

    let combined = engine.combine(catalogs, mode.operation(), false)?;
    Ok(Some(combined.result))
}
