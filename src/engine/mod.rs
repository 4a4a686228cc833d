//! Interval algebra used by the composition pipeline.
//!
//! The engine offers two capabilities: `combine` (N-ary union or
//! intersection, optionally keeping the fields of both operands) and
//! `flank` (extend intervals upstream/downstream within chromosome bounds).

pub mod flank;
pub mod intersect;
pub mod union;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::assembly::is_file_id;
use crate::bed::BedError;
use crate::collection::IntervalCollection;
use crate::genome::Genome;

pub use flank::FlankCommand;
pub use intersect::IntersectCommand;
pub use union::UnionCommand;

/// Faults raised by the interval engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Bed(#[from] BedError),

    #[error("{operation} needs at least one collection")]
    NoOperands { operation: SetOperation },

    #[error("No chromosome sizes known for assembly '{0}'")]
    UnknownAssembly(String),
}

/// Set operation applied across all operands of `combine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperation {
    Union,
    Intersection,
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOperation::Union => write!(f, "union"),
            SetOperation::Intersection => write!(f, "intersection"),
        }
    }
}

/// Output of a `combine` call.
#[derive(Debug, Clone)]
pub struct Combined {
    pub result: IntervalCollection,
    pub elapsed: Duration,
}

/// Interval engine with chromosome sizes for flanking.
///
/// Genomes registered with [`IntervalEngine::with_genome`] take precedence;
/// otherwise `<genomes_dir>/<assembly>.genome` is read on demand.
#[derive(Debug, Clone, Default)]
pub struct IntervalEngine {
    genomes: HashMap<String, Genome>,
    genomes_dir: Option<PathBuf>,
}

impl IntervalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read chromosome sizes from `<dir>/<assembly>.genome`.
    pub fn with_genomes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.genomes_dir = Some(dir.into());
        self
    }

    /// Register chromosome sizes for an assembly.
    pub fn with_genome(mut self, assembly: impl Into<String>, genome: Genome) -> Self {
        self.genomes.insert(assembly.into(), genome);
        self
    }

    /// Union or intersect all `collections`.
    ///
    /// Union merges every operand into non-overlapping BED3 intervals.
    /// Intersection folds left to right; with `keep_both_fields` each
    /// overlapping piece carries the columns of both sides.
    pub fn combine(
        &self,
        collections: &[IntervalCollection],
        operation: SetOperation,
        keep_both_fields: bool,
    ) -> Result<Combined, EngineError> {
        if collections.is_empty() {
            return Err(EngineError::NoOperands { operation });
        }

        let started = Instant::now();
        let result = match operation {
            SetOperation::Union => UnionCommand::new().union(collections),
            SetOperation::Intersection => IntersectCommand::new()
                .with_keep_both(keep_both_fields)
                .intersect_all(collections),
        };
        let elapsed = started.elapsed();

        tracing::trace!(
            %operation,
            operands = collections.len(),
            features = result.len(),
            ?elapsed,
            "combined collections"
        );

        Ok(Combined { result, elapsed })
    }

    /// Flank every collection by `upstream`/`downstream` bases on `assembly`.
    pub fn flank(
        &self,
        collections: &[IntervalCollection],
        downstream: u64,
        upstream: u64,
        assembly: &str,
    ) -> Result<Vec<IntervalCollection>, EngineError> {
        let genome = self.genome(assembly)?;
        let cmd = FlankCommand::new(upstream, downstream);

        Ok(collections
            .iter()
            .map(|collection| cmd.flank(collection, &genome))
            .collect())
    }

    fn genome(&self, assembly: &str) -> Result<Genome, EngineError> {
        if let Some(genome) = self.genomes.get(assembly) {
            return Ok(genome.clone());
        }

        match self.genomes_dir {
            Some(ref dir) if is_file_id(assembly) => {
                let path = dir.join(format!("{}.genome", assembly));
                if !path.is_file() {
                    return Err(EngineError::UnknownAssembly(assembly.to_string()));
                }
                Ok(Genome::from_file(path)?)
            }
            _ => Err(EngineError::UnknownAssembly(assembly.to_string())),
        }
    }
}
