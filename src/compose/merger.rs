//! Final union of all category outputs.

use std::fmt;
use std::time::Duration;

use tracing::info;

use super::collector::CategoryMap;
use crate::collection::IntervalCollection;
use crate::engine::{IntervalEngine, SetOperation};
use crate::error::Result;

/// The unioned region set of one request plus its summary figures.
#[derive(Debug, Clone)]
pub struct CompositionResult {
    pub result: IntervalCollection,
    /// Wall time of the final union
    pub elapsed: Duration,
    pub feature_count: usize,
    pub covered_bases: u64,
}

impl CompositionResult {
    fn new(result: IntervalCollection, elapsed: Duration) -> Self {
        let feature_count = result.len();
        let covered_bases = result.total_coverage();
        Self {
            result,
            elapsed,
            feature_count,
            covered_bases,
        }
    }

    /// Summary rows as `(label, value)` pairs.
    pub fn summary(&self) -> [(&'static str, String); 3] {
        [
            ("Time elapsed (s)", format!("{:.3}", self.elapsed.as_secs_f64())),
            ("No. features", self.feature_count.to_string()),
            ("No. base pairs", self.covered_bases.to_string()),
        ]
    }
}

impl fmt::Display for CompositionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.summary() {
            writeln!(f, "{:<18}{}", label, value)?;
        }
        Ok(())
    }
}

/// Flatten the category outputs in fixed order and union them.
///
/// A single collection is unioned with itself so that the result is always
/// merged. No collections at all is an engine fault.
pub fn merge(categories: &CategoryMap, engine: &IntervalEngine) -> Result<CompositionResult> {
    let mut flattened: Vec<IntervalCollection> = categories
        .iter()
        .flat_map(|(_, collections)| collections.iter().cloned())
        .collect();

    if flattened.len() == 1 {
        flattened.push(flattened[0].clone());
    }

    let combined = engine.combine(&flattened, SetOperation::Union, false)?;
    let composition = CompositionResult::new(combined.result, combined.elapsed);

    info!(
        operands = flattened.len(),
        features = composition.feature_count,
        bases = composition.covered_bases,
        "composition finished"
    );

    Ok(composition)
}
