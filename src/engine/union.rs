//! Union of interval collections.
//!
//! Concatenates all operands and runs an O(n log n) sort + O(n) sweep-line
//! merge per chromosome. Output is BED3: merged spans carry no fields.

use crate::collection::IntervalCollection;
use crate::interval::BedRecord;
use crate::parallel::{group_by_chromosome, merge_spans, sorted_chromosomes, PARALLEL_THRESHOLD};
use rayon::prelude::*;

/// Union of any number of collections. Touching intervals are merged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionCommand;

impl UnionCommand {
    pub fn new() -> Self {
        Self
    }

    /// Union all collections into one sorted, non-overlapping collection.
    pub fn union(&self, collections: &[IntervalCollection]) -> IntervalCollection {
        let total: usize = collections.iter().map(IntervalCollection::len).sum();
        let groups = group_by_chromosome(collections.iter().flat_map(IntervalCollection::iter));
        let chroms = sorted_chromosomes(&groups);

        let merge_chrom = |chrom: &&str| -> Vec<BedRecord> {
            merge_spans(&groups[*chrom])
                .into_iter()
                .map(|(start, end)| BedRecord::new(*chrom, start, end))
                .collect()
        };

        let merged: Vec<Vec<BedRecord>> = if total < PARALLEL_THRESHOLD {
            chroms.iter().map(merge_chrom).collect()
        } else {
            chroms.par_iter().map(merge_chrom).collect()
        };

        IntervalCollection::new(merged.into_iter().flatten().collect())
    }
}
