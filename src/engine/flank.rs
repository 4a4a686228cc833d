//! Flanking: extend intervals upstream and downstream,
//! respecting chromosome boundaries.

use crate::collection::IntervalCollection;
use crate::genome::Genome;
use crate::interval::{BedRecord, Strand};

/// Flank configuration, in base pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlankCommand {
    /// Bases added before the interval (at the end for `-` strand)
    pub upstream: u64,
    /// Bases added after the interval (at the start for `-` strand)
    pub downstream: u64,
}

impl FlankCommand {
    pub fn new(upstream: u64, downstream: u64) -> Self {
        Self {
            upstream,
            downstream,
        }
    }

    /// Apply the flank to a single record.
    #[inline]
    pub fn flank_record(&self, record: &mut BedRecord, chrom_size: u64) {
        let (left, right) = match record.strand {
            Some(Strand::Minus) => (self.downstream, self.upstream),
            _ => (self.upstream, self.downstream),
        };

        record.interval.start = record.start().saturating_sub(left).min(chrom_size);
        record.interval.end = record.end().saturating_add(right).min(chrom_size);
    }

    /// Flank every record of a collection.
    ///
    /// Records on chromosomes missing from `genome` are dropped, as are
    /// records that end up empty after clamping.
    pub fn flank(&self, collection: &IntervalCollection, genome: &Genome) -> IntervalCollection {
        let mut skipped = 0usize;
        let flanked: Vec<BedRecord> = collection
            .iter()
            .filter_map(|record| {
                let Some(chrom_size) = genome.chrom_size(record.chrom()) else {
                    skipped += 1;
                    return None;
                };
                let mut record = record.clone();
                self.flank_record(&mut record, chrom_size);
                (record.start() < record.end()).then_some(record)
            })
            .collect();

        if skipped > 0 {
            tracing::debug!(skipped, "dropped records on chromosomes unknown to the assembly");
        }

        IntervalCollection::new(flanked)
    }
}
