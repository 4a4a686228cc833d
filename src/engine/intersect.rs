//! Intersection of interval collections.
//!
//! Uses an O(n+m) sweep-line per chromosome. N-ary intersection folds the
//! operands left to right, so the left side's fields lead each output row.

use crate::collection::IntervalCollection;
use crate::interval::BedRecord;
use crate::parallel::{group_by_chromosome, sorted_chromosomes, PARALLEL_THRESHOLD};
use rayon::prelude::*;

/// Intersect configuration.
#[derive(Debug, Clone, Default)]
pub struct IntersectCommand {
    /// Append the right operand's full record to every overlapping piece
    /// (bedtools `-wb`).
    pub keep_both: bool,
}

impl IntersectCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_both(mut self, keep_both: bool) -> Self {
        self.keep_both = keep_both;
        self
    }

    /// Intersect every collection, folding from the first one.
    pub fn intersect_all(&self, collections: &[IntervalCollection]) -> IntervalCollection {
        let mut operands = collections.iter();
        let Some(first) = operands.next() else {
            return IntervalCollection::empty();
        };

        operands.fold(first.clone(), |acc, next| self.intersect(&acc, next))
    }

    /// Overlapping pieces of `a` and `b`, one row per overlapping pair.
    pub fn intersect(&self, a: &IntervalCollection, b: &IntervalCollection) -> IntervalCollection {
        let a_by_chrom = group_by_chromosome(a);
        let b_by_chrom = group_by_chromosome(b);
        let chroms = sorted_chromosomes(&a_by_chrom);

        let intersect_chrom = |chrom: &&str| -> Vec<BedRecord> {
            match b_by_chrom.get(*chrom) {
                Some(b_list) => self.intersect_chromosome_sweepline(&a_by_chrom[*chrom], b_list),
                None => Vec::new(),
            }
        };

        let pieces: Vec<Vec<BedRecord>> = if a.len() + b.len() < PARALLEL_THRESHOLD {
            chroms.iter().map(intersect_chrom).collect()
        } else {
            chroms.par_iter().map(intersect_chrom).collect()
        };

        IntervalCollection::new(pieces.into_iter().flatten().collect())
    }

    /// O(n+m) sweep-line intersection for a single chromosome.
    ///
    /// Algorithm:
    /// 1. A and B are sorted by start position
    /// 2. Maintain a window [b_start_idx, b_end_idx) of B candidates
    /// 3. For each A interval:
    ///    a. Advance b_end_idx while B[j].start < A.end
    ///    b. Advance b_start_idx past B intervals ending before A.start
    ///    c. Report every B in the window that really overlaps A
    fn intersect_chromosome_sweepline(
        &self,
        a_sorted: &[&BedRecord],
        b_sorted: &[&BedRecord],
    ) -> Vec<BedRecord> {
        let mut output = Vec::new();
        let b_len = b_sorted.len();
        let mut b_start_idx: usize = 0;
        let mut b_end_idx: usize = 0;

        for a_rec in a_sorted {
            let a_start = a_rec.start();
            let a_end = a_rec.end();

            while b_end_idx < b_len && b_sorted[b_end_idx].start() < a_end {
                b_end_idx += 1;
            }

            while b_start_idx < b_end_idx && b_sorted[b_start_idx].end() <= a_start {
                b_start_idx += 1;
            }

            for b_rec in &b_sorted[b_start_idx..b_end_idx] {
                if let Some(piece) = a_rec.interval.overlap(&b_rec.interval) {
                    output.push(self.overlap_record(a_rec, b_rec, piece));
                }
            }
        }

        output
    }

    fn overlap_record(
        &self,
        a_rec: &BedRecord,
        b_rec: &BedRecord,
        piece: crate::interval::Interval,
    ) -> BedRecord {
        if self.keep_both {
            let mut extra_fields: Vec<String> = a_rec.fields().split_off(3);
            extra_fields.extend(b_rec.fields());
            BedRecord {
                interval: piece,
                name: None,
                score: None,
                strand: None,
                extra_fields,
            }
        } else {
            BedRecord {
                interval: piece,
                ..a_rec.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::parse_records;

    fn collection(content: &str) -> IntervalCollection {
        IntervalCollection::new(parse_records(content).unwrap())
    }

    #[test]
    fn test_basic_intersect() {
        let a = collection("chr1\t100\t200\nchr1\t300\t400\nchr1\t500\t600\n");
        let b = collection("chr1\t150\t250\nchr1\t350\t450\n");

        let result = IntersectCommand::new().intersect(&a, &b);

        assert_eq!(result.len(), 2);
        assert_eq!(result.records()[0].to_string(), "chr1\t150\t200");
        assert_eq!(result.records()[1].to_string(), "chr1\t350\t400");
    }

    #[test]
    fn test_default_mode_keeps_left_fields() {
        let a = collection("chr1\t100\t200\tgeneA\t0\t+\n");
        let b = collection("chr1\t150\t250\tenh1\t7\t.\n");

        let result = IntersectCommand::new().intersect(&a, &b);

        assert_eq!(result.records()[0].to_string(), "chr1\t150\t200\tgeneA\t0\t+");
    }

    #[test]
    fn test_keep_both_appends_right_record() {
        let a = collection("chr1\t100\t200\n");
        let b = collection("chr1\t150\t250\tenh1\t7\t.\n");

        let result = IntersectCommand::new().with_keep_both(true).intersect(&a, &b);

        assert_eq!(
            result.records()[0].to_string(),
            "chr1\t150\t200\tchr1\t150\t250\tenh1\t7\t."
        );
    }

    #[test]
    fn test_long_b_interval_stays_in_window() {
        let a = collection("chr1\t100\t110\nchr1\t500\t510\n");
        let b = collection("chr1\t0\t1000\nchr1\t105\t106\n");

        let result = IntersectCommand::new().intersect(&a, &b);

        assert_eq!(result.len(), 3);
        assert_eq!(result.records()[2].start(), 500);
    }

    #[test]
    fn test_adjacent_is_not_overlap() {
        let a = collection("chr1\t100\t200\n");
        let b = collection("chr1\t200\t300\nchr2\t100\t200\n");

        assert!(IntersectCommand::new().intersect(&a, &b).is_empty());
    }

    #[test]
    fn test_intersect_all_requires_every_operand() {
        let a = collection("chr1\t0\t100\n");
        let b = collection("chr1\t50\t150\n");
        let c = collection("chr1\t80\t90\n");
        let d = collection("chr1\t200\t300\n");
        let cmd = IntersectCommand::new();

        let abc = cmd.intersect_all(&[a.clone(), b.clone(), c]);
        assert_eq!(abc.len(), 1);
        assert_eq!(abc.records()[0].to_string(), "chr1\t80\t90");

        assert!(cmd.intersect_all(&[a, b, d]).is_empty());
    }
}
