//! Per-chromosome grouping and parallel helpers built on Rayon.

use crate::interval::BedRecord;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Minimum number of records before enabling parallelization.
/// Below this threshold, sequential processing is faster due to
/// thread spawn overhead.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Group records by chromosome, each group sorted by start then end.
pub fn group_by_chromosome<'a, I>(records: I) -> FxHashMap<&'a str, Vec<&'a BedRecord>>
where
    I: IntoIterator<Item = &'a BedRecord>,
{
    let mut groups: FxHashMap<&'a str, Vec<&'a BedRecord>> = FxHashMap::default();

    for record in records {
        groups.entry(record.chrom()).or_default().push(record);
    }

    let total: usize = groups.values().map(Vec::len).sum();
    if total < PARALLEL_THRESHOLD {
        groups.values_mut().for_each(|list| sort_by_start(list));
    } else {
        groups.par_iter_mut().for_each(|(_, list)| sort_by_start(list));
    }

    groups
}

/// Chromosome names of a grouping, sorted for deterministic output.
pub fn sorted_chromosomes<'a, V>(groups: &FxHashMap<&'a str, V>) -> Vec<&'a str> {
    let mut chroms: Vec<&str> = groups.keys().copied().collect();
    chroms.sort_unstable();
    chroms
}

#[inline]
fn sort_by_start(list: &mut [&BedRecord]) {
    list.sort_unstable_by(|a, b| a.start().cmp(&b.start()).then(a.end().cmp(&b.end())));
}

/// Merge overlapping or book-ended spans of one chromosome.
///
/// Records must be pre-sorted by start position.
pub fn merge_spans(sorted: &[&BedRecord]) -> Vec<(u64, u64)> {
    let mut spans: Vec<(u64, u64)> = Vec::new();

    for rec in sorted {
        match spans.last_mut() {
            Some((_, end)) if rec.start() <= *end => *end = (*end).max(rec.end()),
            _ => spans.push((rec.start(), rec.end())),
        }
    }

    spans
}

/// Total bases covered by the records, counting overlaps once.
pub fn merged_coverage(records: &[BedRecord]) -> u64 {
    let groups = group_by_chromosome(records);

    let span_len = |list: &Vec<&BedRecord>| -> u64 {
        merge_spans(list)
            .into_iter()
            .map(|(start, end)| end - start)
            .sum()
    };

    if records.len() < PARALLEL_THRESHOLD {
        groups.values().map(span_len).sum()
    } else {
        groups.par_iter().map(|(_, list)| span_len(list)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::parse_records;

    #[test]
    fn test_group_sorts_each_chromosome() {
        let records = parse_records("chr2\t50\t60\nchr1\t300\t400\nchr1\t100\t200\n").unwrap();
        let groups = group_by_chromosome(&records);

        assert_eq!(sorted_chromosomes(&groups), vec!["chr1", "chr2"]);
        assert_eq!(groups["chr1"][0].start(), 100);
        assert_eq!(groups["chr1"][1].start(), 300);
    }

    #[test]
    fn test_merge_spans_bookended_and_contained() {
        let records = parse_records("chr1\t100\t200\nchr1\t200\t300\nchr1\t120\t130\nchr1\t400\t500\n")
            .unwrap();
        let groups = group_by_chromosome(&records);

        assert_eq!(merge_spans(&groups["chr1"]), vec![(100, 300), (400, 500)]);
    }

    #[test]
    fn test_merged_coverage() {
        let records = parse_records("chr1\t0\t10\nchr1\t5\t15\nchr2\t0\t10\n").unwrap();
        assert_eq!(merged_coverage(&records), 25);
    }
}
