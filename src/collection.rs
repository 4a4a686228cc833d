//! Immutable interval collections shared between composition stages.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::bed::{self, BedError};
use crate::interval::BedRecord;
use crate::parallel::merged_coverage;

/// An immutable set of BED records.
///
/// Cloning is cheap: clones share the same record storage. Every engine
/// operation builds a new collection instead of touching an existing one.
#[derive(Debug, Clone, Default)]
pub struct IntervalCollection {
    records: Arc<[BedRecord]>,
}

impl IntervalCollection {
    pub fn new(records: Vec<BedRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// A collection with no intervals.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a collection from a BED file.
    pub fn from_bed<P: AsRef<Path>>(path: P) -> Result<Self, BedError> {
        Ok(Self::new(bed::read_records(path)?))
    }

    /// Number of features (records).
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[BedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BedRecord> {
        self.records.iter()
    }

    /// Number of bases covered, counting overlapping records once.
    pub fn total_coverage(&self) -> u64 {
        merged_coverage(&self.records)
    }

    /// True if both handles point at the same storage.
    pub fn shares_storage(&self, other: &IntervalCollection) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }

    /// Write the collection as BED text.
    pub fn write_bed<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        bed::write_records(writer, &self.records)
    }

    /// Save the collection to a BED file.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<(), BedError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_bed(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

impl From<Vec<BedRecord>> for IntervalCollection {
    fn from(records: Vec<BedRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a IntervalCollection {
    type Item = &'a BedRecord;
    type IntoIter = std::slice::Iter<'a, BedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::parse_records;

    #[test]
    fn test_total_coverage_counts_overlap_once() {
        let records = parse_records("chr1\t100\t200\nchr1\t150\t250\nchr2\t0\t10\n").unwrap();
        let collection = IntervalCollection::new(records);

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.total_coverage(), 160);
    }

    #[test]
    fn test_empty_collection() {
        let collection = IntervalCollection::empty();

        assert!(collection.is_empty());
        assert_eq!(collection.total_coverage(), 0);
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = IntervalCollection::new(parse_records("chr1\t1\t2\n").unwrap());
        let b = a.clone();
        let c = IntervalCollection::new(parse_records("chr1\t1\t2\n").unwrap());

        assert!(a.shares_storage(&b));
        assert!(!a.shares_storage(&c));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.bed");
        let a = IntervalCollection::new(parse_records("chr1\t1\t2\tx\t0\t+\n").unwrap());

        a.save_as(&path).unwrap();
        let b = IntervalCollection::from_bed(&path).unwrap();

        assert_eq!(a.records(), b.records());
    }
}
