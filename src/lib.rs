// Clippy allows for the whole crate
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]

//! Remus: regulatory region-set composition
//!
//! Given gene symbols, tissues and a genome assembly, Remus gathers the
//! gene loci, promoters near the genes, and tissue-specific enhancers and
//! accessible chromatin near the genes, and unions everything into a single
//! BED region set.
//!
//! # Features
//!
//! - **All-or-nothing categories**: a region category runs only when every
//!   one of its parameters is supplied
//! - **Interval engine**: N-ary union/intersection and strand-aware flanking
//! - **Parallel processing**: per-chromosome work uses Rayon on large inputs
//!
//! # Example
//!
//! ```rust,no_run
//! use remus::compose::{compose, ParameterBundle};
//! use remus::config::RemusConfig;
//! use remus::registry::Registries;
//!
//! let config = RemusConfig::from_data_dir("data");
//! let (genes, tissues, tss) = (
//!     config.genes_registry(),
//!     config.tissues_registry(),
//!     config.tss_registry(),
//! );
//!
//! let bundle = ParameterBundle::new()
//!     .with("genes", vec!["BRCA1"])
//!     .with("genome", "hg19");
//!
//! let result = compose(
//!     &bundle,
//!     Registries::new(&genes, &tissues, &tss),
//!     &config.engine(),
//! )
//! .unwrap();
//! println!("{}", result);
//! ```

pub mod assembly;
pub mod bed;
pub mod collection;
pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod genome;
pub mod interval;
pub mod logging;
pub mod parallel;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use bed::{read_records, BedError, BedReader};
pub use collection::IntervalCollection;
pub use error::{RemusError, Result};
pub use interval::{BedRecord, Interval, Strand};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::collection::IntervalCollection;
    pub use crate::compose::{
        compose, matching_genes, matching_tissues, CompositionResult, ParameterBundle,
        RegionCategory,
    };
    pub use crate::config::RemusConfig;
    pub use crate::engine::{IntervalEngine, SetOperation};
    pub use crate::error::{RemusError, Result};
    pub use crate::interval::{BedRecord, Interval, Strand};
    pub use crate::registry::{GeneSource, Registries, TissueSource, TssSource};
    pub use crate::session::ResultStore;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_union_workflow() {
        use crate::bed::parse_records;
        use crate::prelude::*;

        let content = "chr1\t100\t200\nchr1\t150\t250\nchr1\t300\t400\n";
        let a = IntervalCollection::new(parse_records(content).unwrap());

        let merged = IntervalEngine::new()
            .combine(&[a], SetOperation::Union, false)
            .unwrap()
            .result;

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.records()[0].start(), 100);
        assert_eq!(merged.records()[0].end(), 250);
        assert_eq!(merged.total_coverage(), 250);
    }

    #[test]
    fn test_intersect_workflow() {
        use crate::bed::parse_records;
        use crate::prelude::*;

        let a = IntervalCollection::new(parse_records("chr1\t100\t200\nchr1\t300\t400\n").unwrap());
        let b = IntervalCollection::new(parse_records("chr1\t150\t250\n").unwrap());

        let joined = IntervalEngine::new()
            .combine(&[a, b], SetOperation::Intersection, false)
            .unwrap()
            .result;

        assert_eq!(joined.len(), 1);
        assert_eq!(joined.records()[0].to_string(), "chr1\t150\t200");
    }
}
