//! In-memory registries and fixture data shared by the integration tests.
//!
//! Gene layout (hg37 registry, hg19 chromosome sizes):
//!
//! ```text
//! chr17  41196312  41277500  BRCA1  (-)
//! chr17   7565097   7590856  TP53   (-)
//! chr1        100       500  EDGE   (+)   chr1 is 1000 bp long
//! ```
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use remus::bed::parse_records;
use remus::collection::IntervalCollection;
use remus::engine::IntervalEngine;
use remus::genome::Genome;
use remus::registry::{CatalogCode, GeneSource, Registries, TissueSource, TssSource};
use remus::Result;

pub const GENES_BED: &str = "\
chr17\t41196312\t41277500\tBRCA1\t0\t-
chr17\t7565097\t7590856\tTP53\t0\t-
chr1\t100\t500\tEDGE\t0\t+
";

pub const PROMOTERS_BED: &str = "\
chr17\t41195000\t41195200\tp2@BRCA1\t0\t-
chr17\t41277400\t41277600\tp1@BRCA1\t0\t-
chr17\t50000000\t50000200\tp1@FAR\t0\t+
";

/// `(code, tissue, bed)` catalogs.
pub const CATALOGS: &[(CatalogCode, &str, &str)] = &[
    (
        CatalogCode::EnhancersFantom5,
        "brain",
        "chr17\t41278000\t41278500\nchr17\t60000000\t60000100\n",
    ),
    (CatalogCode::EnhancersFantom5, "liver", "chr17\t41278200\t41278800\n"),
    (CatalogCode::EnhancersEncode, "heart", "chr17\t41278600\t41278900\n"),
    (CatalogCode::AccessibleChromatin, "heart", "chr17\t41194500\t41194700\n"),
    (CatalogCode::AccessibleChromatin, "brain", "chr17\t41278000\t41278100\n"),
    (CatalogCode::AccessibleChromatin, "liver", "chr17\t41278500\t41278600\n"),
];

pub fn bed(content: &str) -> IntervalCollection {
    IntervalCollection::new(parse_records(content).unwrap())
}

/// Engine with hg19 chromosome sizes for the fixture chromosomes.
pub fn engine() -> IntervalEngine {
    IntervalEngine::new().with_genome(
        "hg19",
        Genome::from_sizes([("chr17", 81_195_210u64), ("chr1", 1_000u64)]),
    )
}

pub struct MemoryGenes {
    assembly: String,
    loci: BTreeMap<String, IntervalCollection>,
}

impl MemoryGenes {
    pub fn new(assembly: &str, content: &str) -> Self {
        let mut by_symbol: BTreeMap<String, Vec<_>> = BTreeMap::new();
        for record in parse_records(content).unwrap() {
            let symbol = record.name.clone().unwrap();
            by_symbol.entry(symbol).or_default().push(record);
        }
        Self {
            assembly: assembly.to_string(),
            loci: by_symbol
                .into_iter()
                .map(|(symbol, records)| (symbol, IntervalCollection::new(records)))
                .collect(),
        }
    }
}

impl GeneSource for MemoryGenes {
    fn get_bed(&self, assembly: &str, symbol: &str) -> Result<Option<IntervalCollection>> {
        if assembly != self.assembly {
            return Ok(None);
        }
        Ok(self.loci.get(symbol).cloned())
    }

    fn available_genomes(&self) -> Result<BTreeSet<String>> {
        Ok([self.assembly.clone()].into_iter().collect())
    }

    fn get_matching_genes(&self, assembly: &str, pattern: &str, limit: usize) -> Result<Vec<String>> {
        if assembly != self.assembly {
            return Ok(Vec::new());
        }
        let pattern = pattern.to_lowercase();
        let mut matches: Vec<String> = self
            .loci
            .keys()
            .filter(|symbol| symbol.to_lowercase().starts_with(&pattern))
            .cloned()
            .collect();
        if limit > 0 {
            matches.truncate(limit);
        }
        Ok(matches)
    }
}

/// Tissue catalogs that also record every lookup.
#[derive(Default)]
pub struct MemoryTissues {
    catalogs: BTreeMap<(String, CatalogCode), IntervalCollection>,
    pub lookups: Mutex<Vec<(String, CatalogCode)>>,
}

impl MemoryTissues {
    pub fn new(catalogs: &[(CatalogCode, &str, &str)]) -> Self {
        Self {
            catalogs: catalogs
                .iter()
                .map(|(code, tissue, content)| ((tissue.to_string(), *code), bed(content)))
                .collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

impl TissueSource for MemoryTissues {
    fn get_bed(&self, tissue: &str, code: CatalogCode) -> Result<Option<IntervalCollection>> {
        self.lookups.lock().unwrap().push((tissue.to_string(), code));
        Ok(self.catalogs.get(&(tissue.to_string(), code)).cloned())
    }

    fn get_matching_tissues(&self, pattern: &str, limit: usize) -> Result<Vec<String>> {
        let pattern = pattern.to_lowercase();
        let mut tissues: Vec<String> = self
            .catalogs
            .keys()
            .map(|(tissue, _)| tissue.clone())
            .filter(|tissue| tissue.to_lowercase().contains(&pattern))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if limit > 0 {
            tissues.truncate(limit);
        }
        Ok(tissues)
    }
}

pub struct MemoryTss(pub IntervalCollection);

impl TssSource for MemoryTss {
    fn get_bed(&self) -> Result<IntervalCollection> {
        Ok(self.0.clone())
    }
}

/// The standard fixture registries.
pub struct Fixture {
    pub genes: MemoryGenes,
    pub tissues: MemoryTissues,
    pub tss: MemoryTss,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            genes: MemoryGenes::new("hg37", GENES_BED),
            tissues: MemoryTissues::new(CATALOGS),
            tss: MemoryTss(bed(PROMOTERS_BED)),
        }
    }

    pub fn registries(&self) -> Registries<'_> {
        Registries::new(&self.genes, &self.tissues, &self.tss)
    }
}

/// `chrom\tstart\tend` of every record.
pub fn spans(collection: &IntervalCollection) -> Vec<String> {
    collection
        .iter()
        .map(|r| format!("{}\t{}\t{}", r.chrom(), r.start(), r.end()))
        .collect()
}
