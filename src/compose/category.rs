//! Region categories and the parameters each one requires.

use std::fmt;

use crate::registry::CatalogCode;

/// One kind of genomic region set. Variant order is the collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionCategory {
    Genes,
    TranscriptionFantom5,
    EnhancersFantom5,
    EnhancersEncode,
    AccessibleChromatinFantom5,
}

const GENES_PARAMS: &[&str] = &["genes", "genome"];

const TRANSCRIPTION_FANTOM5_PARAMS: &[&str] = &[
    "genes",
    "genome",
    "transcription-fantom5-range",
    "transcription-fantom5-kbs-upstream",
    "transcription-fantom5-kbs-downstream",
    "transcription-fantom5-used",
];

const ENHANCERS_FANTOM5_PARAMS: &[&str] = &[
    "genes",
    "tissues",
    "genome",
    "enhancers-fantom5-range",
    "enhancers-fantom5-kbs-upstream",
    "enhancers-fantom5-kbs-downstream",
    "enhancers-fantom5-used",
];

const ENHANCERS_ENCODE_PARAMS: &[&str] = &[
    "genes",
    "tissues",
    "genome",
    "enhancers-encode-range",
    "enhancers-encode-kbs-upstream",
    "enhancers-encode-kbs-downstream",
    "enhancers-encode-used",
];

// The accessible chromatin form fields carry the "encode" prefix.
const ACCESSIBLE_CHROMATIN_PARAMS: &[&str] = &[
    "genes",
    "tissues",
    "genome",
    "accessible-chromatin-encode-range",
    "accessible-chromatin-encode-kbs-upstream",
    "accessible-chromatin-encode-kbs-downstream",
    "accessible-chromatin-encode-used",
];

/// Names of the flank-related parameters of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlankParams {
    pub range: &'static str,
    pub upstream: &'static str,
    pub downstream: &'static str,
}

impl RegionCategory {
    pub const ALL: [RegionCategory; 5] = [
        RegionCategory::Genes,
        RegionCategory::TranscriptionFantom5,
        RegionCategory::EnhancersFantom5,
        RegionCategory::EnhancersEncode,
        RegionCategory::AccessibleChromatinFantom5,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RegionCategory::Genes => "genes",
            RegionCategory::TranscriptionFantom5 => "transcription-fantom5",
            RegionCategory::EnhancersFantom5 => "enhancers-fantom5",
            RegionCategory::EnhancersEncode => "enhancers-encode",
            RegionCategory::AccessibleChromatinFantom5 => "accessible-chromatin-fantom5",
        }
    }

    /// Parameters that must all be present for the category to run,
    /// in the order its resolver receives them.
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            RegionCategory::Genes => GENES_PARAMS,
            RegionCategory::TranscriptionFantom5 => TRANSCRIPTION_FANTOM5_PARAMS,
            RegionCategory::EnhancersFantom5 => ENHANCERS_FANTOM5_PARAMS,
            RegionCategory::EnhancersEncode => ENHANCERS_ENCODE_PARAMS,
            RegionCategory::AccessibleChromatinFantom5 => ACCESSIBLE_CHROMATIN_PARAMS,
        }
    }

    /// Range/upstream/downstream parameter names; `None` for genes.
    pub fn flank_params(&self) -> Option<FlankParams> {
        let (range, upstream, downstream) = match self {
            RegionCategory::Genes => return None,
            RegionCategory::TranscriptionFantom5 => (
                "transcription-fantom5-range",
                "transcription-fantom5-kbs-upstream",
                "transcription-fantom5-kbs-downstream",
            ),
            RegionCategory::EnhancersFantom5 => (
                "enhancers-fantom5-range",
                "enhancers-fantom5-kbs-upstream",
                "enhancers-fantom5-kbs-downstream",
            ),
            RegionCategory::EnhancersEncode => (
                "enhancers-encode-range",
                "enhancers-encode-kbs-upstream",
                "enhancers-encode-kbs-downstream",
            ),
            RegionCategory::AccessibleChromatinFantom5 => (
                "accessible-chromatin-encode-range",
                "accessible-chromatin-encode-kbs-upstream",
                "accessible-chromatin-encode-kbs-downstream",
            ),
        };
        Some(FlankParams {
            range,
            upstream,
            downstream,
        })
    }

    /// Tissue catalog the category draws from, if it is tissue-specific.
    pub fn catalog_code(&self) -> Option<CatalogCode> {
        match self {
            RegionCategory::EnhancersFantom5 => Some(CatalogCode::EnhancersFantom5),
            RegionCategory::EnhancersEncode => Some(CatalogCode::EnhancersEncode),
            RegionCategory::AccessibleChromatinFantom5 => Some(CatalogCode::AccessibleChromatin),
            RegionCategory::Genes | RegionCategory::TranscriptionFantom5 => None,
        }
    }
}

impl fmt::Display for RegionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        let names: Vec<&str> = RegionCategory::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "genes",
                "transcription-fantom5",
                "enhancers-fantom5",
                "enhancers-encode",
                "accessible-chromatin-fantom5"
            ]
        );

        let mut sorted = RegionCategory::ALL;
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, RegionCategory::ALL);
    }

    #[test]
    fn test_flank_params() {
        assert_eq!(RegionCategory::Genes.flank_params(), None);
        assert_eq!(
            RegionCategory::AccessibleChromatinFantom5.flank_params(),
            Some(FlankParams {
                range: "accessible-chromatin-encode-range",
                upstream: "accessible-chromatin-encode-kbs-upstream",
                downstream: "accessible-chromatin-encode-kbs-downstream",
            })
        );
        assert_eq!(
            RegionCategory::TranscriptionFantom5
                .flank_params()
                .map(|p| p.range),
            Some("transcription-fantom5-range")
        );
    }

    #[test]
    fn test_flank_params_are_required() {
        for category in RegionCategory::ALL {
            if let Some(flank) = category.flank_params() {
                let required = category.required_params();
                for name in [flank.range, flank.upstream, flank.downstream] {
                    assert!(required.contains(&name), "{} missing {}", category, name);
                }
            }
        }
    }

    #[test]
    fn test_catalog_codes() {
        assert_eq!(RegionCategory::Genes.catalog_code(), None);
        assert_eq!(
            RegionCategory::EnhancersEncode.catalog_code(),
            Some(CatalogCode::EnhancersEncode)
        );
        assert_eq!(
            RegionCategory::AccessibleChromatinFantom5.catalog_code(),
            Some(CatalogCode::AccessibleChromatin)
        );
        assert_eq!(RegionCategory::TranscriptionFantom5.catalog_code(), None);
    }
}
