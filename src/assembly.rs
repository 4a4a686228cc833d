//! Genome assembly name normalization.
//!
//! `hg19` and `hg37` name the same build. Gene data is keyed by one of the
//! two names and chromosome sizes by the other, so callers pick which alias
//! they want back.

use std::sync::LazyLock;

use regex::Regex;

/// Alias form the gene registry is keyed by.
pub const GENE_REGISTRY_ALIAS: &str = "hg37";

/// Alias form used for flanking (chromosome sizes).
pub const FLANKING_ALIAS: &str = "hg19";

static HG19_ALIASES: LazyLock<Regex> = LazyLock::new(|| {
    // Anchored at the start only: "hg19_random" still belongs to the class.
    Regex::new(r"(?i)^(hg37|hg19)").expect("static alias pattern is valid")
});

/// Canonicalize `assembly` for a consumer that wants `desired_alias`.
///
/// Members of the hg19/hg37 alias class map to `desired_alias` verbatim;
/// any other name is lower-cased.
pub fn normalize(assembly: &str, desired_alias: &str) -> String {
    if HG19_ALIASES.is_match(assembly) {
        desired_alias.to_string()
    } else {
        assembly.to_lowercase()
    }
}

/// Whether a request-supplied id can name a file inside a data directory.
///
/// Rejects empty ids, path separators and a leading `.`.
pub fn is_file_id(id: &str) -> bool {
    !(id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_class_maps_to_desired_form() {
        assert_eq!(normalize("HG19", "hg37"), "hg37");
        assert_eq!(normalize("HG37", "hg19"), "hg19");
        assert_eq!(normalize("hg19", GENE_REGISTRY_ALIAS), "hg37");
        assert_eq!(normalize("hg37", FLANKING_ALIAS), "hg19");
    }

    #[test]
    fn test_other_assemblies_lower_cased() {
        assert_eq!(normalize("GRCh38", "hg37"), "grch38");
        assert_eq!(normalize("GRCh38", "hg19"), "grch38");
        assert_eq!(normalize("hg38", "hg19"), "hg38");
    }

    #[test]
    fn test_file_ids() {
        assert!(is_file_id("hg19"));
        assert!(is_file_id("brain"));
        assert!(!is_file_id(""));
        assert!(!is_file_id("../secret"));
        assert!(!is_file_id("..\\secret"));
        assert!(!is_file_id(".hidden"));
        assert!(!is_file_id("genomes/hg19"));
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(normalize("hg19_patch", "hg37"), "hg37");
        assert_eq!(normalize("xhg19", "hg37"), "xhg19");
    }
}
