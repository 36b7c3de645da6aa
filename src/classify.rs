//! Assigns each gene a category once the tree is complete and its flags and
//! length are all known.

use std::collections::HashMap;

use crate::graph::Gene;

/// The four reported gene categories, plus `None` for genes dropped from the
/// report entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Coding,
    LongNonCoding,
    ShortNonCoding,
    Pseudogene,
}

const LONG_NON_CODING_MIN_LENGTH: u32 = 200;

/// Derives a gene's category from its accumulated flags and length, or
/// `None` if it should be dropped from all downstream accounting.
pub fn classify(gene: &Gene) -> Option<Category> {
    if &*gene.feature_type == "pseudogene" {
        return Some(Category::Pseudogene);
    }

    let biotype_is_coding = gene
        .biotype
        .as_deref()
        .map(|b| b.to_lowercase().contains("protein_coding"))
        .unwrap_or(false);
    if gene.has_cds || biotype_is_coding {
        return Some(Category::Coding);
    }

    if gene.has_exon {
        if gene.length > LONG_NON_CODING_MIN_LENGTH || gene.has_multiple_exons {
            return Some(Category::LongNonCoding);
        }
        return Some(Category::ShortNonCoding);
    }

    None
}

/// Assigns `category` on every gene in place. Idempotent: running it twice
/// produces the same assignments.
pub fn classify_all(genes: &mut HashMap<Box<str>, Gene>) {
    for gene in genes.values_mut() {
        gene.category = classify(gene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(feature_type: &str, biotype: Option<&str>, length: u32, has_exon: bool, has_cds: bool, has_multiple_exons: bool) -> Gene {
        let mut interner = crate::intern::Interner::new();
        Gene {
            feature_type: interner.intern(feature_type),
            biotype: biotype.map(|b| interner.intern(b)),
            length,
            has_exon,
            has_cds,
            has_multiple_exons,
            category: None,
        }
    }

    #[test]
    fn pseudogene_type_dominates_even_with_cds() {
        let g = gene("pseudogene", None, 1000, true, true, true);
        assert_eq!(classify(&g), Some(Category::Pseudogene));
    }

    #[test]
    fn coding_via_cds_presence() {
        let g = gene("gene", None, 500, true, true, false);
        assert_eq!(classify(&g), Some(Category::Coding));
    }

    #[test]
    fn coding_via_biotype() {
        let g = gene("gene", Some("protein_coding"), 500, false, false, false);
        assert_eq!(classify(&g), Some(Category::Coding));
    }

    #[test]
    fn long_non_coding_by_length() {
        let g = gene("ncRNA_gene", None, 201, true, false, false);
        assert_eq!(classify(&g), Some(Category::LongNonCoding));
    }

    #[test]
    fn long_non_coding_by_exon_count() {
        let g = gene("ncRNA_gene", None, 100, true, false, true);
        assert_eq!(classify(&g), Some(Category::LongNonCoding));
    }

    #[test]
    fn short_non_coding_at_the_boundary() {
        let g = gene("ncRNA_gene", None, 200, true, false, false);
        assert_eq!(classify(&g), Some(Category::ShortNonCoding));
    }

    #[test]
    fn no_exon_no_cds_drops_the_gene() {
        let g = gene("gene", None, 500, false, false, false);
        assert_eq!(classify(&g), None);
    }
}
