//! Turns an [`Aggregation`] into the exact nested shape the CLI serializes:
//! four top-level categories, each either `{}` or a full breakdown by
//! transcript type.

use serde::{Serialize, Serializer};

use crate::aggregate::{Aggregation, CategoryAggregate, OrderedMap, TranscriptTypeBucket};
use crate::summary::{round2, LengthSummary};

/// One named length distribution plus its relative frequency against the
/// enclosing count (a transcript-type count against gene count, a feature
/// count against transcript count).
#[derive(Debug, Serialize)]
pub struct FeatureReport {
    pub count: u64,
    pub density: f64,
    pub length: LengthSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_concatenated: Option<LengthSummary>,
}

#[derive(Debug, Serialize)]
pub struct FeaturesReport {
    pub exon: FeatureReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intron: Option<FeatureReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cds: Option<FeatureReport>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptReport {
    pub count: u64,
    pub density: f64,
    pub length: LengthSummary,
    pub features: FeaturesReport,
}

#[derive(Debug, Serialize)]
pub struct CategoryBody {
    pub count: u64,
    pub length: LengthSummary,
    pub transcripts: OrderedMap<Box<str>, TranscriptReport>,
}

/// A category's report, serialized as `{}` when the category has no genes.
#[derive(Debug)]
pub enum CategoryReport {
    Empty,
    NonEmpty(CategoryBody),
}

impl CategoryReport {
    pub fn is_empty(&self) -> bool {
        matches!(self, CategoryReport::Empty)
    }
}

impl Serialize for CategoryReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryReport::Empty => {
                use serde::ser::SerializeMap;
                serializer.serialize_map(Some(0))?.end()
            }
            CategoryReport::NonEmpty(body) => body.serialize(serializer),
        }
    }
}

/// The top-level report, keyed by gene category.
#[derive(Debug, Serialize)]
pub struct Report {
    pub coding_genes: CategoryReport,
    pub long_non_coding_genes: CategoryReport,
    pub short_non_coding_genes: CategoryReport,
    pub pseudogenes: CategoryReport,
}

impl Report {
    /// True when every category is empty; callers may treat this as a
    /// failure distinct from a merely-small result.
    pub fn is_empty(&self) -> bool {
        self.coding_genes.is_empty()
            && self.long_non_coding_genes.is_empty()
            && self.short_non_coding_genes.is_empty()
            && self.pseudogenes.is_empty()
    }
}

/// Builds the final report from the accumulated aggregation.
pub fn build_report(aggregation: Aggregation) -> Report {
    Report {
        coding_genes: build_category(aggregation.coding),
        long_non_coding_genes: build_category(aggregation.long_non_coding),
        short_non_coding_genes: build_category(aggregation.short_non_coding),
        pseudogenes: build_category(aggregation.pseudogene),
    }
}

fn build_category(agg: CategoryAggregate) -> CategoryReport {
    if agg.gene_ids.is_empty() {
        return CategoryReport::Empty;
    }

    let count = agg.gene_ids.len() as u64;
    let length = LengthSummary::of(&agg.gene_lengths);

    let mut transcripts = OrderedMap::default();
    for (type_name, bucket) in agg.transcripts {
        let report = build_transcript_report(&bucket);
        transcripts.push(type_name, report);
    }

    CategoryReport::NonEmpty(CategoryBody {
        count,
        length,
        transcripts,
    })
}

fn build_transcript_report(bucket: &TranscriptTypeBucket) -> TranscriptReport {
    let transcript_count = bucket.transcript_lengths.len() as u64;
    let density = round2(transcript_count as f64 / bucket.gene_ids.len() as f64);
    let length = LengthSummary::of(&bucket.transcript_lengths);

    let exon_count = bucket.exon_lengths.len() as u64;
    let exon = FeatureReport {
        count: exon_count,
        density: round2(exon_count as f64 / transcript_count as f64),
        length: LengthSummary::of(&bucket.exon_lengths),
        length_concatenated: Some(LengthSummary::of(&bucket.spliced_lengths)),
    };

    let intron = if bucket.intron_lengths.is_empty() {
        None
    } else {
        let intron_count = bucket.intron_lengths.len() as u64;
        Some(FeatureReport {
            count: intron_count,
            density: round2(intron_count as f64 / transcript_count as f64),
            length: LengthSummary::of(&bucket.intron_lengths),
            length_concatenated: None,
        })
    };

    let cds = if bucket.cds_lengths.is_empty() {
        None
    } else {
        let cds_count = bucket.cds_lengths.len() as u64;
        Some(FeatureReport {
            count: cds_count,
            density: round2(cds_count as f64 / transcript_count as f64),
            length: LengthSummary::of(&bucket.cds_lengths),
            length_concatenated: Some(LengthSummary::of(&bucket.protein_lengths)),
        })
    };

    TranscriptReport {
        count: transcript_count,
        density,
        length,
        features: FeaturesReport { exon, intron, cds },
    }
}
