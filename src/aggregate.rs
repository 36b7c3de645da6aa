//! Walks the completed gene/transcript tables once each, bucketing
//! measurements by `(category, transcript type)` for the summary builder to
//! turn into length distributions.

use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::Hash;

use serde::{Serialize, Serializer};

use crate::classify::Category;
use crate::graph::{Gene, Transcript};

/// A map that remembers the order keys were first inserted in, since the
/// report's transcript-type keys are ordered by first encounter rather than
/// sorted.
#[derive(Debug)]
pub struct OrderedMap<K, V> {
    order: Vec<K>,
    index: HashMap<K, usize>,
    values: Vec<V>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        OrderedMap {
            order: Vec::new(),
            index: HashMap::new(),
            values: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Default> OrderedMap<K, V> {
    pub fn entry_or_default(&mut self, key: K) -> &mut V {
        if let Some(&i) = self.index.get(&key) {
            return &mut self.values[i];
        }
        let i = self.values.len();
        self.index.insert(key.clone(), i);
        self.order.push(key);
        self.values.push(V::default());
        &mut self.values[i]
    }
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    /// Inserts `value` under `key`, preserving first-seen insertion order.
    /// Assumes `key` is not already present (callers here always build from
    /// a source iterator with unique keys).
    pub fn push(&mut self, key: K, value: V) {
        let i = self.values.len();
        self.index.insert(key.clone(), i);
        self.order.push(key);
        self.values.push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(move |k| (k, &self.values[self.index[k]]))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter().zip(self.values)
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Measurements accumulated for every transcript of one type within one
/// category.
#[derive(Debug, Default)]
pub struct TranscriptTypeBucket {
    pub gene_ids: HashSet<Box<str>>,
    pub transcript_lengths: Vec<u32>,
    pub exon_lengths: Vec<u32>,
    pub spliced_lengths: Vec<u32>,
    pub intron_lengths: Vec<u32>,
    pub cds_lengths: Vec<u32>,
    pub protein_lengths: Vec<u32>,
}

/// Measurements accumulated for one gene category.
#[derive(Debug, Default)]
pub struct CategoryAggregate {
    pub gene_ids: HashSet<Box<str>>,
    pub gene_lengths: Vec<u32>,
    pub transcripts: OrderedMap<Box<str>, TranscriptTypeBucket>,
}

/// The four category buckets, fully accumulated.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub coding: CategoryAggregate,
    pub long_non_coding: CategoryAggregate,
    pub short_non_coding: CategoryAggregate,
    pub pseudogene: CategoryAggregate,
}

impl Aggregation {
    fn get_mut(&mut self, category: Category) -> &mut CategoryAggregate {
        match category {
            Category::Coding => &mut self.coding,
            Category::LongNonCoding => &mut self.long_non_coding,
            Category::ShortNonCoding => &mut self.short_non_coding,
            Category::Pseudogene => &mut self.pseudogene,
        }
    }
}

const UNKNOWN_TRANSCRIPT_TYPE: &str = "unknown";

/// Builds the full aggregation from a graph's genes (already classified via
/// [`crate::classify::classify_all`]) and transcripts.
pub fn aggregate(
    genes: &HashMap<Box<str>, Gene>,
    transcripts: &HashMap<Box<str>, Transcript>,
) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for (gene_id, gene) in genes {
        let Some(category) = gene.category else {
            continue;
        };
        let bucket = aggregation.get_mut(category);
        bucket.gene_ids.insert(gene_id.clone());
        bucket.gene_lengths.push(gene.length);
    }

    for transcript in transcripts.values() {
        let Some(gene) = genes.get(&transcript.gene_id) else {
            continue;
        };
        let Some(category) = gene.category else {
            continue;
        };

        let type_key: Box<str> = transcript
            .kind
            .as_deref()
            .unwrap_or(UNKNOWN_TRANSCRIPT_TYPE)
            .into();
        let bucket = aggregation.get_mut(category).transcripts.entry_or_default(type_key);

        bucket.gene_ids.insert(transcript.gene_id.clone());
        bucket.transcript_lengths.push(transcript.length);
        bucket.exon_lengths.extend_from_slice(&transcript.exons_lengths);
        bucket.spliced_lengths.push(transcript.exon_len_sum as u32);

        if transcript.cds_count > 0 {
            bucket.cds_lengths.extend_from_slice(&transcript.cds_lengths);
            bucket.protein_lengths.push((transcript.cds_len_sum / 3) as u32);
        }

        if transcript.exon_count > 1 {
            let intron_length = transcript.length as i64 - transcript.exon_len_sum as i64;
            bucket.intron_lengths.push(intron_length.max(0) as u32);
        }
    }

    aggregation
}
