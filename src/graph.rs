//! Builds the gene → transcript → leaf tree from a stream of GFF3 rows that
//! may arrive in any order, using an event-driven deferred-child queue to
//! resolve parent-after-child orderings in a single pass.

use std::collections::{HashMap, HashSet};

use crate::classify::Category;
use crate::intern::Symbol;

/// The root of a feature subtree.
#[derive(Debug, Clone)]
pub struct Gene {
    pub feature_type: Symbol,
    pub biotype: Option<Symbol>,
    pub length: u32,
    pub has_exon: bool,
    pub has_cds: bool,
    pub has_multiple_exons: bool,
    pub category: Option<Category>,
}

/// An intermediate node owned by exactly one gene.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub gene_id: Box<str>,
    pub kind: Option<Symbol>,
    pub length: u32,
    pub exon_count: u32,
    pub exon_len_sum: u64,
    pub exons_lengths: Vec<u32>,
    pub cds_count: u32,
    pub cds_len_sum: u64,
    pub cds_lengths: Vec<u32>,
}

/// A leaf or transcript whose parent id had not yet been seen when it
/// arrived, held until its parent resolves or the stream ends.
///
/// Multiple parents may resolve at different times rather than all at once,
/// so this tracks which parent ids have already been attributed rather than
/// a single resolved/unresolved bit — otherwise the first parent to resolve
/// would shadow attribution to the rest.
struct DeferredFeature {
    feature_id: Option<Box<str>>,
    feature_type: Symbol,
    length: u32,
    parent_ids: Vec<Box<str>>,
    biotype: Option<Symbol>,
    consumed: HashSet<Box<str>>,
}

/// Count and a handful of representative entries for features that never
/// found a parent before the stream ended.
#[derive(Debug, Default)]
pub struct UnresolvedSummary {
    pub count: usize,
    pub samples: Vec<String>,
}

const MAX_SAMPLES: usize = 5;

#[derive(Default)]
struct DeferredQueue {
    arena: Vec<DeferredFeature>,
    waiting: HashMap<Box<str>, Vec<usize>>,
}

impl DeferredQueue {
    fn defer(&mut self, feature: DeferredFeature) {
        let index = self.arena.len();
        for parent in &feature.parent_ids {
            if !feature.consumed.contains(parent.as_ref()) {
                self.waiting.entry(parent.clone()).or_default().push(index);
            }
        }
        self.arena.push(feature);
    }

    fn take_waiting(&mut self, parent_id: &str) -> Vec<usize> {
        self.waiting.remove(parent_id).unwrap_or_default()
    }
}

/// Owns gene, transcript and id-to-root state for one GFF3 stream.
#[derive(Default)]
pub struct FeatureGraph {
    genes: HashMap<Box<str>, Gene>,
    id_to_root: HashMap<Box<str>, Box<str>>,
    transcripts: HashMap<Box<str>, Transcript>,
    deferred: DeferredQueue,
    anon_transcripts_seen: u64,
}

impl FeatureGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests one parsed row. Attaches it to the tree immediately if any
    /// parent is already known, otherwise defers it until one arrives.
    pub fn ingest_row(
        &mut self,
        feature_id: Option<Box<str>>,
        feature_type: Symbol,
        length: u32,
        parent_ids: Vec<Box<str>>,
        biotype: Option<Symbol>,
    ) {
        if parent_ids.is_empty() {
            if let Some(id) = &feature_id {
                self.create_gene(id, &feature_type, length, biotype.as_ref());
                self.resolve(id);
            }
            return;
        }

        let mut consumed = HashSet::new();
        for parent_id in &parent_ids {
            if self.attach_to_parent(feature_id.as_deref(), &feature_type, length, parent_id) {
                consumed.insert(parent_id.clone());
            }
        }

        if !consumed.is_empty() {
            if let Some(id) = &feature_id {
                self.resolve(id);
            }
        }

        if consumed.len() < parent_ids.len() {
            self.deferred.defer(DeferredFeature {
                feature_id,
                feature_type,
                length,
                parent_ids,
                biotype,
                consumed,
            });
        }
    }

    /// Mints a unique key for a transcript row with no `ID`, which no leaf
    /// could ever reference by Parent anyway but which still needs a slot
    /// in the transcript table for aggregation.
    fn anon_transcript_key(&mut self) -> Box<str> {
        let key = format!("#anon-transcript-{}", self.anon_transcripts_seen);
        self.anon_transcripts_seen += 1;
        Box::from(key)
    }

    /// Registers a parent-less, identified row as a new gene.
    fn create_gene(&mut self, id: &str, feature_type: &Symbol, length: u32, biotype: Option<&Symbol>) {
        self.genes.insert(
            Box::from(id),
            Gene {
                feature_type: feature_type.clone(),
                biotype: biotype.cloned(),
                length,
                has_exon: false,
                has_cds: false,
                has_multiple_exons: false,
                category: None,
            },
        );
        self.id_to_root.insert(Box::from(id), Box::from(id));
    }

    /// Attempts to attach one feature to one of its parent ids. Returns
    /// whether that parent's root was already known (and the attachment, if
    /// any, applied) — the unit of "has this parent id been consumed" that
    /// the deferred queue tracks per feature.
    fn attach_to_parent(
        &mut self,
        feature_id: Option<&str>,
        feature_type: &Symbol,
        length: u32,
        parent_id: &str,
    ) -> bool {
        let root_id = match self.id_to_root.get(parent_id) {
            Some(root) => root.clone(),
            None => return false,
        };

        if let Some(id) = feature_id {
            self.id_to_root.insert(Box::from(id), root_id.clone());
        }

        let is_exon = &**feature_type == "exon";
        let is_cds = &**feature_type == "CDS";

        if parent_id == root_id.as_ref() {
            if !is_exon && !is_cds {
                // This row is itself the transcript, so it must be keyed by
                // its own id — the id any exon/CDS row will later name as
                // Parent — not by the gene id in `parent_id`. A leaf seen
                // earlier may already have materialized this entry lazily
                // under that same id; merge into it instead of creating a
                // second, disconnected entry.
                let key: Box<str> = match feature_id {
                    Some(id) => Box::from(id),
                    None => self.anon_transcript_key(),
                };
                match self.transcripts.get_mut(&*key) {
                    Some(existing) => {
                        existing.gene_id = root_id.clone();
                        existing.kind = Some(feature_type.clone());
                        existing.length = length;
                    }
                    None => {
                        self.transcripts.insert(
                            key,
                            Transcript {
                                gene_id: root_id.clone(),
                                kind: Some(feature_type.clone()),
                                length,
                                ..Transcript::default()
                            },
                        );
                    }
                }
            }
            return true;
        }

        let transcript = self
            .transcripts
            .entry(Box::from(parent_id))
            .or_insert_with(|| Transcript {
                gene_id: root_id.clone(),
                ..Transcript::default()
            });

        if is_exon {
            transcript.exon_count += 1;
            transcript.exons_lengths.push(length);
            transcript.exon_len_sum += length as u64;
            let exon_count = transcript.exon_count;
            if let Some(gene) = self.genes.get_mut(root_id.as_ref()) {
                gene.has_exon = true;
                if exon_count == 2 {
                    gene.has_multiple_exons = true;
                }
            }
        } else if is_cds {
            transcript.cds_count += 1;
            transcript.cds_lengths.push(length);
            transcript.cds_len_sum += length as u64;
            if let Some(gene) = self.genes.get_mut(root_id.as_ref()) {
                gene.has_cds = true;
            }
        }

        true
    }

    /// Re-submits every feature waiting on `parent_id` that has not already
    /// consumed it, recursively waking anything that in turn waits on one
    /// of those. Depth is bounded by the gene → transcript → leaf
    /// hierarchy, so recursion never exceeds three levels.
    fn resolve(&mut self, parent_id: &str) {
        let indices = self.deferred.take_waiting(parent_id);
        for idx in indices {
            if self.deferred.arena[idx].consumed.contains(parent_id) {
                continue;
            }

            let feature_id = self.deferred.arena[idx].feature_id.clone();
            let feature_type = self.deferred.arena[idx].feature_type.clone();
            let length = self.deferred.arena[idx].length;

            let attached = self.attach_to_parent(feature_id.as_deref(), &feature_type, length, parent_id);
            if attached {
                self.deferred.arena[idx].consumed.insert(Box::from(parent_id));
            }

            if attached {
                if let Some(id) = &feature_id {
                    self.resolve(id);
                }
            }
        }
    }

    /// Genes accumulated so far, keyed by id.
    pub fn genes(&self) -> &HashMap<Box<str>, Gene> {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut HashMap<Box<str>, Gene> {
        &mut self.genes
    }

    /// Transcripts accumulated so far, keyed by id.
    pub fn transcripts(&self) -> &HashMap<Box<str>, Transcript> {
        &self.transcripts
    }

    /// Count and a small sample of features that never found a parent.
    pub fn unresolved(&self) -> UnresolvedSummary {
        let mut samples = Vec::new();
        let mut count = 0;
        for feature in &self.deferred.arena {
            if !feature.consumed.is_empty() {
                continue;
            }
            count += 1;
            if samples.len() < MAX_SAMPLES {
                let id = feature.feature_id.as_deref().unwrap_or("<unknown>");
                samples.push(format!(
                    "{} ({}, parent={:?})",
                    id, feature.feature_type, feature.parent_ids
                ));
            }
        }
        UnresolvedSummary { count, samples }
    }
}
