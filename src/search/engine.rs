use std::collections::HashMap;

use crate::analysis::normalizer::Normalizer;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Field, RankedHit};
use crate::index::builder::IndexBuilder;
use crate::index::metadata::MetadataIndex;
use crate::index::posting::{FieldLengthMap, PostingMap};
use crate::index::store::IndexStore;
use crate::index::tiered::TieredPostings;
use crate::scoring::scorer::{DfWeight, NormWeight, Scorer, SmartSpec, SmartTriple, TfWeight};

/// Smoothing flavors accepted by the unigram language-model interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    Bayes,
    Naive,
    Mixture,
}

impl Smoothing {
    pub fn parse(s: &str) -> Result<Smoothing> {
        match s {
            "bayes" => Ok(Smoothing::Bayes),
            "naive" => Ok(Smoothing::Naive),
            "mixture" => Ok(Smoothing::Mixture),
            other => Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("unknown smoothing method: {}", other),
            )),
        }
    }
}

/// Scoring method routed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    VectorSpace(SmartSpec),
    OkapiBM25,
    Unigram,
}

impl Method {
    /// A SMART pair string ("lnc.ltc", "ltn.lnn", ...) routes to the
    /// vector-space model; the literals "OkapiBM25" and "unigram" route
    /// to BM25 and the language-model path.
    pub fn parse(s: &str) -> Result<Method> {
        match s {
            "OkapiBM25" => Ok(Method::OkapiBM25),
            "unigram" => Ok(Method::Unigram),
            other => Ok(Method::VectorSpace(SmartSpec::parse(other)?)),
        }
    }
}

/// Query-time knobs; defaults mirror the public search API
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub method: Method,
    pub weights: HashMap<Field, f64>,
    pub safe_ranking: bool,
    /// None means unlimited (the whole corpus)
    pub max_results: Option<usize>,
    pub smoothing: Option<Smoothing>,
    pub alpha: f64,
    pub lambda: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            // "lnc.ltc"
            method: Method::VectorSpace(SmartSpec {
                document: SmartTriple {
                    tf: TfWeight::Logarithmic,
                    df: DfWeight::None,
                    norm: NormWeight::Cosine,
                },
                query: SmartTriple {
                    tf: TfWeight::Logarithmic,
                    df: DfWeight::Idf,
                    norm: NormWeight::Cosine,
                },
            }),
            weights: Field::ALL.iter().map(|f| (*f, 1.0)).collect(),
            safe_ranking: true,
            max_results: Some(10),
            smoothing: None,
            alpha: 0.5,
            lambda: 0.5,
        }
    }
}

/// Top-level query orchestrator.
///
/// Holds read-only views of every index it routes to; all indexes are
/// immutable after load, so the engine can be shared freely.
#[derive(Debug)]
pub struct SearchEngine {
    normalizer: Normalizer,
    postings: HashMap<Field, PostingMap>,
    tiered: HashMap<Field, TieredPostings>,
    lengths: HashMap<Field, FieldLengthMap>,
    metadata: MetadataIndex,
    bm25_k1: f64,
    bm25_b: f64,
}

impl SearchEngine {
    /// Build the engine directly from a finished IndexBuilder
    pub fn from_builder(builder: IndexBuilder, config: &Config) -> Result<Self> {
        let (postings, lengths, documents) = builder.into_parts();
        let (high, medium) = config.tier_thresholds;
        let tiered = postings
            .iter()
            .map(|(field, map)| (*field, TieredPostings::build(map, high, medium)))
            .collect();
        let metadata = MetadataIndex::compute(documents.len(), &lengths);

        Ok(SearchEngine {
            normalizer: Normalizer::new(&config.stop_words)?,
            postings,
            tiered,
            lengths,
            metadata,
            bm25_k1: config.bm25_k1,
            bm25_b: config.bm25_b,
        })
    }

    /// Load every routed index from persisted JSON snapshots
    pub fn from_store(store: &IndexStore, config: &Config) -> Result<Self> {
        let mut postings = HashMap::new();
        let mut tiered = HashMap::new();
        let mut lengths = HashMap::new();
        for field in Field::ALL {
            postings.insert(field, store.load_postings(field)?);
            tiered.insert(field, store.load_tiered(field)?);
            lengths.insert(field, store.load_field_lengths(field)?);
        }

        Ok(SearchEngine {
            normalizer: Normalizer::new(&config.stop_words)?,
            postings,
            tiered,
            lengths,
            metadata: store.load_metadata()?,
            bm25_k1: config.bm25_k1,
            bm25_b: config.bm25_b,
        })
    }

    pub fn metadata(&self) -> &MetadataIndex {
        &self.metadata
    }

    /// Search the indexes, returning (docID, score) pairs in descending
    /// score order, at most `max_results` of them.
    ///
    /// The query runs through the same normalization pipeline as the
    /// summaries field. An empty normalized query, or a query whose terms
    /// appear in no index, yields an empty list.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<RankedHit>> {
        if options.method == Method::Unigram {
            let smoothing = options
                .smoothing
                .map(|s| format!("{:?}", s))
                .unwrap_or_else(|| "none".to_string());
            return Err(Error::new(
                ErrorKind::Unsupported,
                format!("unigram model (smoothing: {}) is not implemented", smoothing),
            ));
        }

        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let max_results = options
            .max_results
            .unwrap_or(self.metadata.document_count);

        let mut final_scores: HashMap<String, f64> = HashMap::new();
        for (field, weight) in &options.weights {
            if *weight <= 0.0 {
                continue;
            }
            let field_scores = if options.safe_ranking {
                self.safe_field_scores(*field, &terms, &options.method)?
            } else {
                self.tiered_field_scores(*field, &terms, &options.method, max_results)?
            };
            // documents absent from this field simply contribute 0
            for (doc_id, score) in field_scores {
                *final_scores.entry(doc_id).or_insert(0.0) += weight * score;
            }
        }

        let mut hits: Vec<RankedHit> = final_scores
            .into_iter()
            .map(|(doc_id, score)| RankedHit { doc_id, score })
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        hits.truncate(max_results);
        Ok(hits)
    }

    /// Score every candidate against the full per-field posting map
    fn safe_field_scores(
        &self,
        field: Field,
        terms: &[String],
        method: &Method,
    ) -> Result<HashMap<String, f64>> {
        self.score_with(&self.postings[&field], field, terms, method)
    }

    /// Early-termination pathway: walk tiers 1 -> 2 -> 3, summing scores
    /// per docID, and stop once enough candidates accumulated
    fn tiered_field_scores(
        &self,
        field: Field,
        terms: &[String],
        method: &Method,
        max_results: usize,
    ) -> Result<HashMap<String, f64>> {
        let mut scores: HashMap<String, f64> = HashMap::new();
        for tier in self.tiered[&field].tiers() {
            let tier_scores = self.score_with(tier, field, terms, method)?;
            for (doc_id, score) in tier_scores {
                *scores.entry(doc_id).or_insert(0.0) += score;
            }
            if scores.len() >= max_results {
                break;
            }
        }
        Ok(scores)
    }

    fn score_with(
        &self,
        index: &PostingMap,
        field: Field,
        terms: &[String],
        method: &Method,
    ) -> Result<HashMap<String, f64>> {
        let scorer = Scorer::new(index, self.metadata.document_count);
        match method {
            Method::VectorSpace(spec) => Ok(scorer.vector_space_scores(terms, spec)),
            Method::OkapiBM25 => Ok(scorer.bm25_scores(
                terms,
                self.metadata.average_length(field),
                &self.lengths[&field],
                self.bm25_k1,
                self.bm25_b,
            )),
            Method::Unigram => Err(Error::new(
                ErrorKind::Unsupported,
                "unigram model is not implemented",
            )),
        }
    }
}
