use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::error::{Error, ErrorKind, Result};
use crate::index::posting::{FieldLengthMap, PostingMap};

/// Term-frequency component of a SMART triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfWeight {
    /// `n`: raw tf
    Natural,
    /// `l`: 1 + ln(tf) for tf > 0, 0 otherwise
    Logarithmic,
}

/// Document-frequency component of a SMART triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfWeight {
    /// `n`: no idf
    None,
    /// `t`: multiply by idf
    Idf,
}

/// Normalization component of a SMART triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormWeight {
    /// `n`: none
    None,
    /// `c`: divide by the Euclidean norm
    Cosine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartTriple {
    pub tf: TfWeight,
    pub df: DfWeight,
    pub norm: NormWeight,
}

impl SmartTriple {
    fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let (tf, df, norm) = match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(tf), Some(df), Some(norm), None) => (tf, df, norm),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    format!("bad SMART triple: {}", s),
                ))
            }
        };
        Ok(SmartTriple {
            tf: match tf {
                'n' => TfWeight::Natural,
                'l' => TfWeight::Logarithmic,
                other => {
                    return Err(Error::new(
                        ErrorKind::InvalidArgument,
                        format!("bad tf code: {}", other),
                    ))
                }
            },
            df: match df {
                'n' => DfWeight::None,
                't' => DfWeight::Idf,
                other => {
                    return Err(Error::new(
                        ErrorKind::InvalidArgument,
                        format!("bad df code: {}", other),
                    ))
                }
            },
            norm: match norm {
                'n' => NormWeight::None,
                'c' => NormWeight::Cosine,
                other => {
                    return Err(Error::new(
                        ErrorKind::InvalidArgument,
                        format!("bad normalization code: {}", other),
                    ))
                }
            },
        })
    }
}

/// SMART weighting pair "ddd.qqq": document triple, then query triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartSpec {
    pub document: SmartTriple,
    pub query: SmartTriple,
}

impl SmartSpec {
    pub fn parse(s: &str) -> Result<Self> {
        let (document, query) = s.split_once('.').ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!("bad SMART pair: {}", s),
            )
        })?;
        Ok(SmartSpec {
            document: SmartTriple::parse(document)?,
            query: SmartTriple::parse(query)?,
        })
    }
}

/// Pure scoring math over one posting map and the corpus size.
///
/// Borrows an immutable view of the index; owns only its IDF cache.
pub struct Scorer<'a> {
    index: &'a PostingMap,
    doc_count: usize,
    idf_cache: RwLock<HashMap<String, f64>>,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a PostingMap, doc_count: usize) -> Self {
        Scorer {
            index,
            doc_count,
            idf_cache: RwLock::new(HashMap::new()),
        }
    }

    /// idf(t) = ln(N / df); 0 when the term is absent or df = 0. Cached.
    pub fn idf(&self, term: &str) -> f64 {
        if let Some(cached) = self.idf_cache.read().get(term) {
            return *cached;
        }
        let idf = match self.index.get(term) {
            Some(list) if list.doc_freq() > 0 => {
                (self.doc_count as f64 / list.doc_freq() as f64).ln()
            }
            _ => 0.0,
        };
        self.idf_cache.write().insert(term.to_string(), idf);
        idf
    }

    /// Union of posting-list docIDs over the query terms present in the
    /// index: the candidate set scored
    pub fn candidates(&self, query: &[String]) -> Vec<String> {
        let mut docs: Vec<String> = query
            .iter()
            .filter_map(|term| self.index.get(term))
            .flat_map(|list| list.iter().map(|(id, _)| id.to_string()))
            .collect();
        docs.sort();
        docs.dedup();
        docs
    }

    fn query_tfs(query: &[String]) -> HashMap<&str, u32> {
        let mut tfs: HashMap<&str, u32> = HashMap::new();
        for term in query {
            *tfs.entry(term.as_str()).or_insert(0) += 1;
        }
        tfs
    }

    /// Unique query terms that appear in the index, in first-seen order
    fn known_terms<'b>(&self, query: &'b [String]) -> Vec<&'b str> {
        let mut seen: Vec<&str> = Vec::new();
        for term in query {
            if self.index.contains_key(term.as_str()) && !seen.contains(&term.as_str()) {
                seen.push(term);
            }
        }
        seen
    }

    /// Vector-space scores for every candidate document.
    ///
    /// Vectors span the unique query terms present in the index; terms
    /// unseen in the corpus contribute nothing. A zero-norm vector under
    /// cosine normalization scores 0.
    pub fn vector_space_scores(
        &self,
        query: &[String],
        spec: &SmartSpec,
    ) -> HashMap<String, f64> {
        let terms = self.known_terms(query);
        let query_tfs = Self::query_tfs(query);

        // The query vector is the same for every document
        let mut query_vec: Vec<f64> = terms
            .iter()
            .map(|term| {
                let tf = f64::from(query_tfs[term]);
                let weighted = match spec.query.tf {
                    TfWeight::Natural => tf,
                    TfWeight::Logarithmic => 1.0 + tf.ln(),
                };
                match spec.query.df {
                    DfWeight::None => weighted,
                    DfWeight::Idf => weighted * self.idf(term),
                }
            })
            .collect();
        if spec.query.norm == NormWeight::Cosine && !normalize(&mut query_vec) {
            return self
                .candidates(query)
                .into_iter()
                .map(|doc| (doc, 0.0))
                .collect();
        }

        let mut scores = HashMap::new();
        for doc_id in self.candidates(query) {
            let mut doc_vec: Vec<f64> = terms
                .iter()
                .map(|term| {
                    let tf = self.index[*term].get(&doc_id).unwrap_or(0);
                    let weighted = match spec.document.tf {
                        TfWeight::Natural => f64::from(tf),
                        TfWeight::Logarithmic if tf > 0 => 1.0 + f64::from(tf).ln(),
                        TfWeight::Logarithmic => 0.0,
                    };
                    match spec.document.df {
                        DfWeight::None => weighted,
                        DfWeight::Idf => weighted * self.idf(term),
                    }
                })
                .collect();
            let score = if spec.document.norm == NormWeight::Cosine && !normalize(&mut doc_vec)
            {
                0.0
            } else {
                dot(&query_vec, &doc_vec)
            };
            scores.insert(doc_id, score);
        }
        scores
    }

    /// Okapi BM25 scores for every candidate document, over the
    /// deduplicated query term set
    pub fn bm25_scores(
        &self,
        query: &[String],
        average_field_length: f64,
        lengths: &FieldLengthMap,
        k1: f64,
        b: f64,
    ) -> HashMap<String, f64> {
        let terms = self.known_terms(query);

        let mut scores = HashMap::new();
        for doc_id in self.candidates(query) {
            let doc_length = f64::from(lengths.get(&doc_id).copied().unwrap_or(0));
            let length_ratio = if average_field_length > 0.0 {
                doc_length / average_field_length
            } else {
                0.0
            };
            let mut score = 0.0;
            for term in &terms {
                let tf = f64::from(self.index[*term].get(&doc_id).unwrap_or(0));
                score += self.idf(term) * (tf * (k1 + 1.0))
                    / (tf + k1 * (1.0 - b + b * length_ratio));
            }
            scores.insert(doc_id, score);
        }
        scores
    }
}

fn normalize(vec: &mut [f64]) -> bool {
    let norm = vec.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
        true
    } else {
        false
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::posting::PostingList;

    fn index_with(entries: &[(&str, &[(&str, u32)])]) -> PostingMap {
        entries
            .iter()
            .map(|(term, postings)| {
                let list: PostingList = postings
                    .iter()
                    .map(|(id, tf)| (id.to_string(), *tf))
                    .collect();
                (term.to_string(), list)
            })
            .collect()
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_smart_spec_parse() {
        let spec = SmartSpec::parse("lnc.ltc").unwrap();
        assert_eq!(spec.document.tf, TfWeight::Logarithmic);
        assert_eq!(spec.document.df, DfWeight::None);
        assert_eq!(spec.document.norm, NormWeight::Cosine);
        assert_eq!(spec.query.df, DfWeight::Idf);

        assert!(SmartSpec::parse("xtc.lnn").is_err());
        assert!(SmartSpec::parse("lnc").is_err());
        assert!(SmartSpec::parse("lncc.ltc").is_err());
    }

    #[test]
    fn test_idf_value() {
        // N = 1000, df = 100 -> ln(10)
        let postings: Vec<(String, u32)> =
            (0..100).map(|i| (format!("tt{:04}", i), 1)).collect();
        let mut index = PostingMap::new();
        index.insert("good".into(), postings.into_iter().collect());

        let scorer = Scorer::new(&index, 1000);
        let idf = scorer.idf("good");
        assert!((idf - 10f64.ln()).abs() < 1e-9);
        assert!((idf - 2.302585).abs() < 1e-6);
        // cache hit returns the same value
        assert_eq!(scorer.idf("good"), idf);
    }

    #[test]
    fn test_idf_bounds() {
        let index = index_with(&[("good", &[("tt1", 1), ("tt2", 1)])]);
        let scorer = Scorer::new(&index, 2);

        // df = N -> idf = 0; absent term -> idf = 0
        assert_eq!(scorer.idf("good"), 0.0);
        assert_eq!(scorer.idf("missing"), 0.0);

        let scorer = Scorer::new(&index, 10);
        assert!(scorer.idf("good") > 0.0);
    }

    #[test]
    fn test_candidates_union() {
        let index = index_with(&[
            ("good", &[("tt1", 1), ("tt2", 2)]),
            ("fight", &[("tt2", 1), ("tt3", 1)]),
        ]);
        let scorer = Scorer::new(&index, 3);

        let docs = scorer.candidates(&terms(&["good", "fight", "missing"]));
        assert_eq!(docs, vec!["tt1", "tt2", "tt3"]);
        assert!(scorer.candidates(&terms(&["missing"])).is_empty());
    }

    #[test]
    fn test_bm25_closed_form() {
        // tf = 3 with |d| = avg: score = idf * (3 * 2.5) / (3 + 1.5)
        let index = index_with(&[("good", &[("tt1", 3)])]);
        let scorer = Scorer::new(&index, 2);
        let lengths: FieldLengthMap =
            [("tt1".to_string(), 10), ("tt2".to_string(), 10)].into_iter().collect();

        let scores = scorer.bm25_scores(&terms(&["good"]), 10.0, &lengths, 1.5, 0.75);
        let expected = 2f64.ln() * (3.0 * 2.5) / 4.5;
        assert!((scores["tt1"] - expected).abs() < 1e-9);
        assert!((scores["tt1"] - 2f64.ln() * 1.6667).abs() < 1e-4);
    }

    #[test]
    fn test_bm25_monotonic_in_tf() {
        let lengths: FieldLengthMap =
            [("tt1".to_string(), 10), ("tt2".to_string(), 10)].into_iter().collect();
        let mut last = 0.0;
        for tf in 1..6 {
            let index = index_with(&[("good", &[("tt1", tf)])]);
            let scorer = Scorer::new(&index, 2);
            let score =
                scorer.bm25_scores(&terms(&["good"]), 10.0, &lengths, 1.5, 0.75)["tt1"];
            assert!(score > last, "tf={} should strictly increase", tf);
            last = score;
        }
    }

    #[test]
    fn test_bm25_monotonic_in_length() {
        let index = index_with(&[("good", &[("tt1", 3)])]);
        let scorer = Scorer::new(&index, 2);
        let mut last = f64::INFINITY;
        for len in [5u32, 10, 20, 40] {
            let lengths: FieldLengthMap = [("tt1".to_string(), len)].into_iter().collect();
            let score =
                scorer.bm25_scores(&terms(&["good"]), 10.0, &lengths, 1.5, 0.75)["tt1"];
            assert!(score < last, "|d|={} should strictly decrease", len);
            last = score;
        }
    }

    #[test]
    fn test_vector_space_cosine_range() {
        let index = index_with(&[
            ("good", &[("tt1", 4), ("tt2", 1)]),
            ("fight", &[("tt1", 2)]),
        ]);
        let scorer = Scorer::new(&index, 5);
        let spec = SmartSpec::parse("lnc.ltc").unwrap();

        let scores = scorer.vector_space_scores(&terms(&["good", "fight"]), &spec);
        for (_, score) in scores {
            assert!((-1.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_vector_space_identical_doc_scores_one() {
        // A document whose vector matches the query vector exactly has
        // cosine similarity 1 under nnc.nnc
        let index = index_with(&[("good", &[("tt1", 1)]), ("fight", &[("tt1", 1)])]);
        let scorer = Scorer::new(&index, 2);
        let spec = SmartSpec::parse("nnc.nnc").unwrap();

        let scores = scorer.vector_space_scores(&terms(&["good", "fight"]), &spec);
        assert!((scores["tt1"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vector_space_unknown_terms_score_nothing() {
        let index = index_with(&[("good", &[("tt1", 1)])]);
        let scorer = Scorer::new(&index, 2);
        let spec = SmartSpec::parse("nnn.nnn").unwrap();

        let scores = scorer.vector_space_scores(&terms(&["missing"]), &spec);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_vector_space_ltn_weighting() {
        // ltn.nnn: doc side (1 + ln tf) * idf, raw query tf, no norms
        let index = index_with(&[("good", &[("tt1", 3), ("tt2", 1)])]);
        let scorer = Scorer::new(&index, 4);
        let spec = SmartSpec::parse("ltn.nnn").unwrap();

        let scores = scorer.vector_space_scores(&terms(&["good"]), &spec);
        let idf = (4f64 / 2f64).ln();
        assert!((scores["tt1"] - (1.0 + 3f64.ln()) * idf).abs() < 1e-9);
        assert!((scores["tt2"] - idf).abs() < 1e-9);
    }
}
