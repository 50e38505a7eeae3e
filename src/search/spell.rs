use std::collections::{HashMap, HashSet};

use crate::core::error::{Error, ErrorKind, Result};

/// Fuzzy spelling correction over the corpus vocabulary.
///
/// Candidate generation is character-shingle Jaccard against every
/// vocabulary word, reranked by corpus term frequency. Lookups are linear
/// in the vocabulary; small corpora and rare corrections keep this cheap.
/// TODO: rebuild as an inverted shingle index if lookups become hot.
#[derive(Debug)]
pub struct SpellCorrector {
    shingled_words: HashMap<String, HashSet<String>>,
    word_counter: HashMap<String, u64>,
    shingle_k: usize,
}

impl SpellCorrector {
    /// Build the vocabulary from corpus document strings: lowercase,
    /// whitespace-split, per-word shingle set and corpus term frequency.
    pub fn new(documents: &[String], shingle_k: usize) -> Result<Self> {
        let mut shingled_words = HashMap::new();
        let mut word_counter: HashMap<String, u64> = HashMap::new();

        for document in documents {
            for term in document.to_lowercase().split_whitespace() {
                if !word_counter.contains_key(term) {
                    shingled_words
                        .insert(term.to_string(), Self::shingle_word(term, shingle_k));
                }
                *word_counter.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        if word_counter.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "spell correction requires a non-empty vocabulary",
            ));
        }

        Ok(SpellCorrector {
            shingled_words,
            word_counter,
            shingle_k,
        })
    }

    /// Character k-shingles of a word; a word shorter than k contributes
    /// itself as its only shingle
    pub fn shingle_word(word: &str, k: usize) -> HashSet<String> {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < k {
            return HashSet::from([word.to_string()]);
        }
        (0..=chars.len() - k)
            .map(|i| chars[i..i + k].iter().collect())
            .collect()
    }

    /// Jaccard similarity |A∩B| / |A∪B|, defined as 0 when either set is
    /// empty (intentional carve-out, including the 0/0 case)
    pub fn jaccard(first: &HashSet<String>, second: &HashSet<String>) -> f64 {
        if first.is_empty() || second.is_empty() {
            return 0.0;
        }
        let intersection = first.intersection(second).count();
        let union = first.len() + second.len() - intersection;
        intersection as f64 / union as f64
    }

    /// Top 5 vocabulary words for a misspelled token: ranked by shingle
    /// Jaccard, then reranked by jaccard * tf / max_tf over the five,
    /// ties keeping the Jaccard order.
    pub fn find_nearest(&self, word: &str) -> Vec<String> {
        let word_shingles = Self::shingle_word(word, self.shingle_k);

        let mut candidates: Vec<(f64, &str)> = self
            .shingled_words
            .iter()
            .map(|(term, shingles)| (Self::jaccard(&word_shingles, shingles), term.as_str()))
            .collect();
        candidates.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.1.cmp(a.1))
        });
        candidates.truncate(5);

        let max_tf = candidates
            .iter()
            .filter_map(|(_, term)| self.word_counter.get(*term))
            .max()
            .copied()
            .unwrap_or(1)
            .max(1);

        let mut reranked: Vec<(f64, &str)> = candidates
            .iter()
            .map(|(jaccard, term)| {
                let tf = self.word_counter.get(*term).copied().unwrap_or(0);
                (jaccard * (tf as f64 / max_tf as f64), *term)
            })
            .collect();
        // stable sort keeps the established Jaccard order for ties
        reranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        reranked.into_iter().map(|(_, term)| term.to_string()).collect()
    }

    /// Correct a query: in-vocabulary tokens pass through unchanged, every
    /// other token is replaced by its nearest vocabulary word
    pub fn correct(&self, query: &str) -> String {
        let mut fixed: Vec<String> = Vec::new();
        for term in query.to_lowercase().split_whitespace() {
            if self.word_counter.contains_key(term) {
                fixed.push(term.to_string());
            } else if let Some(best) = self.find_nearest(term).into_iter().next() {
                fixed.push(best);
            }
        }
        fixed.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_empty_vocabulary_is_rejected() {
        let err = SpellCorrector::new(&[], 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        let err = SpellCorrector::new(&corpus(&["", "   "]), 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_shingle_word() {
        let shingles = SpellCorrector::shingle_word("hello", 2);
        let expected: HashSet<String> =
            ["he", "el", "ll", "lo"].iter().map(|s| s.to_string()).collect();
        assert_eq!(shingles, expected);

        // shorter than k: the word itself
        let shingles = SpellCorrector::shingle_word("a", 2);
        assert_eq!(shingles, HashSet::from(["a".to_string()]));
    }

    #[test]
    fn test_jaccard_empty_carve_out() {
        let empty: HashSet<String> = HashSet::new();
        let some = SpellCorrector::shingle_word("hello", 2);
        assert_eq!(SpellCorrector::jaccard(&empty, &some), 0.0);
        assert_eq!(SpellCorrector::jaccard(&some, &empty), 0.0);
        assert_eq!(SpellCorrector::jaccard(&empty, &empty), 0.0);
        assert_eq!(SpellCorrector::jaccard(&some, &some), 1.0);
    }

    #[test]
    fn test_find_nearest_ranks_by_shingle_overlap() {
        let corrector = SpellCorrector::new(&corpus(&["hello help hero"]), 2).unwrap();
        // "hllo" shares "ll" and "lo" with "hello" only
        let nearest = corrector.find_nearest("hllo");
        assert_eq!(nearest[0], "hello");
        assert!(nearest.len() <= 5);
    }

    #[test]
    fn test_rerank_by_corpus_frequency() {
        // "food" and "good" tie on Jaccard against "ood"; the more
        // frequent word wins the rerank
        let corrector =
            SpellCorrector::new(&corpus(&["good good good food"]), 2).unwrap();
        let nearest = corrector.find_nearest("ood");
        assert_eq!(nearest[0], "good");
    }

    #[test]
    fn test_correct_replaces_only_missing_tokens() {
        let corrector =
            SpellCorrector::new(&corpus(&["hello help hero world"]), 2).unwrap();
        assert_eq!(corrector.correct("hllo world"), "hello world");
        assert_eq!(corrector.correct("Hello World"), "hello world");
    }

    #[test]
    fn test_correct_fixed_point() {
        let corrector =
            SpellCorrector::new(&corpus(&["hello help hero world"]), 2).unwrap();
        let once = corrector.correct("hllo wrld");
        let twice = corrector.correct(&once);
        assert_eq!(once, twice);
    }
}
