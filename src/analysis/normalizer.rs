use std::collections::HashSet;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::lemmatizer::lemmatize;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Field, Record};

/// Closed stop-word set, removed as whole words after stemming
pub const DEFAULT_STOP_WORDS: [&str; 10] = [
    "this", "that", "about", "whom", "being", "where", "why", "had", "should", "each",
];

/// Deterministic text pipeline applied identically to documents at index
/// time and to queries at search time.
///
/// Pipeline order: strip HTML, strip URLs and mail-like tokens, fold
/// newlines / numeric entities / non-ASCII / punctuation to spaces,
/// lowercase, tokenize, Porter-stem, lemmatize, drop stop words.
#[derive(Debug)]
pub struct Normalizer {
    html: Regex,
    link_patterns: Vec<Regex>,
    newlines: Regex,
    entities: Regex,
    non_ascii: Regex,
    non_word: Regex,
    stop_words: HashSet<String>,
}

impl Normalizer {
    pub fn new(stop_words: &[String]) -> Result<Self> {
        let link_patterns = [r"http\S*", r"www\S*", r"\S+\.com\S*", r"\S+\.org\S*", r"\S*@\S*"]
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Normalizer {
            html: compile(r"<[^<]+?>")?,
            link_patterns,
            newlines: compile(r"\n")?,
            entities: compile(r"&#[0-9]+;")?,
            non_ascii: compile(r"[^\x00-\x7F]")?,
            non_word: compile(r"[^\w\s]")?,
            stop_words: stop_words.iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    pub fn with_default_stop_words() -> Result<Self> {
        let words: Vec<String> = DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect();
        Normalizer::new(&words)
    }

    /// Remove HTML markup, URLs and mail-like tokens
    pub fn strip_links(&self, text: &str) -> String {
        let mut clean = self.html.replace_all(text, "").into_owned();
        for pattern in &self.link_patterns {
            clean = pattern.replace_all(&clean, "").into_owned();
        }
        clean
    }

    /// Fold newlines, numeric HTML entities, non-ASCII code points and
    /// punctuation to single spaces
    pub fn strip_punctuation(&self, text: &str) -> String {
        let text = self.newlines.replace_all(text, " ");
        let text = self.entities.replace_all(&text, " ");
        let text = self.non_ascii.replace_all(&text, " ");
        self.non_word.replace_all(&text, " ").into_owned()
    }

    /// Word-tokenize already-stripped text
    pub fn tokenize(text: &str) -> Vec<String> {
        text.unicode_words().map(|w| w.to_string()).collect()
    }

    /// Full pipeline: returns the ordered token stream for one field string
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let text = self.strip_links(text);
        let text = self.strip_punctuation(&text);
        let text = text.to_lowercase();

        let stemmer = Stemmer::create(Algorithm::English);
        Self::tokenize(&text)
            .into_iter()
            .map(|token| lemmatize(&stemmer.stem(&token)))
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    /// Normalized tokens joined with single spaces (the stored field form)
    pub fn normalize_join(&self, text: &str) -> String {
        self.normalize(text).join(" ")
    }

    /// Normalize the indexed fields of a record.
    ///
    /// `genres` and `summaries` run through the full pipeline. `stars` is
    /// lowercased only; person names keep their surface form.
    pub fn normalize_record(&self, record: &Record) -> Record {
        let mut normalized = record.clone();
        for field in [Field::Genres, Field::Summaries] {
            let values = record
                .field_values(field)
                .iter()
                .map(|value| self.normalize_join(value))
                .collect();
            normalized.set_field_values(field, values);
        }
        let stars = record
            .field_values(Field::Stars)
            .iter()
            .map(|value| value.to_lowercase())
            .collect();
        normalized.set_field_values(Field::Stars, stars);
        normalized
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::new(ErrorKind::InvalidArgument, format!("invalid pattern: {}", e)))
}
