use std::path::PathBuf;

use crate::analysis::normalizer::DEFAULT_STOP_WORDS;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,

    // MinHash / LSH
    pub num_hashes: usize,
    pub shingle_k: usize,

    // Okapi BM25
    pub bm25_k1: f64,
    pub bm25_b: f64,

    // Tiered index (high, medium) tf thresholds
    pub tier_thresholds: (u32, u32),

    pub stop_words: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./data"),
            num_hashes: 200,
            shingle_k: 2,
            bm25_k1: 1.5,
            bm25_b: 0.75,
            tier_thresholds: (10, 3), // first tier tf >= 10, second tier tf >= 3
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
