use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// MinHash + banded LSH near-duplicate detector over raw documents.
///
/// Pipeline: word-shingle each document, build the binary characteristic
/// matrix (shingles x documents), derive the MinHash signature matrix from
/// random row permutations, then bucket documents by banded signature
/// hashes. Candidate pairs are verified against their exact shingle-set
/// Jaccard similarity.
pub struct MinHashLsh {
    documents: Vec<String>,
    num_hashes: usize,
    shingle_k: usize,
    shingled_docs: Vec<HashSet<String>>,
    shingles: Vec<String>,
    ch_matrix: Vec<Vec<bool>>,
    signature: Vec<Vec<usize>>,
    rng: StdRng,
}

impl MinHashLsh {
    pub fn new(documents: Vec<String>, num_hashes: usize, shingle_k: usize) -> Self {
        MinHashLsh {
            documents,
            num_hashes,
            shingle_k,
            shingled_docs: Vec::new(),
            shingles: Vec::new(),
            ch_matrix: Vec::new(),
            signature: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic permutations and baselines, for tests
    pub fn with_seed(
        documents: Vec<String>,
        num_hashes: usize,
        shingle_k: usize,
        seed: u64,
    ) -> Self {
        let mut lsh = MinHashLsh::new(documents, num_hashes, shingle_k);
        lsh.rng = StdRng::seed_from_u64(seed);
        lsh
    }

    /// The set of consecutive k-word shingles of a document, joined by
    /// single spaces. Documents shorter than k words have no shingles.
    pub fn shingle_document(document: &str, k: usize) -> HashSet<String> {
        let words: Vec<&str> = document.split_whitespace().collect();
        if words.len() < k {
            return HashSet::new();
        }
        (0..=words.len() - k)
            .map(|i| words[i..i + k].join(" "))
            .collect()
    }

    /// Build the binary characteristic matrix (shingles x documents)
    pub fn build_characteristic_matrix(&mut self) -> &Vec<Vec<bool>> {
        self.shingled_docs = self
            .documents
            .iter()
            .map(|doc| Self::shingle_document(doc, self.shingle_k))
            .collect();

        let mut all_shingles: HashSet<&String> = HashSet::new();
        for shingled in &self.shingled_docs {
            all_shingles.extend(shingled.iter());
        }
        let mut shingles: Vec<String> = all_shingles.into_iter().cloned().collect();
        shingles.sort();

        self.ch_matrix = shingles
            .iter()
            .map(|shingle| {
                self.shingled_docs
                    .iter()
                    .map(|doc| doc.contains(shingle))
                    .collect()
            })
            .collect();
        self.shingles = shingles;
        &self.ch_matrix
    }

    /// MinHash signatures: per permutation, the first permuted row index
    /// whose characteristic entry is 1. A document with no shingles gets
    /// the sentinel `shingles.len()`.
    pub fn min_hash_signature(&mut self) -> &Vec<Vec<usize>> {
        let rows = self.shingles.len();
        let mut signature = Vec::with_capacity(self.num_hashes);
        let mut permutation: Vec<usize> = (0..rows).collect();

        for _ in 0..self.num_hashes {
            permutation.shuffle(&mut self.rng);
            let row = (0..self.documents.len())
                .map(|doc| {
                    permutation
                        .iter()
                        .position(|&r| self.ch_matrix[r][doc])
                        .unwrap_or(rows)
                })
                .collect();
            signature.push(row);
        }
        self.signature = signature;
        &self.signature
    }

    /// Banded LSH bucketization: the signature rows are split into
    /// `bands` bands of `rows_per_band` rows; each (band, document) keys
    /// a bucket by the hash of its sorted signature slice.
    pub fn lsh_buckets(&self, bands: usize, rows_per_band: usize) -> HashMap<u64, Vec<usize>> {
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for band in 0..bands {
            let start = band * rows_per_band;
            let end = (start + rows_per_band).min(self.signature.len());
            for doc in 0..self.documents.len() {
                let mut signs: Vec<usize> = self.signature[start..end]
                    .iter()
                    .map(|row| row[doc])
                    .collect();
                signs.sort_unstable();

                let mut hasher = DefaultHasher::new();
                signs.hash(&mut hasher);
                buckets.entry(hasher.finish()).or_default().push(doc);
            }
        }
        buckets
    }

    /// Run the full pipeline with the default banding (50 bands x 4 rows)
    pub fn perform_lsh(&mut self) -> HashMap<u64, Vec<usize>> {
        self.build_characteristic_matrix();
        self.min_hash_signature();
        self.lsh_buckets(50, self.num_hashes / 50)
    }

    /// Jaccard similarity of two shingle sets; 0 when the union is empty
    pub fn jaccard(first: &HashSet<String>, second: &HashSet<String>) -> f64 {
        let intersection = first.intersection(second).count();
        let union = first.len() + second.len() - intersection;
        if union == 0 {
            return 0.0;
        }
        intersection as f64 / union as f64
    }

    /// Verification harness: every candidate pair is compared against 5
    /// random other documents; a pair counts as correctly detected when
    /// its Jaccard beats the random baseline in all 5 trials. Returns
    /// correct / total pairs (0 when there are no pairs to check).
    pub fn jaccard_similarity_test(&mut self, buckets: &HashMap<u64, Vec<usize>>) -> f64 {
        if self.documents.len() < 3 {
            return 0.0;
        }

        let mut checked: HashSet<(usize, usize)> = HashSet::new();
        let mut correct = 0usize;
        let mut total = 0usize;

        for docs_in_bucket in buckets.values() {
            let unique: Vec<usize> = {
                let mut ids: Vec<usize> = docs_in_bucket.clone();
                ids.sort_unstable();
                ids.dedup();
                ids
            };
            if unique.len() < 2 {
                continue;
            }
            for i in 0..unique.len() {
                for j in i + 1..unique.len() {
                    let pair = (unique[i], unique[j]);
                    if !checked.insert(pair) {
                        continue;
                    }
                    total += 1;

                    let pair_score = Self::jaccard(
                        &self.shingled_docs[pair.0],
                        &self.shingled_docs[pair.1],
                    );
                    let mut wins = 0;
                    for _ in 0..5 {
                        let mut random_doc = pair.0;
                        while random_doc == pair.0 || random_doc == pair.1 {
                            random_doc = self.rng.gen_range(0..self.documents.len());
                        }
                        let baseline = Self::jaccard(
                            &self.shingled_docs[pair.0],
                            &self.shingled_docs[random_doc],
                        );
                        if pair_score > baseline {
                            wins += 1;
                        }
                    }
                    if wins == 5 {
                        correct += 1;
                    }
                }
            }
        }

        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }
}
