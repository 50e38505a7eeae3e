use rust_stemmers::{Algorithm, Stemmer};

/// Extracts the best windows around query-term occurrences in a document
/// field and marks the hits.
///
/// The doc string is expected lowercased and punctuation-free but
/// unstemmed (the stored field form before stemming); matching happens on
/// stems, marking happens on the surface tokens.
pub struct SnippetBuilder {
    /// Number of words kept on each side of a query hit
    pub window: usize,
}

impl SnippetBuilder {
    pub fn new(window: usize) -> Self {
        SnippetBuilder { window }
    }

    /// Returns the marked snippet (query hits wrapped in `***`), windows
    /// joined by `...`, and the query tokens whose stem never appears in
    /// the doc, in original query order.
    pub fn find_snippet(&self, doc: &str, query: &str) -> (String, Vec<String>) {
        let k = self.window;
        let stemmer = Stemmer::create(Algorithm::English);

        let doc_tokens: Vec<&str> = doc.split_whitespace().collect();
        let query_tokens: Vec<&str> = query.split_whitespace().collect();
        let doc_stems: Vec<String> = doc_tokens
            .iter()
            .map(|t| stemmer.stem(&t.to_lowercase()).to_string())
            .collect();
        let query_stems: Vec<String> = query_tokens
            .iter()
            .map(|t| stemmer.stem(&t.to_lowercase()).to_string())
            .collect();

        let query_index =
            |stem: &str| query_stems.iter().position(|qs| qs == stem);

        // occurrences of query stems in the doc
        let mut occurrences: Vec<(usize, usize)> = Vec::new();
        let mut found: Vec<bool> = vec![false; query_stems.len()];
        for (doc_pos, stem) in doc_stems.iter().enumerate() {
            if let Some(query_pos) = query_index(stem) {
                occurrences.push((doc_pos, query_pos));
                found[query_pos] = true;
            }
        }
        let not_exist: Vec<String> = query_tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| !found[*i])
            .map(|(_, t)| t.to_string())
            .collect();

        // per query term, the doc position with the most other query
        // stems within +-k; ties keep the smaller position
        let mut best: Vec<Option<usize>> = vec![None; query_stems.len()];
        let mut best_count: Vec<usize> = vec![0; query_stems.len()];
        for &(doc_pos, query_pos) in &occurrences {
            let lo = doc_pos.saturating_sub(k);
            let hi = (doc_pos + k + 1).min(doc_stems.len());
            let count = (lo..hi)
                .filter(|&i| i != doc_pos && query_index(&doc_stems[i]).is_some())
                .count();
            if best[query_pos].is_none() || count > best_count[query_pos] {
                best[query_pos] = Some(doc_pos);
                best_count[query_pos] = count;
            }
        }

        // greedy windows: extend left by k, then walk right, pushing the
        // bound out by k every time another query stem turns up
        let mut visited: Vec<bool> = vec![false; query_stems.len()];
        let mut windows: Vec<(usize, Vec<usize>)> = Vec::new();
        for query_pos in 0..query_stems.len() {
            if visited[query_pos] {
                continue;
            }
            let pos = match best[query_pos] {
                Some(pos) => pos,
                None => continue,
            };
            visited[query_pos] = true;

            let mut count = 1;
            let mut around: Vec<usize> = (pos.saturating_sub(k)..=pos).collect();
            let mut j = pos + 1;
            let mut bound = pos + 1 + k;
            while j < bound && j < doc_stems.len() {
                around.push(j);
                if let Some(hit) = query_index(&doc_stems[j]) {
                    visited[hit] = true;
                    bound = j + 1 + k;
                    count += 1;
                }
                j += 1;
            }
            around.sort_unstable();
            windows.push((count, around));
        }
        windows.sort();

        let window_strings: Vec<String> = windows
            .iter()
            .map(|(_, around)| {
                around
                    .iter()
                    .map(|&i| {
                        if query_index(&doc_stems[i]).is_some() {
                            format!("***{}***", doc_tokens[i])
                        } else {
                            doc_tokens[i].to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        (window_strings.join("..."), not_exist)
    }
}

impl Default for SnippetBuilder {
    fn default() -> Self {
        SnippetBuilder::new(5)
    }
}
