use std::collections::HashMap;

use crate::core::types::{Field, Record};
use crate::index::posting::{FieldLengthMap, PostingMap};

/// Builds the per-field inverted indexes, the per-field document-length
/// maps and the documents index from normalized records.
///
/// Field values are treated as lists of strings; each string is split on
/// whitespace to obtain the indexed tokens.
pub struct IndexBuilder {
    postings: HashMap<Field, PostingMap>,
    lengths: HashMap<Field, FieldLengthMap>,
    documents: HashMap<String, Record>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder {
            postings: Field::ALL.iter().map(|f| (*f, PostingMap::new())).collect(),
            lengths: Field::ALL.iter().map(|f| (*f, FieldLengthMap::new())).collect(),
            documents: HashMap::new(),
        }
    }

    pub fn from_records<I: IntoIterator<Item = Record>>(records: I) -> Self {
        let mut builder = IndexBuilder::new();
        for record in records {
            builder.add_document(&record);
        }
        builder
    }

    /// Add a record to all indexes.
    ///
    /// Idempotent per (field, term, docID): a term whose posting already
    /// contains this docID is skipped, so re-adding a document is a no-op.
    /// The documents index and length maps are updated only for new docIDs.
    pub fn add_document(&mut self, record: &Record) {
        let doc_id = record.id.as_str();
        let is_new = !self.documents.contains_key(doc_id);

        for field in Field::ALL {
            let field_postings = self.postings.entry(field).or_default();

            let mut counts: HashMap<&str, u32> = HashMap::new();
            let mut total = 0u32;
            for value in record.field_values(field) {
                for term in value.split_whitespace() {
                    total += 1;
                    let already_indexed = field_postings
                        .get(term)
                        .map_or(false, |list| list.contains(doc_id));
                    if already_indexed {
                        continue;
                    }
                    *counts.entry(term).or_insert(0) += 1;
                }
            }
            for (term, tf) in counts {
                field_postings
                    .entry(term.to_string())
                    .or_default()
                    .insert(doc_id.to_string(), tf);
            }
            if is_new {
                self.lengths
                    .entry(field)
                    .or_default()
                    .insert(doc_id.to_string(), total);
            }
        }

        if is_new {
            self.documents.insert(doc_id.to_string(), record.clone());
        }
    }

    /// Remove a document from all indexes. Unknown docIDs are ignored.
    ///
    /// Posting entries whose document run becomes empty are kept with an
    /// empty run; readers treat the two states as equivalent.
    pub fn remove_document(&mut self, doc_id: &str) {
        let record = match self.documents.remove(doc_id) {
            Some(record) => record,
            None => return,
        };

        for field in Field::ALL {
            let field_postings = self.postings.entry(field).or_default();
            for value in record.field_values(field) {
                for term in value.split_whitespace() {
                    if let Some(list) = field_postings.get_mut(term) {
                        list.remove(doc_id);
                    }
                }
            }
            self.lengths.entry(field).or_default().remove(doc_id);
        }
    }

    /// Self-check: adding then removing a fresh document must restore the
    /// pre-state, up to posting entries left with an empty run.
    pub fn check_add_remove(&mut self, record: &Record) -> bool {
        if self.documents.contains_key(&record.id) {
            return false;
        }
        let before = self.snapshot();
        self.add_document(record);
        let added = self.documents.contains_key(&record.id);
        self.remove_document(&record.id);
        added && self.snapshot() == before
    }

    fn snapshot(&self) -> IndexSnapshot {
        let postings = self
            .postings
            .iter()
            .map(|(field, map)| {
                let cleaned: PostingMap = map
                    .iter()
                    .filter(|(_, list)| !list.is_empty())
                    .map(|(term, list)| (term.clone(), list.clone()))
                    .collect();
                (*field, cleaned)
            })
            .collect();
        IndexSnapshot {
            postings,
            lengths: self.lengths.clone(),
            documents: self.documents.clone(),
        }
    }

    pub fn posting_map(&self, field: Field) -> &PostingMap {
        &self.postings[&field]
    }

    pub fn field_lengths(&self, field: Field) -> &FieldLengthMap {
        &self.lengths[&field]
    }

    pub fn documents(&self) -> &HashMap<String, Record> {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Merge another builder, summing tf per (field, term, docID).
    /// Lengths and documents keep the first-seen entry per docID.
    pub fn merge(mut self, other: IndexBuilder) -> IndexBuilder {
        for (field, map) in other.postings {
            let field_postings = self.postings.entry(field).or_default();
            for (term, list) in map {
                let target = field_postings.entry(term).or_default();
                for (doc_id, tf) in list.iter() {
                    target.add(doc_id, tf);
                }
            }
        }
        for (field, map) in other.lengths {
            let field_lengths = self.lengths.entry(field).or_default();
            for (doc_id, len) in map {
                field_lengths.entry(doc_id).or_insert(len);
            }
        }
        for (doc_id, record) in other.documents {
            self.documents.entry(doc_id).or_insert(record);
        }
        self
    }

    pub fn into_parts(
        self,
    ) -> (
        HashMap<Field, PostingMap>,
        HashMap<Field, FieldLengthMap>,
        HashMap<String, Record>,
    ) {
        (self.postings, self.lengths, self.documents)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        IndexBuilder::new()
    }
}

#[derive(PartialEq)]
struct IndexSnapshot {
    postings: HashMap<Field, PostingMap>,
    lengths: HashMap<Field, FieldLengthMap>,
    documents: HashMap<String, Record>,
}
