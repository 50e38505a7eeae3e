use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Postings for one term: sorted runs of (docID, tf), sorted by docID.
///
/// The JSON snapshot form stays the nested `{docID: tf}` object; only the
/// in-memory representation is a sorted vector. Every stored tf is >= 1,
/// a (term, docID) pair with tf = 0 is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    postings: Vec<(String, u32)>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList { postings: Vec::new() }
    }

    pub fn from_counts(counts: HashMap<String, u32>) -> Self {
        let mut postings: Vec<(String, u32)> =
            counts.into_iter().filter(|(_, tf)| *tf > 0).collect();
        postings.sort_by(|a, b| a.0.cmp(&b.0));
        PostingList { postings }
    }

    /// Term frequency for a document, if present
    pub fn get(&self, doc_id: &str) -> Option<u32> {
        self.postings
            .binary_search_by(|(id, _)| id.as_str().cmp(doc_id))
            .ok()
            .map(|i| self.postings[i].1)
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.get(doc_id).is_some()
    }

    /// Insert or replace the tf for a document, keeping the run sorted
    pub fn insert(&mut self, doc_id: String, tf: u32) {
        if tf == 0 {
            self.remove(&doc_id);
            return;
        }
        match self
            .postings
            .binary_search_by(|(id, _)| id.as_str().cmp(doc_id.as_str()))
        {
            Ok(i) => self.postings[i].1 = tf,
            Err(i) => self.postings.insert(i, (doc_id, tf)),
        }
    }

    /// Add to the tf for a document, inserting it when absent
    pub fn add(&mut self, doc_id: &str, tf: u32) {
        match self
            .postings
            .binary_search_by(|(id, _)| id.as_str().cmp(doc_id))
        {
            Ok(i) => self.postings[i].1 += tf,
            Err(i) => self.postings.insert(i, (doc_id.to_string(), tf)),
        }
    }

    pub fn remove(&mut self, doc_id: &str) {
        if let Ok(i) = self
            .postings
            .binary_search_by(|(id, _)| id.as_str().cmp(doc_id))
        {
            self.postings.remove(i);
        }
    }

    /// Number of documents containing this term (document frequency)
    pub fn doc_freq(&self) -> usize {
        self.postings.len()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Iterate over (docID, tf) in docID order; all scoring code depends
    /// only on this contract
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.postings.iter().map(|(id, tf)| (id.as_str(), *tf))
    }
}

impl FromIterator<(String, u32)> for PostingList {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        PostingList::from_counts(iter.into_iter().collect())
    }
}

impl Serialize for PostingList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.postings.len()))?;
        for (doc_id, tf) in &self.postings {
            map.serialize_entry(doc_id, tf)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PostingList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PostingVisitor;

        impl<'de> Visitor<'de> for PostingVisitor {
            type Value = PostingList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of docID to term frequency")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<PostingList, A::Error> {
                let mut postings: Vec<(String, u32)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((doc_id, tf)) = access.next_entry::<String, u32>()? {
                    postings.push((doc_id, tf));
                }
                postings.sort_by(|a, b| a.0.cmp(&b.0));
                Ok(PostingList { postings })
            }
        }

        deserializer.deserialize_map(PostingVisitor)
    }
}

/// Per-field inverted index: term -> postings
pub type PostingMap = HashMap<String, PostingList>;

/// Per-field docID -> token count
pub type FieldLengthMap = HashMap<String, u32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_insert_and_lookup() {
        let mut list = PostingList::new();
        list.insert("tt3".into(), 2);
        list.insert("tt1".into(), 5);
        list.insert("tt2".into(), 1);

        let ids: Vec<&str> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["tt1", "tt2", "tt3"]);
        assert_eq!(list.get("tt1"), Some(5));
        assert_eq!(list.get("tt9"), None);
        assert_eq!(list.doc_freq(), 3);
    }

    #[test]
    fn test_insert_zero_removes() {
        let mut list = PostingList::new();
        list.insert("tt1".into(), 3);
        list.insert("tt1".into(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_accumulates() {
        let mut list = PostingList::new();
        list.add("tt1", 2);
        list.add("tt1", 3);
        assert_eq!(list.get("tt1"), Some(5));
    }

    #[test]
    fn test_json_is_nested_map() {
        let mut list = PostingList::new();
        list.insert("tt2".into(), 1);
        list.insert("tt1".into(), 4);

        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"{"tt1":4,"tt2":1}"#);

        let back: PostingList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_deserialize_unsorted_input() {
        let back: PostingList = serde_json::from_str(r#"{"b":2,"a":1,"c":3}"#).unwrap();
        let ids: Vec<&str> = back.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
