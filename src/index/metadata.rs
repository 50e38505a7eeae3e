use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Field;
use crate::index::posting::FieldLengthMap;

/// Per-field mean document length.
///
/// The JSON key `averge_document_length` below keeps the historical
/// misspelling for snapshot compatibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageFieldLengths {
    pub stars: f64,
    pub genres: f64,
    pub summaries: f64,
}

impl AverageFieldLengths {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Stars => self.stars,
            Field::Genres => self.genres,
            Field::Summaries => self.summaries,
        }
    }

    fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::Stars => self.stars = value,
            Field::Genres => self.genres = value,
            Field::Summaries => self.summaries = value,
        }
    }
}

/// Corpus-level statistics consumed by the BM25 scorer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataIndex {
    pub document_count: usize,
    pub averge_document_length: AverageFieldLengths,
}

impl MetadataIndex {
    pub fn compute(
        document_count: usize,
        lengths: &HashMap<Field, FieldLengthMap>,
    ) -> Self {
        let mut averages = AverageFieldLengths::default();
        for field in Field::ALL {
            let mean = lengths
                .get(&field)
                .filter(|map| !map.is_empty())
                .map(|map| {
                    let sum: u64 = map.values().map(|&len| len as u64).sum();
                    sum as f64 / map.len() as f64
                })
                .unwrap_or(0.0);
            averages.set(field, mean);
        }
        MetadataIndex {
            document_count,
            averge_document_length: averages,
        }
    }

    pub fn average_length(&self, field: Field) -> f64 {
        self.averge_document_length.get(field)
    }
}
