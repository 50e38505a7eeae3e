use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind, Result};

/// Indexed fields of a catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Stars,
    Genres,
    Summaries,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Stars, Field::Genres, Field::Summaries];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Stars => "stars",
            Field::Genres => "genres",
            Field::Summaries => "summaries",
        }
    }

    pub fn parse(s: &str) -> Result<Field> {
        match s {
            "stars" => Ok(Field::Stars),
            "genres" => Ok(Field::Genres),
            "summaries" => Ok(Field::Summaries),
            other => Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("unknown field: {}", other),
            )),
        }
    }
}

/// Index kinds persisted per field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    Main,
    DocumentLength,
    Tiered,
}

impl IndexType {
    /// File-name infix between the field name and "_index.json"
    pub fn suffix(&self) -> &'static str {
        match self {
            IndexType::Main => "",
            IndexType::DocumentLength => "_document_length",
            IndexType::Tiered => "_tiered",
        }
    }
}

/// A catalog record as produced by the upstream scraper.
///
/// Only `stars`, `genres` and `summaries` are indexed; the remaining
/// fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: Option<String>,
    pub first_page_summary: Option<String>,
    pub release_year: Option<String>,
    pub mpaa: Option<String>,
    pub budget: Option<String>,
    pub gross_worldwide: Option<String>,
    pub rating: Option<String>,
    pub directors: Option<Vec<String>>,
    pub writers: Option<Vec<String>>,
    pub stars: Option<Vec<String>>,
    pub related_links: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub countries_of_origin: Option<Vec<String>>,
    pub summaries: Option<Vec<String>>,
    pub synopsis: Option<Vec<String>>,
    /// (review text, rating-or-null) pairs
    pub reviews: Option<Vec<(String, Option<String>)>>,
}

impl Record {
    /// Create a record carrying only an identifier
    pub fn with_id(id: impl Into<String>) -> Self {
        Record {
            id: id.into(),
            title: None,
            first_page_summary: None,
            release_year: None,
            mpaa: None,
            budget: None,
            gross_worldwide: None,
            rating: None,
            directors: None,
            writers: None,
            stars: None,
            related_links: None,
            genres: None,
            languages: None,
            countries_of_origin: None,
            summaries: None,
            synopsis: None,
            reviews: None,
        }
    }

    /// Values of an indexed field, empty when the field is missing
    pub fn field_values(&self, field: Field) -> &[String] {
        let values = match field {
            Field::Stars => &self.stars,
            Field::Genres => &self.genres,
            Field::Summaries => &self.summaries,
        };
        values.as_deref().unwrap_or(&[])
    }

    pub fn set_field_values(&mut self, field: Field, values: Vec<String>) {
        match field {
            Field::Stars => self.stars = Some(values),
            Field::Genres => self.genres = Some(values),
            Field::Summaries => self.summaries = Some(values),
        }
    }
}

/// One entry of a ranked result list
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHit {
    pub doc_id: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()).unwrap(), field);
        }
        let err = Field::parse("reviews").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert!(err.context.contains("reviews"));
    }

    #[test]
    fn test_record_field_values() {
        let mut record = Record::with_id("tt0000001");
        assert!(record.field_values(Field::Genres).is_empty());

        record.set_field_values(Field::Genres, vec!["drama".into(), "crime".into()]);
        assert_eq!(record.field_values(Field::Genres).len(), 2);
        assert!(record.field_values(Field::Summaries).is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let json = r#"{
            "id": "tt0000001",
            "title": "A Movie",
            "stars": ["tim", "henry"],
            "reviews": [["great film", "9"], ["meh", null]]
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "tt0000001");
        assert_eq!(record.stars.as_ref().unwrap().len(), 2);
        let reviews = record.reviews.as_ref().unwrap();
        assert_eq!(reviews[0].1.as_deref(), Some("9"));
        assert_eq!(reviews[1].1, None);
        assert!(record.genres.is_none());
    }
}
