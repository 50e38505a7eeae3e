use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{Field, IndexType, Record};
use crate::index::builder::IndexBuilder;
use crate::index::metadata::MetadataIndex;
use crate::index::posting::{FieldLengthMap, PostingMap};
use crate::index::tiered::TieredPostings;

/// Persists and reads each index as one JSON document per file inside a
/// single directory.
///
/// File layout: `<field>_index.json`, `<field>_document_length_index.json`,
/// `<field>_tiered_index.json`, `documents_index.json`,
/// `documents_metadata_index.json`. Writes go to the destination directly;
/// concurrent readers during a rewrite are undefined.
#[derive(Debug, Clone)]
pub struct IndexStore {
    pub data_dir: PathBuf,
}

impl IndexStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(IndexStore { data_dir })
    }

    /// Path of a per-field index file by (field, kind)
    pub fn index_path(&self, field: Field, kind: IndexType) -> PathBuf {
        self.data_dir
            .join(format!("{}{}_index.json", field.as_str(), kind.suffix()))
    }

    pub fn documents_path(&self) -> PathBuf {
        self.data_dir.join("documents_index.json")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join("documents_metadata_index.json")
    }

    pub fn store_postings(&self, field: Field, postings: &PostingMap) -> Result<()> {
        write_json(&self.index_path(field, IndexType::Main), postings)
    }

    pub fn load_postings(&self, field: Field) -> Result<PostingMap> {
        read_json(&self.index_path(field, IndexType::Main))
    }

    pub fn store_field_lengths(&self, field: Field, lengths: &FieldLengthMap) -> Result<()> {
        write_json(&self.index_path(field, IndexType::DocumentLength), lengths)
    }

    pub fn load_field_lengths(&self, field: Field) -> Result<FieldLengthMap> {
        read_json(&self.index_path(field, IndexType::DocumentLength))
    }

    pub fn store_tiered(&self, field: Field, tiered: &TieredPostings) -> Result<()> {
        write_json(&self.index_path(field, IndexType::Tiered), tiered)
    }

    pub fn load_tiered(&self, field: Field) -> Result<TieredPostings> {
        read_json(&self.index_path(field, IndexType::Tiered))
    }

    pub fn store_documents(&self, documents: &HashMap<String, Record>) -> Result<()> {
        write_json(&self.documents_path(), documents)
    }

    pub fn load_documents(&self) -> Result<HashMap<String, Record>> {
        read_json(&self.documents_path())
    }

    pub fn store_metadata(&self, metadata: &MetadataIndex) -> Result<()> {
        write_json(&self.metadata_path(), metadata)
    }

    pub fn load_metadata(&self) -> Result<MetadataIndex> {
        read_json(&self.metadata_path())
    }

    /// Persist every index of a finished build: per-field postings,
    /// document lengths and tiers, the documents index and the metadata
    /// index. Tier thresholds come from the config.
    pub fn store_all(&self, builder: &IndexBuilder, config: &Config) -> Result<()> {
        let (high, medium) = config.tier_thresholds;
        let mut lengths = HashMap::new();
        for field in Field::ALL {
            let postings = builder.posting_map(field);
            self.store_postings(field, postings)?;
            self.store_field_lengths(field, builder.field_lengths(field))?;
            self.store_tiered(field, &TieredPostings::build(postings, high, medium))?;
            lengths.insert(field, builder.field_lengths(field).clone());
        }
        self.store_documents(builder.documents())?;
        self.store_metadata(&MetadataIndex::compute(builder.document_count(), &lengths))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::new(ErrorKind::Io, format!("{}: {}", path.display(), e)))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, value)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| Error::new(ErrorKind::Io, format!("{}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .map_err(|e| Error::new(ErrorKind::Parse, format!("{}: {}", path.display(), e)))?;
    Ok(value)
}
