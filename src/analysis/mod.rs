pub mod lemmatizer;
pub mod normalizer;
