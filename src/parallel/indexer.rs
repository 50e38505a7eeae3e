use rayon::prelude::*;

use crate::analysis::normalizer::Normalizer;
use crate::core::types::Record;
use crate::index::builder::IndexBuilder;

/// Parallel index construction over independent records.
///
/// Records are partitioned across worker threads; per-chunk builders are
/// merged by summing tf counts per (field, term, docID), so a parallel
/// build over unique records equals the sequential build.
pub struct ParallelIndexer {
    pub workers: usize,
    pub chunk_size: usize,
}

impl ParallelIndexer {
    pub fn new() -> Self {
        ParallelIndexer::with_workers(num_cpus::get())
    }

    pub fn with_workers(workers: usize) -> Self {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
            .ok();

        ParallelIndexer {
            workers,
            chunk_size: 256,
        }
    }

    /// Index already-normalized records
    pub fn build(&self, records: &[Record]) -> IndexBuilder {
        records
            .par_chunks(self.chunk_size.max(1))
            .map(|chunk| IndexBuilder::from_records(chunk.iter().cloned()))
            .reduce(IndexBuilder::new, |a, b| a.merge(b))
    }

    /// Normalize raw records on the worker threads, then index them
    pub fn normalize_and_build(
        &self,
        records: &[Record],
        normalizer: &Normalizer,
    ) -> IndexBuilder {
        records
            .par_chunks(self.chunk_size.max(1))
            .map(|chunk| {
                IndexBuilder::from_records(
                    chunk.iter().map(|record| normalizer.normalize_record(record)),
                )
            })
            .reduce(IndexBuilder::new, |a, b| a.merge(b))
    }
}

impl Default for ParallelIndexer {
    fn default() -> Self {
        ParallelIndexer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Field;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let mut record = Record::with_id(format!("tt{:04}", i));
                record.genres = Some(vec!["drama".into()]);
                record.summaries = Some(vec![format!("good fight number {}", i)]);
                record
            })
            .collect()
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let records = records(100);
        let sequential = IndexBuilder::from_records(records.iter().cloned());

        let indexer = ParallelIndexer {
            workers: 4,
            chunk_size: 7,
        };
        let parallel = indexer.build(&records);

        assert_eq!(parallel.document_count(), sequential.document_count());
        for field in Field::ALL {
            assert_eq!(
                parallel.posting_map(field),
                sequential.posting_map(field)
            );
            assert_eq!(
                parallel.field_lengths(field),
                sequential.field_lengths(field)
            );
        }
    }

    #[test]
    fn test_normalize_and_build() {
        let mut record = Record::with_id("tt1");
        record.summaries = Some(vec!["The hero FIGHTS!".into()]);
        let normalizer = Normalizer::with_default_stop_words().unwrap();

        let indexer = ParallelIndexer {
            workers: 2,
            chunk_size: 1,
        };
        let builder = indexer.normalize_and_build(&[record], &normalizer);

        assert!(builder.posting_map(Field::Summaries).contains_key("fight"));
    }
}
