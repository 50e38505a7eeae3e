pub mod core;
pub mod analysis;
pub mod index;
pub mod scoring;
pub mod search;
pub mod parallel;
pub mod dedup;
pub mod eval;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                        CINEDEX STRUCT ARCHITECTURE                        │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── CORE LAYER ────────────────────────────────┐
│  struct Config           // data_dir, num_hashes, shingle_k, bm25 knobs, │
│                          // tier_thresholds, stop_words                  │
│  struct Record           // full scraper field shape; only stars,        │
│                          // genres, summaries are indexed                │
│  enum Field              // Stars | Genres | Summaries                   │
│  enum IndexType          // Main | DocumentLength | Tiered               │
│  struct Error            // kind + context, crate-wide Result alias      │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── ANALYSIS LAYER ──────────────────────────────┐
│  struct Normalizer       // strip HTML/URLs → fold punctuation →         │
│                          // lowercase → tokenize → stem → lemmatize →    │
│                          // drop stop words; stars is lowercase-only     │
│  fn lemmatize            // morphy-style noun detachment rules           │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── INDEXING LAYER ──────────────────────────────┐
│  struct PostingList      // sorted runs of (docID, tf); JSON form stays  │
│                          // the nested {docID: tf} object                │
│  struct IndexBuilder     // per-field PostingMap + FieldLengthMap +      │
│                          // documents index; idempotent add, silent      │
│                          // remove, add-then-remove self-check           │
│  struct TieredPostings   // tf-threshold partition into three tiers      │
│  struct MetadataIndex    // document_count + per-field average length    │
│  struct IndexStore       // one JSON snapshot per (field, kind)          │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────── SCORING / SEARCH LAYER ──────────────────────────┐
│  struct Scorer<'a>       // borrows one PostingMap; IDF cache behind a   │
│                          // RwLock; SMART vector space + Okapi BM25      │
│  struct SmartSpec        // parsed "ddd.qqq" weighting pair              │
│  struct SearchEngine     // per-field fan-out, safe or tiered pathway,   │
│                          // weighted-sum aggregation, top-K              │
│  struct SpellCorrector   // shingle Jaccard over the vocabulary,         │
│                          // tf-reranked top 5                            │
│  struct SnippetBuilder   // greedy windows around query hits, ***marks***│
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── OFFLINE TOOLS ───────────────────────────────┐
│  struct ParallelIndexer  // rayon fan-out, merge by summing tf           │
│  struct MinHashLsh       // characteristic matrix → signatures →         │
│                          // banded buckets → Jaccard verification        │
│  mod eval::metrics       // P/R/F1, AP/MAP, DCG/NDCG, RR/MRR            │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── RELATIONSHIPS ───────────────────────────────┐
│  Record ──Normalizer──> NormalizedRecord ──IndexBuilder──> indexes       │
│  indexes ──IndexStore──> JSON snapshots ──SearchEngine::from_store       │
│  SearchEngine ──per field──> Scorer ──aggregate──> Vec<RankedHit>        │
│  summaries corpus ──MinHashLsh──> candidate near-duplicate buckets       │
└──────────────────────────────────────────────────────────────────────────┘
*/
