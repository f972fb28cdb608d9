//! Text-similarity support.
//!
//! Scoring free text against attributes is delegated to external lexical
//! resources; this crate only provides the memoization table those scores
//! are kept in.

pub mod cache;

pub use cache::{CacheStats, FileSimilarityCache, PairKey, SimilarityCache};
