//! Memoized pairwise similarity scores.
//!
//! Similarity between two concepts is symmetric, so entries are keyed by the
//! unordered pair of concept identifiers. [`FileSimilarityCache`] keeps the
//! table in memory and persists it as JSON: load it at process start, flush
//! it at shutdown.
//!
//! # Usage
//!
//! ```
//! use profile_diversity::similarity::{FileSimilarityCache, PairKey, SimilarityCache};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let cache = FileSimilarityCache::load(dir.path().join("scores.json")).unwrap();
//!
//! let score = cache.get_or_insert_with(PairKey::new("dog.n.01", "cat.n.01"), || 0.2);
//! assert_eq!(cache.get(&PairKey::new("cat.n.01", "dog.n.01")), Some(score));
//! cache.flush().unwrap();
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CacheError;

/// Unordered pair of concept identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Creates a key; `PairKey::new(a, b) == PairKey::new(b, a)`.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Key-value store of similarity scores.
pub trait SimilarityCache {
    /// Returns the cached score of a pair, if any.
    fn get(&self, key: &PairKey) -> Option<f64>;

    /// Stores the score of a pair, replacing any previous one. Non-finite
    /// scores are not stored.
    fn insert(&self, key: PairKey, score: f64);

    /// Number of cached pairs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached score, computing and storing it on a miss.
    fn get_or_insert_with<F>(&self, key: PairKey, compute: F) -> f64
    where
        F: FnOnce() -> f64,
        Self: Sized,
    {
        if let Some(score) = self.get(&key) {
            return score;
        }
        let score = compute();
        self.insert(key, score);
        score
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// On-disk representation of one cached pair.
#[derive(Debug, Serialize, Deserialize)]
struct StoredScore {
    a: String,
    b: String,
    score: f64,
}

/// In-memory similarity table backed by a JSON file.
#[derive(Debug)]
pub struct FileSimilarityCache {
    path: PathBuf,
    scores: RwLock<HashMap<PairKey, f64>>,
    stats: RwLock<CacheStats>,
}

impl FileSimilarityCache {
    /// Loads the cache stored at `path`. A missing file yields an empty cache.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed, or holds a
    /// non-finite score.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let mut scores = HashMap::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let stored: Vec<StoredScore> = serde_json::from_str(&content)?;
            for entry in stored {
                if !entry.score.is_finite() {
                    return Err(CacheError::MalformedEntry(format!(
                        "score of ({}, {}) is {}",
                        entry.a, entry.b, entry.score
                    )));
                }
                scores.insert(PairKey::new(entry.a, entry.b), entry.score);
            }
            info!(path = %path.display(), entries = scores.len(), "Loaded similarity cache");
        } else {
            debug!(path = %path.display(), "No similarity cache on disk, starting empty");
        }

        Ok(Self {
            path,
            scores: RwLock::new(scores),
            stats: RwLock::new(CacheStats::default()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every cached pair to the backing file, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn flush(&self) -> Result<(), CacheError> {
        let mut stored: Vec<StoredScore> = {
            let scores = self.scores.read().expect("cache read lock poisoned");
            scores
                .iter()
                .map(|(key, &score)| StoredScore {
                    a: key.first.clone(),
                    b: key.second.clone(),
                    score,
                })
                .collect()
        };
        stored.sort_by(|x, y| (&x.a, &x.b).cmp(&(&y.a, &y.b)));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;

        info!(path = %self.path.display(), entries = stored.len(), "Flushed similarity cache");
        Ok(())
    }

    /// Returns the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        *self.stats.read().expect("stats read lock poisoned")
    }
}

impl SimilarityCache for FileSimilarityCache {
    fn get(&self, key: &PairKey) -> Option<f64> {
        let found = self
            .scores
            .read()
            .expect("cache read lock poisoned")
            .get(key)
            .copied();

        let mut stats = self.stats.write().expect("stats write lock poisoned");
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    fn insert(&self, key: PairKey, score: f64) {
        if !score.is_finite() {
            warn!(a = key.first(), b = key.second(), score, "Refusing non-finite similarity score");
            return;
        }
        self.scores
            .write()
            .expect("cache write lock poisoned")
            .insert(key, score);
    }

    fn len(&self) -> usize {
        self.scores.read().expect("cache read lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_unordered() {
        assert_eq!(PairKey::new("a", "b"), PairKey::new("b", "a"));
        assert_eq!(PairKey::new("b", "a").first(), "a");
        assert_ne!(PairKey::new("a", "b"), PairKey::new("a", "c"));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSimilarityCache::load(dir.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSimilarityCache::load(dir.path().join("scores.json")).unwrap();
        let mut calls = 0;

        let first = cache.get_or_insert_with(PairKey::new("x", "y"), || {
            calls += 1;
            0.75
        });
        let second = cache.get_or_insert_with(PairKey::new("y", "x"), || {
            calls += 1;
            0.0
        });

        assert_eq!(first, 0.75);
        assert_eq!(second, 0.75);
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert!((cache.stats().hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_flush_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.json");

        let cache = FileSimilarityCache::load(&path).unwrap();
        cache.insert(PairKey::new("plane.n.01", "hate.v.01"), 0.1);
        cache.insert(PairKey::new("dog.n.01", "cat.n.01"), 0.2);
        cache.flush().unwrap();

        let reloaded = FileSimilarityCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(&PairKey::new("cat.n.01", "dog.n.01")), Some(0.2));
    }

    #[test]
    fn test_non_finite_scores_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let cache = FileSimilarityCache::load(&path).unwrap();
        cache.insert(PairKey::new("a", "b"), f64::NAN);
        cache.insert(PairKey::new("c", "d"), 0.3);
        cache.insert(PairKey::new("e", "f"), f64::INFINITY);
        assert_eq!(cache.len(), 1);
        cache.flush().unwrap();

        let reloaded = FileSimilarityCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(&PairKey::new("c", "d")), Some(0.3));
        assert_eq!(reloaded.get(&PairKey::new("a", "b")), None);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileSimilarityCache::load(&path),
            Err(CacheError::Json(_))
        ));
    }
}
