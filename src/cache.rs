//! Opt-in response caching.
//!
//! The client itself is stateless; a host that wants to short-circuit
//! repeated utterances composes this cache around it and stays in charge of
//! when entries are consulted or invalidated.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use log::debug;

const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);
const DEFAULT_MAX_ENTRIES: usize = 200;

/// TTL + LRU cache for completion responses, keyed by the rendered prompt and
/// a normalized user utterance.
pub struct ResponseCache {
    entries: HashMap<u64, CacheEntry>,
    // Front is least recently used.
    order: VecDeque<u64>,
    max_age: Duration,
    max_entries: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

struct CacheEntry {
    response: String,
    stored_at: Instant,
}

/// Counters exposed for host diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl ResponseCache {
    pub fn new(max_age: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_age,
            max_entries,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a cached response. Expired entries are evicted on access; a
    /// hit refreshes the entry's recency.
    pub fn get(&mut self, prompt: &str, input: &str) -> Option<String> {
        let key = cache_key(prompt, input);

        let Some(entry) = self.entries.get(&key) else {
            self.misses += 1;
            return None;
        };

        if entry.stored_at.elapsed() > self.max_age {
            self.entries.remove(&key);
            self.order.retain(|k| *k != key);
            self.misses += 1;
            self.evictions += 1;
            return None;
        }

        self.hits += 1;
        self.touch(key);
        debug!("cache hit for utterance: {input:.30}");
        Some(self.entries[&key].response.clone())
    }

    /// Store a response, evicting the least recently used entries once the
    /// capacity is exceeded.
    pub fn insert(&mut self, prompt: &str, input: &str, response: impl Into<String>) {
        let key = cache_key(prompt, input);

        if self.entries.insert(
            key,
            CacheEntry {
                response: response.into(),
                stored_at: Instant::now(),
            },
        ).is_some()
        {
            self.order.retain(|k| *k != key);
        }
        self.order.push_back(key);

        while self.entries.len() > self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        }
    }

    /// Drop every entry past its max age. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let max_age = self.max_age;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.stored_at.elapsed() <= max_age);
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key));
        let removed = before - self.entries.len();
        self.evictions += removed as u64;
        removed
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            entries: self.entries.len(),
            max_entries: self.max_entries,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hits as f64 / lookups as f64
            },
        }
    }

    fn touch(&mut self, key: u64) {
        self.order.retain(|k| *k != key);
        self.order.push_back(key);
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES)
    }
}

/// Key over the rendered prompt and the normalized utterance, so casing and
/// surrounding whitespace do not fragment the cache.
fn cache_key(prompt: &str, input: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    input.trim().to_lowercase().hash(&mut hasher);
    hasher.finish()
}
