//! Response cache for raw model output, keyed by a hash of the exact prompt text.
//!
//! Unbounded and owned by the `LlmClient` that created it. Staleness is checked lazily on
//! read; a stale entry stays until the next successful call for the same prompt replaces it.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// 32-bit rolling string hash (`h = h * 31 + unit` over UTF-16 code units, wrapping).
/// Deterministic and cheap; not collision resistant.
pub fn prompt_hash(prompt: &str) -> i32 {
    prompt
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

struct CachedResponse {
    prompt: String,
    text: String,
    stored_at: Instant,
}

pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<i32, CachedResponse>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached text if an entry for this exact prompt is younger than the TTL.
    pub fn get(&self, prompt: &str) -> Option<String> {
        let entries = self.lock();
        let entry = entries.get(&prompt_hash(prompt))?;
        // A hash hit for a different prompt is a miss.
        if entry.prompt != prompt || entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.text.clone())
    }

    pub fn insert(&self, prompt: &str, text: &str) {
        self.lock().insert(
            prompt_hash(prompt),
            CachedResponse {
                prompt: prompt.to_string(),
                text: text.to_string(),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i32, CachedResponse>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
