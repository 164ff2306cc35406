//! Rendered-page cache keyed by public path

#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::errors::{ExError, ExErrorKind};
use crate::render::RenderOutput;

/// Cache of public renderings
///
/// Reads and fills are best-effort. Invalidation reports failure so the
/// caller can surface it; a failed invalidation leaves the old entry to
/// expire naturally.
///
/// Each path carries a generation that every invalidation advances. A
/// reader takes the generation before loading the document and fills with
/// [`RenderCache::put_if_current`], so output rendered from a document
/// read before a concurrent commit never replaces that commit's
/// invalidation.
pub trait RenderCache: Send + Sync {
    fn get(&self, path: &str) -> Option<RenderOutput>;

    /// Store unconditionally
    fn put(&self, path: &str, output: &RenderOutput);

    /// Current generation of `path`
    fn generation(&self, path: &str) -> u64;

    /// Store only if `path` is still at `generation`; returns whether the
    /// entry was stored
    fn put_if_current(&self, path: &str, output: &RenderOutput, generation: u64) -> bool;

    /// Drop any cached rendering for `path`
    ///
    /// # Errors
    ///
    /// Returns `CacheInvalidationFailure` if the entry could not be dropped.
    fn invalidate(&self, path: &str) -> Result<(), ExError>;
}

/// Caches nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderCache;

impl RenderCache for NoopRenderCache {
    fn get(&self, _path: &str) -> Option<RenderOutput> {
        None
    }

    fn put(&self, _path: &str, _output: &RenderOutput) {}

    fn generation(&self, _path: &str) -> u64 {
        0
    }

    fn put_if_current(&self, _path: &str, _output: &RenderOutput, _generation: u64) -> bool {
        false
    }

    fn invalidate(&self, _path: &str) -> Result<(), ExError> {
        Ok(())
    }
}

struct Entry {
    output: RenderOutput,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Entry>,
    generations: HashMap<String, u64>,
}

impl CacheState {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or(0)
    }
}

/// In-process cache with a fixed time-to-live per entry
pub struct MemoryRenderCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl MemoryRenderCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn with_ttl_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        Self::new(Duration::seconds(secs))
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.state
            .lock()
            .map(|state| state.entries.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, output: &RenderOutput) -> Entry {
        Entry {
            output: output.clone(),
            expires_at: Utc::now() + self.ttl,
        }
    }
}

impl RenderCache for MemoryRenderCache {
    fn get(&self, path: &str) -> Option<RenderOutput> {
        let mut state = self.state.lock().ok()?;
        let live = state.entries.get(path)?.expires_at > Utc::now();
        if live {
            state.entries.get(path).map(|e| e.output.clone())
        } else {
            state.entries.remove(path);
            None
        }
    }

    fn put(&self, path: &str, output: &RenderOutput) {
        let entry = self.entry(output);
        if let Ok(mut state) = self.state.lock() {
            state.entries.insert(path.to_string(), entry);
        }
    }

    fn generation(&self, path: &str) -> u64 {
        self.state.lock().map(|state| state.generation(path)).unwrap_or(0)
    }

    fn put_if_current(&self, path: &str, output: &RenderOutput, generation: u64) -> bool {
        let entry = self.entry(output);
        match self.state.lock() {
            Ok(mut state) if state.generation(path) == generation => {
                state.entries.insert(path.to_string(), entry);
                true
            }
            _ => false,
        }
    }

    fn invalidate(&self, path: &str) -> Result<(), ExError> {
        let mut state = self.state.lock().map_err(|_| {
            ExError::new(ExErrorKind::CacheInvalidationFailure)
                .with_op("invalidate")
                .with_entity_id(path)
                .with_message("render cache lock poisoned")
        })?;
        state.entries.remove(path);
        *state.generations.entry(path.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
