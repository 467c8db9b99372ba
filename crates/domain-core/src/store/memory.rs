//! In-memory store

use super::{Change, Store, StoreState};
use crate::{Error, Result};

/// Store that keeps everything in memory
///
/// Counts successful flushes, and can be told to fail them, which makes it
/// the store of choice in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: StoreState,
    pending: Vec<Change>,
    flushes: usize,
    fail_flush: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with committed state.
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Make every following flush fail.
    pub fn fail_flushes(&mut self, fail: bool) {
        self.fail_flush = fail;
    }

    /// Number of successful flushes so far.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Store for MemoryStore {
    fn state(&self) -> &StoreState {
        &self.state
    }

    fn stage(&mut self, change: Change) {
        self.pending.push(change);
    }

    fn pending(&self) -> &[Change] {
        &self.pending
    }

    fn flush(&mut self) -> Result<()> {
        if self.fail_flush {
            let discarded = self.pending.len();
            self.pending.clear();
            tracing::debug!(discarded, "Memory store flush failed");
            return Err(Error::persistence("store is not writable"));
        }

        for change in self.pending.drain(..) {
            self.state.apply(change);
        }
        self.flushes += 1;
        Ok(())
    }
}
