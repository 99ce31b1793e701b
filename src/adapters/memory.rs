// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence adapter.
//!
//! This module provides a persistence collaborator that keeps the configuration
//! tree in memory. It is useful for embedding and for tests: clones share state,
//! so a test can keep one handle to inspect saves made through the store.

use crate::domain::{ConfigError, ConfigSection, Result};
use crate::ports::ConfigPersistence;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Shared {
    stored: Mutex<ConfigSection>,
    last_saved: Mutex<Option<ConfigSection>>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

/// Persistence collaborator backed by memory.
///
/// # Examples
///
/// ```rust
/// use usercfg::adapters::InMemoryPersistence;
/// use usercfg::ports::ConfigPersistence;
/// use usercfg::domain::ConfigSection;
///
/// let persistence = InMemoryPersistence::new();
/// let observer = persistence.clone();
///
/// persistence.save(&ConfigSection::new()).unwrap();
/// assert_eq!(observer.save_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    shared: Arc<Shared>,
}

impl InMemoryPersistence {
    /// Creates a collaborator holding an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collaborator whose first load returns `root`.
    pub fn with_root(root: ConfigSection) -> Self {
        let persistence = Self::new();
        persistence.replace_root(root);
        persistence
    }

    /// Replaces what the next `load` returns, as if another process had
    /// rewritten the medium.
    pub fn replace_root(&self, root: ConfigSection) {
        *lock(&self.shared.stored) = root;
    }

    /// Returns the most recently saved root, if any save has succeeded.
    pub fn saved(&self) -> Option<ConfigSection> {
        lock(&self.shared.last_saved).clone()
    }

    /// Returns the number of successful saves.
    pub fn save_count(&self) -> usize {
        self.shared.save_count.load(Ordering::SeqCst)
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.shared.fail_saves.store(fail, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConfigPersistence for InMemoryPersistence {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<ConfigSection> {
        Ok(lock(&self.shared.stored).clone())
    }

    fn save(&self, root: &ConfigSection) -> Result<()> {
        if self.shared.fail_saves.load(Ordering::SeqCst) {
            return Err(ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "in-memory save rejected",
            )));
        }

        *lock(&self.shared.stored) = root.clone();
        *lock(&self.shared.last_saved) = Some(root.clone());
        self.shared.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
