// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helper utilities shared by the integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use usercfg::adapters::InMemoryPersistence;
use usercfg::domain::{ConfigSection, Result};
use usercfg::ports::ConfigPersistence;
use usercfg::service::DefaultUserConfigService;

/// In-memory collaborator whose saves take a while and that records whether two
/// saves ever ran at the same time.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SlowPersistence {
    inner: InMemoryPersistence,
    delay: Duration,
    in_save: Arc<AtomicBool>,
    overlaps: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl SlowPersistence {
    /// Creates a collaborator whose saves sleep for `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryPersistence::new(),
            delay,
            in_save: Arc::new(AtomicBool::new(false)),
            overlaps: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the wrapped in-memory collaborator.
    pub fn inner(&self) -> &InMemoryPersistence {
        &self.inner
    }

    /// Returns how many saves started while another was still running.
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }
}

impl ConfigPersistence for SlowPersistence {
    fn name(&self) -> &str {
        "slow-memory"
    }

    fn load(&self) -> Result<ConfigSection> {
        self.inner.load()
    }

    fn save(&self, root: &ConfigSection) -> Result<()> {
        if self.in_save.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        thread::sleep(self.delay);
        let result = self.inner.save(root);
        self.in_save.store(false, Ordering::SeqCst);
        result
    }
}

/// Builds a service over `persistence`.
#[allow(dead_code)]
pub fn service_with(persistence: impl ConfigPersistence + 'static) -> DefaultUserConfigService {
    DefaultUserConfigService::builder()
        .with_persistence(Box::new(persistence))
        .build()
        .unwrap()
}

/// Installs a test-friendly log subscriber; later calls are no-ops.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Writes `content` to `name` inside `dir` and returns the full path.
#[allow(dead_code)]
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
