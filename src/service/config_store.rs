// SPDX-License-Identifier: MIT OR Apache-2.0

//! The shared, persisted configuration store.
//!
//! `ConfigStore` owns the root section and the persistence collaborator behind it.
//! Reads run concurrently; a mutation holds the write lock until its save has
//! completed, so readers never observe a half-applied change and every successful
//! mutation is durable when the call returns.

use crate::domain::{ConfigError, ConfigPath, ConfigSection, ConfigValue, Result};
use crate::ports::ConfigPersistence;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory configuration tree backed by a persistence collaborator.
///
/// # Examples
///
/// ```rust
/// use usercfg::adapters::InMemoryPersistence;
/// use usercfg::domain::{ConfigPath, ConfigValue};
/// use usercfg::service::ConfigStore;
///
/// # fn main() -> usercfg::domain::Result<()> {
/// let store = ConfigStore::load(Box::new(InMemoryPersistence::new()))?;
/// let path = ConfigPath::parse("defaults.template")?;
///
/// store.set_value(&path, ConfigValue::from("starter"))?;
/// assert_eq!(store.resolve(&path), Some(ConfigValue::from("starter")));
///
/// assert!(store.remove_value(&path)?);
/// assert_eq!(store.resolve(&path), None);
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore {
    root: RwLock<ConfigSection>,
    persistence: Box<dyn ConfigPersistence>,
}

impl ConfigStore {
    /// Creates a store by loading the root section from `persistence`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the collaborator's `load`.
    pub fn load(persistence: Box<dyn ConfigPersistence>) -> Result<Self> {
        let root = persistence.load()?;
        tracing::debug!(
            "Loaded {} top-level configuration entries from '{}'",
            root.len(),
            persistence.name()
        );

        Ok(Self {
            root: RwLock::new(root),
            persistence,
        })
    }

    /// Returns the name of the persistence collaborator.
    pub fn persistence_name(&self) -> &str {
        self.persistence.name()
    }

    /// Resolves `path` to a copy of the value stored there.
    ///
    /// The root path resolves to the whole root section. Returns `None` when any
    /// segment is missing or an intermediate segment holds a non-section.
    pub fn resolve(&self, path: &ConfigPath) -> Option<ConfigValue> {
        let root = self.read();
        if path.is_root() {
            return Some(ConfigValue::Section(root.clone()));
        }

        let value = root.get_path(path).cloned();
        if value.is_none() {
            tracing::debug!("Configuration path '{}' not found", path);
        }
        value
    }

    /// Assigns `value` at `path` and saves the tree.
    ///
    /// Missing intermediate sections are created. The previous value at `path`,
    /// and any scalar on an intermediate segment, is overwritten.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidOperation` - `value` holds a non-finite number, or a
    ///   non-section was assigned to the root; nothing is changed
    /// * `ConfigError::PersistenceFailure` - the tree was updated in memory but
    ///   the save failed
    pub fn set_value(&self, path: &ConfigPath, value: ConfigValue) -> Result<()> {
        if value.contains_non_finite() {
            return Err(ConfigError::invalid_operation(
                path.as_str(),
                "numbers must be finite",
            ));
        }

        let mut root = self.write();
        root.set_path(path, value)?;
        tracing::info!("Set configuration value at '{}'", path);

        self.save_locked(&root, path)
    }

    /// Removes the value at `path`, saving the tree if something was removed.
    ///
    /// Returns `true` if a value was removed. A missing path is a no-op that
    /// returns `false` without touching the collaborator. Removing the root
    /// clears the whole tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PersistenceFailure` if the removal could not be saved.
    pub fn remove_value(&self, path: &ConfigPath) -> Result<bool> {
        let mut root = self.write();
        if !root.remove_path(path) {
            tracing::debug!("Nothing to remove at '{}'", path);
            return Ok(false);
        }
        tracing::info!("Removed configuration value at '{}'", path);

        self.save_locked(&root, path)?;
        Ok(true)
    }

    /// Replaces the in-memory tree with a fresh load from the collaborator.
    ///
    /// Returns `false` when the collaborator had nothing usable yet (see
    /// [`ConfigPersistence::reload`]). On error or `false` the current tree is
    /// left unchanged.
    pub fn reload(&self) -> Result<bool> {
        let mut root = self.write();
        let Some(fresh) = self.persistence.reload()? else {
            tracing::debug!(
                "Skipped reload from '{}'; keeping the current tree",
                self.persistence.name()
            );
            return Ok(false);
        };
        *root = fresh;
        tracing::debug!(
            "Reloaded configuration from '{}'",
            self.persistence.name()
        );
        Ok(true)
    }

    /// Saves the current tree unconditionally.
    ///
    /// Used at shutdown so that the medium reflects the final state.
    pub fn flush(&self) -> Result<()> {
        let root = self.write();
        self.save_locked(&root, &ConfigPath::root())
    }

    /// Returns a copy of the whole root section.
    pub fn snapshot(&self) -> ConfigSection {
        self.read().clone()
    }

    // Called with the write lock held, so saves never interleave.
    fn save_locked(&self, root: &ConfigSection, path: &ConfigPath) -> Result<()> {
        self.persistence.save(root).map_err(|e| {
            tracing::warn!(
                "Failed to save configuration to '{}' after updating '{}': {}",
                self.persistence.name(),
                path,
                e
            );
            ConfigError::persistence(path.as_str(), e)
        })
    }

    // Every mutation completes its in-memory change before any fallible step, so
    // a poisoned lock still guards a consistent tree.
    fn read(&self) -> RwLockReadGuard<'_, ConfigSection> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigSection> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("persistence", &self.persistence.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPersistence;

    fn path(raw: &str) -> ConfigPath {
        ConfigPath::parse(raw).unwrap()
    }

    fn store_with(persistence: &InMemoryPersistence) -> ConfigStore {
        ConfigStore::load(Box::new(persistence.clone())).unwrap()
    }

    #[test]
    fn test_load_uses_initial_root() {
        let mut initial = ConfigSection::new();
        initial.insert("a", 1);
        let persistence = InMemoryPersistence::with_root(initial);
        let store = store_with(&persistence);

        assert_eq!(store.resolve(&path("a")), Some(ConfigValue::from(1)));
        assert_eq!(store.persistence_name(), "memory");
    }

    #[test]
    fn test_resolve_root() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        store.set_value(&path("x"), ConfigValue::from(true)).unwrap();

        let root = store.resolve(&ConfigPath::root()).unwrap();
        let section = root.as_section().unwrap();
        assert_eq!(section.get("x"), Some(&ConfigValue::from(true)));
    }

    #[test]
    fn test_set_value_persists() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);

        store
            .set_value(&path("defaults.template"), ConfigValue::from("starter"))
            .unwrap();

        assert_eq!(persistence.save_count(), 1);
        let saved = persistence.saved().unwrap();
        assert_eq!(
            saved.get_path(&path("defaults.template")),
            Some(&ConfigValue::from("starter"))
        );
    }

    #[test]
    fn test_set_value_rejects_non_finite() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);

        let err = store
            .set_value(&path("a"), ConfigValue::from(f64::NAN))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOperation { .. }));
        assert_eq!(store.resolve(&path("a")), None);
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_set_value_root_requires_section() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);

        let err = store
            .set_value(&ConfigPath::root(), ConfigValue::from("flat"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOperation { .. }));
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_set_value_save_failure_keeps_memory_change() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        persistence.set_fail_saves(true);

        let err = store
            .set_value(&path("a.b"), ConfigValue::from(1))
            .unwrap_err();
        assert!(err.is_persistence_failure());
        assert_eq!(store.resolve(&path("a.b")), Some(ConfigValue::from(1)));
        assert!(persistence.saved().is_none());
    }

    #[test]
    fn test_remove_value() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        store.set_value(&path("a.b"), ConfigValue::from(1)).unwrap();

        assert!(store.remove_value(&path("a.b")).unwrap());
        assert_eq!(persistence.save_count(), 2);
        assert_eq!(store.resolve(&path("a.b")), None);
    }

    #[test]
    fn test_remove_value_missing_does_not_save() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        persistence.set_fail_saves(true);

        assert!(!store.remove_value(&path("missing.key")).unwrap());
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_remove_value_save_failure() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        store.set_value(&path("a"), ConfigValue::from(1)).unwrap();
        persistence.set_fail_saves(true);

        let err = store.remove_value(&path("a")).unwrap_err();
        assert!(err.is_persistence_failure());
    }

    #[test]
    fn test_reload_replaces_tree() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        store.set_value(&path("a"), ConfigValue::from(1)).unwrap();

        let mut external = ConfigSection::new();
        external.insert("b", 2);
        persistence.replace_root(external);

        assert!(store.reload().unwrap());
        assert_eq!(store.resolve(&path("a")), None);
        assert_eq!(store.resolve(&path("b")), Some(ConfigValue::from(2)));
    }

    // Always reports that the medium is mid-write.
    struct MidWritePersistence;

    impl ConfigPersistence for MidWritePersistence {
        fn name(&self) -> &str {
            "mid-write"
        }

        fn load(&self) -> Result<ConfigSection> {
            let mut root = ConfigSection::new();
            root.insert("kept", true);
            Ok(root)
        }

        fn reload(&self) -> Result<Option<ConfigSection>> {
            Ok(None)
        }

        fn save(&self, _root: &ConfigSection) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_reload_skipped_keeps_tree() {
        let store = ConfigStore::load(Box::new(MidWritePersistence)).unwrap();

        assert!(!store.reload().unwrap());
        assert_eq!(store.resolve(&path("kept")), Some(ConfigValue::from(true)));
    }

    #[test]
    fn test_flush_saves_current_tree() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);

        store.flush().unwrap();
        assert_eq!(persistence.save_count(), 1);
        assert!(persistence.saved().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let persistence = InMemoryPersistence::new();
        let store = store_with(&persistence);
        store.set_value(&path("a"), ConfigValue::from(1)).unwrap();

        let snapshot = store.snapshot();
        store.set_value(&path("a"), ConfigValue::from(2)).unwrap();
        assert_eq!(snapshot.get("a"), Some(&ConfigValue::from(1)));
    }
}
