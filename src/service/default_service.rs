// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default user configuration service implementation.
//!
//! This module provides the default implementation of the `UserConfigService`
//! trait on top of a shared [`ConfigStore`], plus a builder that chooses the
//! persistence collaborator.

use crate::domain::{
    ConfigError, ConfigPath, ConfigValue, GetResponse, GetSectionResponse, GetStringResponse,
    Result, UserConfigService,
};
use crate::ports::{ConfigPersistence, ConfigWatcher};
use crate::service::ConfigStore;
use std::path::Path;
use std::sync::Arc;

/// Default implementation of the user configuration service.
///
/// The service validates paths, projects resolved values into the response
/// shapes and delegates storage to an injected [`ConfigStore`]. Several services
/// (or transports) may share one store.
///
/// # Examples
///
/// ```rust
/// use usercfg::prelude::*;
/// use usercfg::service::DefaultUserConfigService;
///
/// # fn main() -> Result<()> {
/// let service = DefaultUserConfigService::builder().in_memory().build()?;
///
/// service.set("defaults.template", ConfigValue::from("starter"))?;
/// let section = service.get_section("defaults")?;
/// assert_eq!(section.section.get("template"), Some(&ConfigValue::from("starter")));
/// # Ok(())
/// # }
/// ```
pub struct DefaultUserConfigService {
    /// The shared configuration tree
    store: Arc<ConfigStore>,
    /// List of registered watchers
    watchers: Vec<Box<dyn ConfigWatcher>>,
}

impl DefaultUserConfigService {
    /// Creates a service over an existing store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            watchers: Vec::new(),
        }
    }

    /// Creates a new service builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use usercfg::service::DefaultUserConfigService;
    ///
    /// # fn main() -> usercfg::domain::Result<()> {
    /// let service = DefaultUserConfigService::builder()
    ///     .in_memory()
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> UserConfigServiceBuilder {
        UserConfigServiceBuilder::new()
    }

    /// Creates a service persisting to the default OS-appropriate location.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use usercfg::service::DefaultUserConfigService;
    ///
    /// # fn main() -> usercfg::domain::Result<()> {
    /// let service = DefaultUserConfigService::with_defaults("myapp", "com.example")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::builder()
            .with_default_location(app_name, qualifier)?
            .build()
    }

    /// Returns the shared store.
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Starts `watcher` and reloads the store whenever it reports a change.
    ///
    /// Reload failures are logged and leave the current tree in place, as does a
    /// blank read of an existing file.
    ///
    /// # Errors
    ///
    /// Propagates any error from starting the watcher.
    pub fn register_watcher(&mut self, mut watcher: Box<dyn ConfigWatcher>) -> Result<()> {
        let store = Arc::clone(&self.store);
        watcher.watch(Arc::new(move |path: &Path| {
            tracing::debug!("Reloading configuration after change to {}", path.display());
            match store.reload() {
                Ok(true) => {}
                Ok(false) => tracing::debug!(
                    "'{}' was not ready; waiting for the next change",
                    store.persistence_name()
                ),
                Err(e) => tracing::warn!(
                    "Failed to reload configuration from '{}': {}",
                    store.persistence_name(),
                    e
                ),
            }
        }))?;

        self.watchers.push(watcher);
        Ok(())
    }

    /// Watches `path` for external changes and reloads the store when it changes.
    ///
    /// `path` should be the file the store persists to.
    #[cfg(feature = "reload")]
    pub fn watch_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        use crate::adapters::FileWatcher;
        let watcher = FileWatcher::new(path, None)?;
        self.register_watcher(Box::new(watcher))
    }

    /// Stops all watchers and saves the current tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PersistenceFailure` if the final save fails. Watcher
    /// failures are logged.
    pub fn shutdown(&mut self) -> Result<()> {
        for mut watcher in self.watchers.drain(..) {
            if let Err(e) = watcher.stop() {
                tracing::warn!("Failed to stop configuration watcher: {}", e);
            }
        }

        self.store.flush()
    }
}

impl std::fmt::Debug for DefaultUserConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultUserConfigService")
            .field("store", &self.store)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

impl UserConfigService for DefaultUserConfigService {
    fn get(&self, path: &str) -> Result<GetResponse> {
        let path = ConfigPath::parse(path)?;
        Ok(match self.store.resolve(&path) {
            Some(value) => GetResponse::found(value),
            None => GetResponse::not_found(),
        })
    }

    fn get_string(&self, path: &str) -> Result<GetStringResponse> {
        let path = ConfigPath::parse(path)?;
        let Some(value) = self.store.resolve(&path) else {
            return Ok(GetStringResponse::not_found());
        };

        value
            .project_string()
            .map(GetStringResponse::found)
            .ok_or_else(|| {
                ConfigError::invalid_operation(
                    path.as_str(),
                    "a section cannot be rendered as a string",
                )
            })
    }

    fn get_section(&self, path: &str) -> Result<GetSectionResponse> {
        let path = ConfigPath::parse(path)?;
        match self.store.resolve(&path) {
            None => Ok(GetSectionResponse::not_found()),
            Some(ConfigValue::Section(section)) => Ok(GetSectionResponse::found(section)),
            Some(other) => Err(ConfigError::invalid_operation(
                path.as_str(),
                format!("expected a section, found a {}", other.kind()),
            )),
        }
    }

    fn set(&self, path: &str, value: ConfigValue) -> Result<()> {
        let path = ConfigPath::parse(path)?;
        self.store.set_value(&path, value)
    }

    fn unset(&self, path: &str) -> Result<()> {
        let path = ConfigPath::parse(path)?;
        self.store.remove_value(&path).map(|_| ())
    }
}

/// Builder for constructing a `DefaultUserConfigService`.
///
/// The builder selects the persistence collaborator; `build` loads the store
/// from it. Without a collaborator the service keeps its tree in memory.
///
/// # Examples
///
/// ```rust,no_run
/// use usercfg::service::UserConfigServiceBuilder;
///
/// # fn main() -> usercfg::domain::Result<()> {
/// let service = UserConfigServiceBuilder::new()
///     .with_file("/home/me/.config/myapp/config.json")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct UserConfigServiceBuilder {
    persistence: Option<Box<dyn ConfigPersistence>>,
}

impl UserConfigServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { persistence: None }
    }

    /// Uses `persistence` as the collaborator, replacing any earlier choice.
    pub fn with_persistence(mut self, persistence: Box<dyn ConfigPersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Keeps the tree in memory only.
    pub fn in_memory(self) -> Self {
        use crate::adapters::InMemoryPersistence;
        self.with_persistence(Box::new(InMemoryPersistence::new()))
    }

    /// Persists to the file at `path`, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceError` if no enabled parser handles the
    /// extension.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        use crate::adapters::FilePersistence;
        let persistence = FilePersistence::from_file(path)?;
        Ok(self.with_persistence(Box::new(persistence)))
    }

    /// Persists to `config.json` in the default OS configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceError` if the directory cannot be determined.
    pub fn with_default_location(self, app_name: &str, qualifier: &str) -> Result<Self> {
        use crate::adapters::FilePersistence;
        let persistence = FilePersistence::from_default_location(app_name, qualifier)?;
        Ok(self.with_persistence(Box::new(persistence)))
    }

    /// Loads the store and builds the service.
    ///
    /// # Errors
    ///
    /// Propagates any error from loading the collaborator.
    pub fn build(self) -> Result<DefaultUserConfigService> {
        let persistence = match self.persistence {
            Some(persistence) => persistence,
            None => Box::new(crate::adapters::InMemoryPersistence::new()),
        };

        let store = ConfigStore::load(persistence)?;
        Ok(DefaultUserConfigService::new(Arc::new(store)))
    }
}

impl Default for UserConfigServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPersistence;
    use crate::domain::ConfigSection;
    use crate::ports::ChangeCallback;
    use std::sync::Mutex;

    fn service_with(persistence: &InMemoryPersistence) -> DefaultUserConfigService {
        DefaultUserConfigService::builder()
            .with_persistence(Box::new(persistence.clone()))
            .build()
            .unwrap()
    }

    // Watcher whose callback the test fires by hand.
    #[derive(Clone, Default)]
    struct ManualWatcher {
        callback: Arc<Mutex<Option<ChangeCallback>>>,
        stopped: Arc<Mutex<bool>>,
    }

    impl ManualWatcher {
        fn fire(&self) {
            let callback = self.callback.lock().unwrap().clone();
            if let Some(callback) = callback {
                callback(Path::new("config.json"));
            }
        }
    }

    impl ConfigWatcher for ManualWatcher {
        fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
            *self.callback.lock().unwrap() = Some(callback);
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            *self.stopped.lock().unwrap() = true;
            Ok(())
        }
    }

    #[test]
    fn test_get_missing_path() {
        let service = service_with(&InMemoryPersistence::new());
        let response = service.get("no.such.path").unwrap();
        assert!(!response.found);
        assert_eq!(response.value, ConfigValue::Null);
    }

    #[test]
    fn test_get_root_is_section() {
        let service = service_with(&InMemoryPersistence::new());
        let response = service.get("").unwrap();
        assert!(response.found);
        assert_eq!(response.value, ConfigValue::empty_section());
    }

    #[test]
    fn test_set_then_get() {
        let service = service_with(&InMemoryPersistence::new());
        service.set("window.width", ConfigValue::from(1280)).unwrap();

        let response = service.get("window.width").unwrap();
        assert!(response.found);
        assert_eq!(response.value, ConfigValue::from(1280));
    }

    #[test]
    fn test_get_string_projections() {
        let service = service_with(&InMemoryPersistence::new());
        service.set("flag", ConfigValue::from(true)).unwrap();
        service.set("count", ConfigValue::from(3)).unwrap();
        service.set("ratio", ConfigValue::from(0.5)).unwrap();
        service.set("name", ConfigValue::from("demo")).unwrap();
        service.set("nothing", ConfigValue::Null).unwrap();

        assert_eq!(service.get_string("flag").unwrap().value, "true");
        assert_eq!(service.get_string("count").unwrap().value, "3");
        assert_eq!(service.get_string("ratio").unwrap().value, "0.5");
        assert_eq!(service.get_string("name").unwrap().value, "demo");

        let nothing = service.get_string("nothing").unwrap();
        assert!(nothing.found);
        assert_eq!(nothing.value, "");
    }

    #[test]
    fn test_get_string_missing_and_section() {
        let service = service_with(&InMemoryPersistence::new());
        assert!(!service.get_string("missing").unwrap().found);

        service.set("a.b", ConfigValue::from(1)).unwrap();
        assert!(matches!(
            service.get_string("a").unwrap_err(),
            ConfigError::InvalidOperation { .. }
        ));
    }

    #[test]
    fn test_get_section() {
        let service = service_with(&InMemoryPersistence::new());
        service.set("a.b.c", ConfigValue::from("v")).unwrap();

        let response = service.get_section("a").unwrap();
        assert!(response.found);
        let b = response.section.get("b").unwrap().as_section().unwrap();
        assert_eq!(b.get("c"), Some(&ConfigValue::from("v")));

        assert!(!service.get_section("x").unwrap().found);
        assert!(matches!(
            service.get_section("a.b.c").unwrap_err(),
            ConfigError::InvalidOperation { .. }
        ));
    }

    #[test]
    fn test_unset_missing_is_ok_and_skips_save() {
        let persistence = InMemoryPersistence::new();
        let service = service_with(&persistence);

        service.unset("nothing.here").unwrap();
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_invalid_path_rejected_by_every_operation() {
        let service = service_with(&InMemoryPersistence::new());
        let is_invalid = |e: ConfigError| matches!(e, ConfigError::InvalidPath { .. });

        assert!(is_invalid(service.get("a..b").unwrap_err()));
        assert!(is_invalid(service.get_string(".a").unwrap_err()));
        assert!(is_invalid(service.get_section("a.").unwrap_err()));
        assert!(is_invalid(service.set("a..b", ConfigValue::Null).unwrap_err()));
        assert!(is_invalid(service.unset("..").unwrap_err()));
    }

    #[test]
    fn test_set_persistence_failure() {
        let persistence = InMemoryPersistence::new();
        let service = service_with(&persistence);
        persistence.set_fail_saves(true);

        let err = service.set("a", ConfigValue::from(1)).unwrap_err();
        assert!(err.is_persistence_failure());
        assert!(err.to_string().contains("may not have been saved"));
    }

    #[test]
    fn test_register_watcher_reloads_store() {
        let persistence = InMemoryPersistence::new();
        let mut service = service_with(&persistence);
        let watcher = ManualWatcher::default();
        service.register_watcher(Box::new(watcher.clone())).unwrap();

        let mut external = ConfigSection::new();
        external.insert("theme", "dark");
        persistence.replace_root(external);

        assert!(!service.get("theme").unwrap().found);
        watcher.fire();
        assert_eq!(
            service.get("theme").unwrap().value,
            ConfigValue::from("dark")
        );
    }

    #[test]
    fn test_shutdown_stops_watchers_and_flushes() {
        let persistence = InMemoryPersistence::new();
        let mut service = service_with(&persistence);
        let watcher = ManualWatcher::default();
        service.register_watcher(Box::new(watcher.clone())).unwrap();

        service.shutdown().unwrap();
        assert!(*watcher.stopped.lock().unwrap());
        assert_eq!(persistence.save_count(), 1);
    }

    #[test]
    fn test_services_share_store() {
        let store = Arc::new(ConfigStore::load(Box::new(InMemoryPersistence::new())).unwrap());
        let first = DefaultUserConfigService::new(Arc::clone(&store));
        let second = DefaultUserConfigService::new(store);

        first.set("shared", ConfigValue::from(1)).unwrap();
        assert!(second.get("shared").unwrap().found);
    }

    #[test]
    fn test_builder_defaults_to_memory() {
        let service = UserConfigServiceBuilder::default().build().unwrap();
        assert_eq!(service.store().persistence_name(), "memory");
    }

    #[test]
    fn test_builder_with_file_unsupported_extension() {
        let result = UserConfigServiceBuilder::new().with_file("/tmp/config.ini");
        assert!(result.is_err());
    }
}
