// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed persistence adapter.
//!
//! This module provides a persistence collaborator that keeps the configuration
//! tree in a single file. The document format is chosen from the file extension.

use crate::domain::{ConfigError, ConfigSection, Result};
use crate::ports::{ConfigParser, ConfigPersistence};
use directories::ProjectDirs;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Maximum allowed file size for configuration files (10MB)
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Environment variable that overrides the default configuration directory.
pub const CONFIG_DIR_ENV: &str = "USERCFG_CONFIG_DIR";

/// Default file name used inside the configuration directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const SOURCE_NAME: &str = "file";

/// Returns a parser able to read and write `path`, chosen by extension.
///
/// # Errors
///
/// Returns `ConfigError::SourceError` if no enabled parser handles the extension.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn ConfigParser>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    #[allow(unused_mut)]
    let mut candidates: Vec<Box<dyn ConfigParser>> = Vec::new();
    #[cfg(feature = "yaml")]
    candidates.push(Box::new(crate::adapters::YamlParser::new()));
    #[cfg(feature = "json")]
    candidates.push(Box::new(crate::adapters::JsonParser::new()));

    candidates
        .into_iter()
        .find(|p| p.supported_extensions().contains(&extension.as_str()))
        .ok_or_else(|| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "No parser available for file extension '{}' of {}",
                extension,
                display_name(path)
            ),
            source: None,
        })
}

/// Persistence collaborator backed by a single file.
///
/// A missing or blank file loads as an empty root; the file and its parent
/// directories are created on the first save. Saves write a sibling temporary
/// file and rename it over the target, so a crash never leaves a half-written
/// configuration. On Unix the file is created readable only by its owner.
///
/// # Examples
///
/// ```rust,no_run
/// use usercfg::adapters::FilePersistence;
/// use usercfg::ports::ConfigPersistence;
///
/// // Load from a specific file
/// let persistence = FilePersistence::from_file("/path/to/config.yaml").unwrap();
/// let root = persistence.load().unwrap();
///
/// // Or from the default OS location
/// let persistence = FilePersistence::from_default_location("myapp", "com.example").unwrap();
/// ```
pub struct FilePersistence {
    /// Path to the configuration file
    file_path: PathBuf,
    /// Parser for the file's format
    parser: Box<dyn ConfigParser>,
}

impl FilePersistence {
    /// Creates a file collaborator with an explicit parser.
    pub fn new(path: impl AsRef<Path>, parser: Box<dyn ConfigParser>) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            parser,
        }
    }

    /// Creates a file collaborator, choosing the parser from the file extension.
    ///
    /// The file does not need to exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceError` if the extension is not supported.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let parser = parser_for_path(path.as_ref())?;
        Ok(Self::new(path, parser))
    }

    /// Creates a file collaborator at the default OS-appropriate location.
    ///
    /// The directory is taken from the `USERCFG_CONFIG_DIR` environment variable
    /// when set, otherwise from the platform configuration directory for the
    /// application (via the `directories` crate). The file is named
    /// `config.json`.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, DEFAULT_CONFIG_FILE)
    }

    /// Creates a file collaborator with a custom file name in the default location.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier
    /// * `filename` - The configuration file name (e.g., "settings.yaml")
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let config_dir = default_config_dir(app_name, qualifier)?;
        Self::from_file(config_dir.join(filename))
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    // Reads the file, or returns `None` when it does not exist.
    fn read_content(&self) -> Result<Option<String>> {
        // Check file size before reading
        let metadata = match fs::metadata(&self.file_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(self.source_error(
                    format!(
                        "Failed to read file metadata: {}",
                        display_name(&self.file_path)
                    ),
                    e,
                ))
            }
        };

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
                source: None,
            });
        }

        match fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.source_error(
                format!(
                    "Failed to read configuration file: {}",
                    display_name(&self.file_path)
                ),
                e,
            )),
        }
    }

    fn source_error(&self, message: String, err: std::io::Error) -> ConfigError {
        ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message,
            source: Some(Box::new(err)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    fn write_atomically(&self, content: &str) -> std::io::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.file_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            e
        })
    }
}

/// Resolves the configuration directory, honouring `USERCFG_CONFIG_DIR`.
pub fn default_config_dir(app_name: &str, qualifier: &str) -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let proj_dirs =
        ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: "Failed to determine project directories".to_string(),
            source: None,
        })?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

impl std::fmt::Debug for FilePersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePersistence")
            .field("file_path", &self.file_path)
            .field("extensions", &self.parser.supported_extensions())
            .finish()
    }
}

impl ConfigPersistence for FilePersistence {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn load(&self) -> Result<ConfigSection> {
        match self.read_content()? {
            Some(content) => self.parser.parse(&content),
            None => {
                tracing::debug!(
                    "Configuration file {} does not exist yet; starting empty",
                    self.file_path.display()
                );
                Ok(ConfigSection::new())
            }
        }
    }

    // A writer that truncates before writing leaves a blank file for a moment.
    fn reload(&self) -> Result<Option<ConfigSection>> {
        match self.read_content()? {
            Some(content) if content.trim().is_empty() => {
                tracing::debug!(
                    "Configuration file {} is blank; keeping the current tree",
                    self.file_path.display()
                );
                Ok(None)
            }
            Some(content) => self.parser.parse(&content).map(Some),
            None => Ok(Some(ConfigSection::new())),
        }
    }

    fn save(&self, root: &ConfigSection) -> Result<()> {
        let content = self.parser.render(root)?;
        self.write_atomically(&content).map_err(|e| {
            self.source_error(
                format!(
                    "Failed to write configuration file: {}",
                    display_name(&self.file_path)
                ),
                e,
            )
        })?;

        tracing::debug!("Saved configuration to {}", self.file_path.display());
        Ok(())
    }
}
