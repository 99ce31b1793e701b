// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML document parser.
//!
//! This module provides a parser that converts YAML documents to and from the
//! configuration tree.

use crate::domain::{ConfigError, ConfigSection, Result};
use crate::ports::ConfigParser;

/// YAML parser implementation.
///
/// Mappings become sections, keeping document order. Sequences become sections
/// keyed by element index (`servers.0`, `servers.1`, ...), and non-string keys
/// are rendered to strings.
///
/// # Examples
///
/// ```rust
/// use usercfg::adapters::YamlParser;
/// use usercfg::domain::{ConfigPath, ConfigValue};
/// use usercfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let root = parser.parse("database:\n  host: localhost\n  port: 5432").unwrap();
///
/// let port = ConfigPath::parse("database.port").unwrap();
/// assert_eq!(root.get_path(&port), Some(&ConfigValue::from(5432)));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigSection> {
        if content.trim().is_empty() {
            return Ok(ConfigSection::new());
        }

        // A null document is an empty root; any other non-mapping is an error.
        let root: Option<ConfigSection> =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(root.unwrap_or_default())
    }

    fn render(&self, root: &ConfigSection) -> Result<String> {
        serde_yaml::to_string(root).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to render YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
