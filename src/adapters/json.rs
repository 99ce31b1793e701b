// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON document parser.

use crate::domain::{ConfigError, ConfigSection, Result};
use crate::ports::ConfigParser;

/// JSON parser implementation.
///
/// Objects become sections in document order; nested arrays become sections
/// keyed by element index. The top level must be an object, `null` or blank.
/// Output is pretty-printed with a trailing newline.
///
/// # Examples
///
/// ```rust
/// use usercfg::adapters::JsonParser;
/// use usercfg::ports::ConfigParser;
///
/// let parser = JsonParser::new();
/// let root = parser.parse(r#"{"defaults": {"template": "starter"}}"#).unwrap();
/// assert!(root.get("defaults").unwrap().is_section());
/// ```
#[derive(Debug, Clone)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<ConfigSection> {
        if content.trim().is_empty() {
            return Ok(ConfigSection::new());
        }

        // A null document is an empty root; any other non-mapping is an error.
        let root: Option<ConfigSection> =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(root.unwrap_or_default())
    }

    fn render(&self, root: &ConfigSection) -> Result<String> {
        let mut rendered =
            serde_json::to_string_pretty(root).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to render JSON: {}", e),
                source: Some(Box::new(e)),
            })?;
        rendered.push('\n');
        Ok(rendered)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
