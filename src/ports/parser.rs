// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which converts configuration
//! documents in a particular format (YAML, JSON, etc.) to and from the in-memory
//! configuration tree.

use crate::domain::{ConfigSection, Result};

/// A trait for parsing and rendering configuration documents.
///
/// # Document Shape
///
/// The top level of a document must be a mapping; it becomes the root section.
/// For example the YAML document:
///
/// ```yaml
/// defaults:
///   template: starter
///   location: eastus
/// ```
///
/// parses into a root section holding a `defaults` section with two string
/// values. Parsers keep the key order of the document.
///
/// # Examples
///
/// ```rust
/// use usercfg::ports::ConfigParser;
/// use usercfg::domain::{ConfigSection, Result};
///
/// struct LinesParser;
///
/// impl ConfigParser for LinesParser {
///     fn parse(&self, content: &str) -> Result<ConfigSection> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .collect())
///     }
///
///     fn render(&self, root: &ConfigSection) -> Result<String> {
///         Ok(root
///             .iter()
///             .filter_map(|(k, v)| v.project_string().map(|v| format!("{}={}\n", k, v)))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let parser = LinesParser;
/// let root = parser.parse("a=1\nb=2").unwrap();
/// assert_eq!(root.len(), 2);
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses a document into a root section.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigSection)` - The parsed root
    /// * `Err(ConfigError)` - The content is malformed or its top level is not a mapping
    fn parse(&self, content: &str) -> Result<ConfigSection>;

    /// Renders a root section as a document.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The rendered document
    /// * `Err(ConfigError)` - The tree cannot be represented in this format
    fn render(&self, root: &ConfigSection) -> Result<String>;

    /// Returns the file extensions supported by this parser.
    ///
    /// This allows a file-backed store to select the appropriate parser from the
    /// file extension. Extensions are given without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigValue;

    // Test implementation of ConfigParser using `key=value` lines
    struct TestParser;

    impl ConfigParser for TestParser {
        fn parse(&self, content: &str) -> Result<ConfigSection> {
            Ok(content
                .lines()
                .filter_map(|line| line.split_once('='))
                .collect())
        }

        fn render(&self, root: &ConfigSection) -> Result<String> {
            Ok(root
                .iter()
                .filter_map(|(k, v)| v.project_string().map(|v| format!("{}={}\n", k, v)))
                .collect())
        }

        fn supported_extensions(&self) -> &[&str] {
            &["test", "tst"]
        }
    }

    #[test]
    fn test_parser_parse() {
        let parser = TestParser;
        let result = parser.parse("test.key=test.value").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get("test.key"),
            Some(&ConfigValue::from("test.value"))
        );
    }

    #[test]
    fn test_parser_render() {
        let parser = TestParser;
        let mut root = ConfigSection::new();
        root.insert("a", 1);
        root.insert("b", true);
        assert_eq!(parser.render(&root).unwrap(), "a=1\nb=true\n");
    }

    #[test]
    fn test_parser_supported_extensions() {
        let parser = TestParser;
        let extensions = parser.supported_extensions();
        assert_eq!(extensions, &["test", "tst"]);
    }

    #[test]
    fn test_parser_parse_empty_content() {
        let parser = TestParser;
        let result = parser.parse("").unwrap();
        assert!(result.is_empty());
    }
}
