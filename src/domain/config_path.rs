// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration path type for addressing values in the configuration tree.
//!
//! This module provides the `ConfigPath` type, which parses a dot-separated path
//! string (`defaults.template`) into its segments. The empty string addresses the
//! root section.

use crate::domain::errors::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// The fixed separator between path segments.
pub const SEPARATOR: char = '.';

/// A parsed, validated path into the configuration tree.
///
/// Paths are case-sensitive. A non-empty path must not contain empty segments,
/// so `a..b`, `.a` and `a.` are all rejected.
///
/// # Examples
///
/// ```
/// use usercfg::domain::config_path::ConfigPath;
///
/// let path = ConfigPath::parse("defaults.template").unwrap();
/// assert_eq!(path.segments(), &["defaults", "template"]);
/// assert_eq!(path.as_str(), "defaults.template");
///
/// let root = ConfigPath::parse("").unwrap();
/// assert!(root.is_root());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    raw: String,
    segments: Vec<String>,
}

impl ConfigPath {
    /// Parses a dot-separated path string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` if a non-empty path has an empty segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use usercfg::domain::config_path::ConfigPath;
    ///
    /// assert!(ConfigPath::parse("a.b.c").is_ok());
    /// assert!(ConfigPath::parse("a..c").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = path.split(SEPARATOR).map(String::from).collect();
        if let Some(index) = segments.iter().position(|s| s.is_empty()) {
            return Err(ConfigError::invalid_path(
                path,
                format!("segment {} is empty", index),
            ));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Returns the path addressing the root section.
    pub fn root() -> Self {
        Self {
            raw: String::new(),
            segments: Vec::new(),
        }
    }

    /// Returns `true` if this path addresses the root section.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the path as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the individual segments of the path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Splits the path into its parent segments and final segment.
    ///
    /// Returns `None` for the root path.
    ///
    /// # Examples
    ///
    /// ```
    /// use usercfg::domain::config_path::ConfigPath;
    ///
    /// let path = ConfigPath::parse("a.b.c").unwrap();
    /// let (parent, leaf) = path.split_last().unwrap();
    /// assert_eq!(parent, &["a", "b"]);
    /// assert_eq!(leaf, "c");
    /// ```
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.segments
            .split_last()
            .map(|(leaf, parent)| (parent, leaf.as_str()))
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` if `segment` is empty or contains the
    /// separator.
    pub fn join(&self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains(SEPARATOR) {
            return Err(ConfigError::invalid_path(
                segment,
                "a joined segment must be non-empty and contain no separator",
            ));
        }

        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self {
            raw: segments.join("."),
            segments,
        })
    }
}

impl Default for ConfigPath {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for ConfigPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ConfigPath {
    type Error = ConfigError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConfigPath {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
