// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration sections and path navigation.
//!
//! A `ConfigSection` is an insertion-ordered mapping from segment name to
//! `ConfigValue`. The root of the configuration tree is always a section, and
//! the path operations here (`get_path`, `set_path`, `remove_path`) implement
//! resolution, auto-vivification and deletion over it.

use crate::domain::config_path::ConfigPath;
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use std::fmt;

/// An ordered mapping of segment names to configuration values.
///
/// Keys are unique and keep the order in which they were first inserted, so
/// serialized output is stable across saves.
///
/// # Examples
///
/// ```
/// use usercfg::domain::{ConfigPath, ConfigSection, ConfigValue};
///
/// let mut root = ConfigSection::new();
/// let path = ConfigPath::parse("defaults.template").unwrap();
/// root.set_path(&path, ConfigValue::from("starter")).unwrap();
///
/// assert_eq!(root.get_path(&path), Some(&ConfigValue::from("starter")));
/// assert!(root.get("defaults").unwrap().is_section());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigSection(IndexMap<String, ConfigValue>);

impl ConfigSection {
    /// Creates an empty section.
    pub fn new() -> Self {
        ConfigSection(IndexMap::new())
    }

    /// Returns the number of immediate entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the immediate child named `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Returns `true` if the section has an immediate child named `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts an immediate child, returning the value it replaced.
    ///
    /// Replacing an existing key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes an immediate child, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.shift_remove(key)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates over the immediate entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.0.iter()
    }

    /// Iterates over the immediate keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, ConfigValue> {
        self.0.keys()
    }

    /// Iterates over the immediate values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, ConfigValue> {
        self.0.values()
    }

    /// Resolves a path to the value stored there.
    ///
    /// Every segment before the last must name a section; hitting a scalar on
    /// the way down resolves to `None`, as does any missing segment. The root
    /// path is not a child of any section and also yields `None`; callers that
    /// need the root use the section itself.
    pub fn get_path(&self, path: &ConfigPath) -> Option<&ConfigValue> {
        let (parent, leaf) = path.split_last()?;
        self.section_at(parent)?.get(leaf)
    }

    /// Assigns `value` at `path`, creating missing intermediate sections.
    ///
    /// The assignment is destructive: a previous value at `path` is replaced
    /// wholesale (sections are not merged), and a scalar sitting on an
    /// intermediate segment is replaced by a new section. Returns the value
    /// that was replaced, if any.
    ///
    /// Assigning to the root requires a section value, which becomes the new
    /// root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOperation` when assigning a non-section to
    /// the root.
    pub fn set_path(
        &mut self,
        path: &ConfigPath,
        value: ConfigValue,
    ) -> Result<Option<ConfigValue>> {
        let Some((parent, leaf)) = path.split_last() else {
            return match value {
                ConfigValue::Section(section) => {
                    let previous = std::mem::replace(self, section);
                    Ok(Some(ConfigValue::Section(previous)))
                }
                other => Err(ConfigError::invalid_operation(
                    path.as_str(),
                    format!("the root must be a section, not a {}", other.kind()),
                )),
            };
        };

        Ok(self.vivify(parent).insert(leaf, value))
    }

    /// Deletes the value at `path`.
    ///
    /// Returns `true` if something was removed and `false` if the path did not
    /// exist. Removing the root clears every entry.
    pub fn remove_path(&mut self, path: &ConfigPath) -> bool {
        let Some((parent, leaf)) = path.split_last() else {
            let removed = !self.is_empty();
            self.clear();
            return removed;
        };

        self.section_at_mut(parent)
            .map(|section| section.remove(leaf).is_some())
            .unwrap_or(false)
    }

    fn section_at(&self, segments: &[String]) -> Option<&ConfigSection> {
        let mut current = self;
        for segment in segments {
            current = current.get(segment)?.as_section()?;
        }
        Some(current)
    }

    fn section_at_mut(&mut self, segments: &[String]) -> Option<&mut ConfigSection> {
        let mut current = self;
        for segment in segments {
            current = match current.0.get_mut(segment.as_str())? {
                ConfigValue::Section(section) => section,
                _ => return None,
            };
        }
        Some(current)
    }

    fn vivify(&mut self, segments: &[String]) -> &mut ConfigSection {
        match segments.split_first() {
            None => self,
            Some((segment, rest)) => {
                let entry = self
                    .0
                    .entry(segment.clone())
                    .or_insert_with(ConfigValue::empty_section);
                vivify_entry(entry, segment, rest)
            }
        }
    }

    pub(crate) fn from_map_access<'de, A>(mut map: A) -> std::result::Result<Self, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut section = ConfigSection::new();
        while let Some((key, value)) = map.next_entry::<SectionKey, ConfigValue>()? {
            section.insert(key.0, value);
        }
        Ok(section)
    }
}

// Descends into `entry`, turning a scalar into an empty section first.
fn vivify_entry<'a>(
    entry: &'a mut ConfigValue,
    segment: &str,
    rest: &[String],
) -> &'a mut ConfigSection {
    match entry {
        ConfigValue::Section(section) => section.vivify(rest),
        _ => {
            tracing::debug!(
                "Replacing {} at segment '{}' with a section",
                entry.kind(),
                segment
            );
            *entry = ConfigValue::empty_section();
            vivify_entry(entry, segment, rest)
        }
    }
}

impl<'a> IntoIterator for &'a ConfigSection {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ConfigSection {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigSection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ConfigSection(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for ConfigSection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SectionVisitor)
    }
}

struct SectionVisitor;

impl<'de> Visitor<'de> for SectionVisitor {
    type Value = ConfigSection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping")
    }

    fn visit_map<A>(self, map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        ConfigSection::from_map_access(map)
    }
}

/// A mapping key; YAML allows scalars other than strings as keys.
struct SectionKey(String);

impl<'de> Deserialize<'de> for SectionKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SectionKeyVisitor)
    }
}

struct SectionKeyVisitor;

impl<'de> Visitor<'de> for SectionKeyVisitor {
    type Value = SectionKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(SectionKey("null".to_string()))
    }
}
