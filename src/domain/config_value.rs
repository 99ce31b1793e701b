// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type.
//!
//! This module provides the `ConfigValue` sum type stored in the configuration
//! tree, along with its string projection and its serde representation.

use crate::domain::config_section::ConfigSection;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Largest magnitude at which every integer is exactly representable in an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// A value stored in the configuration tree.
///
/// Each variant is explicit so that callers can match exhaustively when deciding
/// whether a value can serve a given operation.
///
/// # Examples
///
/// ```
/// use usercfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from(true);
/// assert_eq!(value.as_bool(), Some(true));
/// assert_eq!(value.project_string().as_deref(), Some("true"));
///
/// let value = ConfigValue::from(42);
/// assert_eq!(value.project_string().as_deref(), Some("42"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConfigValue {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, held as a double.
    Number(f64),
    /// A string.
    String(String),
    /// A nested section of further named values.
    Section(ConfigSection),
}

impl ConfigValue {
    /// Creates an empty section value.
    pub fn empty_section() -> Self {
        ConfigValue::Section(ConfigSection::new())
    }

    /// Returns a short name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Section(_) => "section",
        }
    }

    /// Returns `true` if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns `true` if the value is a section.
    pub fn is_section(&self) -> bool {
        matches!(self, ConfigValue::Section(_))
    }

    /// Returns the boolean if the value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if the value is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as an `i64` if it is integral and exactly representable.
    ///
    /// # Examples
    ///
    /// ```
    /// use usercfg::domain::config_value::ConfigValue;
    ///
    /// assert_eq!(ConfigValue::from(8080).as_i64(), Some(8080));
    /// assert_eq!(ConfigValue::from(1.5).as_i64(), None);
    /// ```
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Number(n) if is_safe_integer(*n) => Some(*n as i64),
            _ => None,
        }
    }

    /// Returns the string slice if the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the section if the value is one.
    pub fn as_section(&self) -> Option<&ConfigSection> {
        match self {
            ConfigValue::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Consumes the value, returning the section if it is one.
    pub fn into_section(self) -> Option<ConfigSection> {
        match self {
            ConfigValue::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Renders a scalar as a string.
    ///
    /// Booleans render as `true`/`false`, numbers in canonical decimal form,
    /// strings verbatim and null as the empty string. Sections have no string
    /// form and yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use usercfg::domain::config_value::ConfigValue;
    ///
    /// assert_eq!(ConfigValue::from(0.25).project_string().as_deref(), Some("0.25"));
    /// assert_eq!(ConfigValue::from("starter").project_string().as_deref(), Some("starter"));
    /// assert_eq!(ConfigValue::empty_section().project_string(), None);
    /// ```
    pub fn project_string(&self) -> Option<String> {
        match self {
            ConfigValue::Null => Some(String::new()),
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Number(n) => Some(format_number(*n)),
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Section(_) => None,
        }
    }

    /// Returns `true` if this value, or any value nested beneath it, is a NaN
    /// or infinite number.
    pub fn contains_non_finite(&self) -> bool {
        match self {
            ConfigValue::Number(n) => !n.is_finite(),
            ConfigValue::Section(section) => section.values().any(ConfigValue::contains_non_finite),
            _ => false,
        }
    }
}

fn is_safe_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

/// Formats a number in canonical decimal form: no exponent, no trailing `.0`,
/// and negative zero rendered as `0`.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Number(f64::from(n))
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        ConfigValue::Number(f64::from(n))
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<ConfigSection> for ConfigValue {
    fn from(section: ConfigSection) -> Self {
        ConfigValue::Section(section)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Number(n) if is_safe_integer(*n) => serializer.serialize_i64(*n as i64),
            ConfigValue::Number(n) => serializer.serialize_f64(*n),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Section(section) => section.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a null, boolean, number, string, sequence or mapping")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        ConfigValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(ConfigValue::Bool(v))
    }

    // Integers that a double cannot hold exactly are refused rather than rounded.
    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        if v.unsigned_abs() > MAX_EXACT_INTEGER {
            return Err(E::custom(format!(
                "integer {} cannot be represented exactly",
                v
            )));
        }
        Ok(ConfigValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        if v > MAX_EXACT_INTEGER {
            return Err(E::custom(format!(
                "integer {} cannot be represented exactly",
                v
            )));
        }
        Ok(ConfigValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(ConfigValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(ConfigValue::String(v))
    }

    // Sequences have no variant of their own; elements are keyed by index.
    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut section = ConfigSection::new();
        let mut index = 0usize;
        while let Some(value) = seq.next_element::<ConfigValue>()? {
            section.insert(index.to_string(), value);
            index += 1;
        }
        Ok(ConfigValue::Section(section))
    }

    fn visit_map<A>(self, map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        ConfigSection::from_map_access(map).map(ConfigValue::Section)
    }
}
