// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response messages for the user configuration service.
//!
//! These types are the transport-agnostic shape of the five access operations.
//! A transport decodes a `ConfigRequest`, hands it to
//! [`UserConfigService::handle`](crate::domain::UserConfigService::handle) and
//! encodes the returned `ConfigResponse`.

use crate::domain::config_section::ConfigSection;
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fully-qualified name of the access service, used in method paths.
pub const SERVICE_NAME: &str = "usercfg.UserConfigService";

/// The operations exposed by the access service.
///
/// # Examples
///
/// ```
/// use usercfg::domain::messages::Method;
///
/// let method: Method = "GetSection".parse().unwrap();
/// assert_eq!(method, Method::GetSection);
///
/// let method: Method = "/usercfg.UserConfigService/Unset".parse().unwrap();
/// assert_eq!(method, Method::Unset);
///
/// assert!("Watch".parse::<Method>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Retrieve a value of any variant.
    Get,
    /// Retrieve a scalar rendered as a string.
    GetString,
    /// Retrieve a section's immediate entries.
    GetSection,
    /// Assign a value.
    Set,
    /// Remove a value.
    Unset,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::GetString,
        Method::GetSection,
        Method::Set,
        Method::Unset,
    ];

    /// Returns the bare method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "Get",
            Method::GetString => "GetString",
            Method::GetSection => "GetSection",
            Method::Set => "Set",
            Method::Unset => "Unset",
        }
    }

    /// Returns the method path, `/usercfg.UserConfigService/<Name>`.
    pub fn full_name(&self) -> String {
        format!("/{}/{}", SERVICE_NAME, self.as_str())
    }

    /// Returns `true` if the method mutates the store.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Method::Set | Method::Unset)
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let prefix = format!("/{}/", SERVICE_NAME);
        let name = s.strip_prefix(prefix.as_str()).unwrap_or(s);

        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| ConfigError::Unimplemented {
                method: s.to_string(),
            })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the access service.
///
/// On the wire a request is an object with a `method` field holding either the
/// bare method name or its full path, a `path` field and, for `Set`, a `value`
/// field. Decoding goes through [`RequestEnvelope`], so unknown methods fail
/// with the `Unimplemented` message.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "PascalCase")]
pub enum ConfigRequest {
    /// Retrieve the value at `path`.
    Get {
        /// Dot-separated path; empty for the root
        path: String,
    },
    /// Retrieve the value at `path` as a string.
    GetString {
        /// Dot-separated path; empty for the root
        path: String,
    },
    /// Retrieve the section at `path`.
    GetSection {
        /// Dot-separated path; empty for the root
        path: String,
    },
    /// Assign `value` at `path`.
    Set {
        /// Dot-separated path; empty for the root
        path: String,
        /// The value to store
        value: ConfigValue,
    },
    /// Remove the value at `path`.
    Unset {
        /// Dot-separated path; empty for the root
        path: String,
    },
}

impl ConfigRequest {
    /// Builds a request from a method name, a path and an optional value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Unimplemented` for an unknown method name and
    /// `ConfigError::InvalidOperation` for a `Set` without a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use usercfg::domain::messages::ConfigRequest;
    ///
    /// let request = ConfigRequest::from_parts("Get", "defaults.template", None).unwrap();
    /// assert_eq!(request.path(), "defaults.template");
    ///
    /// assert!(ConfigRequest::from_parts("Set", "a", None).is_err());
    /// ```
    pub fn from_parts(
        method: &str,
        path: impl Into<String>,
        value: Option<ConfigValue>,
    ) -> Result<Self> {
        let path = path.into();
        let request = match method.parse::<Method>()? {
            Method::Get => ConfigRequest::Get { path },
            Method::GetString => ConfigRequest::GetString { path },
            Method::GetSection => ConfigRequest::GetSection { path },
            Method::Set => {
                let value = value.ok_or_else(|| {
                    ConfigError::invalid_operation(path.as_str(), "Set requires a value")
                })?;
                ConfigRequest::Set { path, value }
            }
            Method::Unset => ConfigRequest::Unset { path },
        };
        Ok(request)
    }

    /// Returns the method this request invokes.
    pub fn method(&self) -> Method {
        match self {
            ConfigRequest::Get { .. } => Method::Get,
            ConfigRequest::GetString { .. } => Method::GetString,
            ConfigRequest::GetSection { .. } => Method::GetSection,
            ConfigRequest::Set { .. } => Method::Set,
            ConfigRequest::Unset { .. } => Method::Unset,
        }
    }

    /// Returns the path the request targets.
    pub fn path(&self) -> &str {
        match self {
            ConfigRequest::Get { path }
            | ConfigRequest::GetString { path }
            | ConfigRequest::GetSection { path }
            | ConfigRequest::Set { path, .. }
            | ConfigRequest::Unset { path } => path,
        }
    }
}

impl<'de> Deserialize<'de> for ConfigRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RequestEnvelope::deserialize(deserializer)?
            .into_request()
            .map_err(de::Error::custom)
    }
}

/// A decoded request whose method name has not been checked yet.
///
/// Transports that need to tell an unknown method apart from a malformed
/// message decode this first and call [`into_request`](Self::into_request).
///
/// # Examples
///
/// ```
/// use usercfg::domain::messages::{ConfigRequest, RequestEnvelope};
///
/// let envelope = RequestEnvelope {
///     method: "/usercfg.UserConfigService/Get".to_string(),
///     path: "a.b".to_string(),
///     value: None,
/// };
/// assert_eq!(
///     envelope.into_request().unwrap(),
///     ConfigRequest::Get { path: "a.b".into() }
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RequestEnvelope {
    /// Bare method name or `/usercfg.UserConfigService/<Name>`
    pub method: String,
    /// Dot-separated path; empty for the root
    pub path: String,
    /// The value to store, for `Set`
    #[serde(default, deserialize_with = "present_value")]
    pub value: Option<ConfigValue>,
}

impl RequestEnvelope {
    /// Resolves the method name and builds the request.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigRequest::from_parts`].
    pub fn into_request(self) -> Result<ConfigRequest> {
        ConfigRequest::from_parts(&self.method, self.path, self.value)
    }
}

// An explicit `null` is a value to store, not a missing field.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<ConfigValue>, D::Error>
where
    D: Deserializer<'de>,
{
    ConfigValue::deserialize(deserializer).map(Some)
}

/// Response to `Get`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    /// Whether the path resolved
    pub found: bool,
    /// The resolved value; null when not found
    pub value: ConfigValue,
}

impl GetResponse {
    /// A response carrying a resolved value.
    pub fn found(value: ConfigValue) -> Self {
        Self { found: true, value }
    }

    /// A response signalling absence.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Response to `GetString`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStringResponse {
    /// Whether the path resolved
    pub found: bool,
    /// The string projection; empty when not found
    pub value: String,
}

impl GetStringResponse {
    /// A response carrying a projected string.
    pub fn found(value: String) -> Self {
        Self { found: true, value }
    }

    /// A response signalling absence.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Response to `GetSection`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetSectionResponse {
    /// Whether the path resolved
    pub found: bool,
    /// The section's entries; empty when not found
    pub section: ConfigSection,
}

impl GetSectionResponse {
    /// A response carrying a resolved section.
    pub fn found(section: ConfigSection) -> Self {
        Self {
            found: true,
            section,
        }
    }

    /// A response signalling absence.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// A response from the access service, one variant per method.
///
/// Serialized untagged: the caller already knows which method it invoked.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigResponse {
    /// Response to `Get`.
    Get(GetResponse),
    /// Response to `GetString`.
    GetString(GetStringResponse),
    /// Response to `GetSection`.
    GetSection(GetSectionResponse),
    /// Acknowledgment of `Set` or `Unset`.
    Empty {},
}

impl ConfigResponse {
    /// Returns the `found` flag for read responses, `None` for acknowledgments.
    pub fn found(&self) -> Option<bool> {
        match self {
            ConfigResponse::Get(r) => Some(r.found),
            ConfigResponse::GetString(r) => Some(r.found),
            ConfigResponse::GetSection(r) => Some(r.found),
            ConfigResponse::Empty {} => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trips_names() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
            assert_eq!(method.full_name().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_method_full_name() {
        assert_eq!(Method::Get.full_name(), "/usercfg.UserConfigService/Get");
    }

    #[test]
    fn test_method_unknown_is_unimplemented() {
        let err = "Watch".parse::<Method>().unwrap_err();
        assert!(matches!(err, ConfigError::Unimplemented { ref method } if method == "Watch"));

        let err = "/other.Service/Get".parse::<Method>().unwrap_err();
        assert!(matches!(err, ConfigError::Unimplemented { .. }));

        // Method names are case-sensitive.
        assert!("get".parse::<Method>().is_err());
    }

    #[test]
    fn test_method_is_mutation() {
        assert!(Method::Set.is_mutation());
        assert!(Method::Unset.is_mutation());
        assert!(!Method::Get.is_mutation());
        assert!(!Method::GetString.is_mutation());
        assert!(!Method::GetSection.is_mutation());
    }

    #[test]
    fn test_request_from_parts() {
        let request = ConfigRequest::from_parts("Set", "a.b", Some(ConfigValue::from(1))).unwrap();
        assert_eq!(request.method(), Method::Set);
        assert_eq!(request.path(), "a.b");

        let request = ConfigRequest::from_parts("Unset", "a.b", None).unwrap();
        assert_eq!(request, ConfigRequest::Unset { path: "a.b".into() });
    }

    #[test]
    fn test_request_from_parts_errors() {
        let err = ConfigRequest::from_parts("Set", "a", None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOperation { .. }));

        let err = ConfigRequest::from_parts("Delete", "a", None).unwrap_err();
        assert!(matches!(err, ConfigError::Unimplemented { .. }));
    }

    #[test]
    fn test_envelope_into_request() {
        let envelope = RequestEnvelope {
            method: "/usercfg.UserConfigService/Set".to_string(),
            path: "a".to_string(),
            value: Some(ConfigValue::Null),
        };
        assert_eq!(
            envelope.into_request().unwrap(),
            ConfigRequest::Set {
                path: "a".into(),
                value: ConfigValue::Null
            }
        );

        let envelope = RequestEnvelope {
            method: "Watch".to_string(),
            path: "a".to_string(),
            value: None,
        };
        assert!(matches!(
            envelope.into_request().unwrap_err(),
            ConfigError::Unimplemented { ref method } if method == "Watch"
        ));
    }

    #[test]
    #[cfg(feature = "json")]
    fn test_request_decodes_full_method_name() {
        let request: ConfigRequest = serde_json::from_str(
            r#"{"method": "/usercfg.UserConfigService/GetSection", "path": "a"}"#,
        )
        .unwrap();
        assert_eq!(request, ConfigRequest::GetSection { path: "a".into() });
    }

    #[test]
    #[cfg(feature = "json")]
    fn test_request_decodes_explicit_null_value() {
        let request: ConfigRequest =
            serde_json::from_str(r#"{"method": "Set", "path": "a", "value": null}"#).unwrap();
        assert_eq!(
            request,
            ConfigRequest::Set {
                path: "a".into(),
                value: ConfigValue::Null
            }
        );

        // Set without a value field is rejected
        let missing = r#"{"method": "Set", "path": "a"}"#;
        assert!(serde_json::from_str::<ConfigRequest>(missing).is_err());
    }

    #[test]
    #[cfg(feature = "json")]
    fn test_request_unknown_method_is_unimplemented() {
        let raw = r#"{"method": "Watch", "path": "a"}"#;

        let err = serde_json::from_str::<ConfigRequest>(raw).unwrap_err();
        assert!(err.to_string().contains("Watch"), "{}", err);

        let envelope: RequestEnvelope = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            envelope.into_request().unwrap_err(),
            ConfigError::Unimplemented { .. }
        ));
    }

    #[test]
    #[cfg(feature = "json")]
    fn test_request_encodes_bare_method_name() {
        let request = ConfigRequest::Unset { path: "a.b".into() };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"method": "Unset", "path": "a.b"})
        );
    }

    #[test]
    fn test_not_found_responses() {
        let get = GetResponse::not_found();
        assert!(!get.found);
        assert!(get.value.is_null());

        let string = GetStringResponse::not_found();
        assert!(!string.found);
        assert!(string.value.is_empty());

        let section = GetSectionResponse::not_found();
        assert!(!section.found);
        assert!(section.section.is_empty());
    }

    #[test]
    fn test_response_found_flag() {
        assert_eq!(
            ConfigResponse::Get(GetResponse::found(ConfigValue::from(1))).found(),
            Some(true)
        );
        assert_eq!(
            ConfigResponse::GetString(GetStringResponse::not_found()).found(),
            Some(false)
        );
        assert_eq!(ConfigResponse::Empty {}.found(), None);
    }
}
