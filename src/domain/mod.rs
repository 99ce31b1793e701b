// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the configuration tree model (paths, values, sections),
//! the request/response messages and the service interface. It is independent
//! of any persistence or transport concern.

pub mod config_path;
pub mod config_section;
pub mod config_value;
pub mod errors;
pub mod messages;
pub mod service;

// Re-export commonly used types
pub use config_path::ConfigPath;
pub use config_section::ConfigSection;
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use messages::{
    ConfigRequest, ConfigResponse, GetResponse, GetSectionResponse, GetStringResponse, Method,
    RequestEnvelope,
};
pub use service::UserConfigService;
