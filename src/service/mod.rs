// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration store and service implementation.
//!
//! This module contains the shared [`ConfigStore`] and the concrete
//! implementation of the `UserConfigService` trait built on top of it.

pub mod config_store;
pub mod default_service;

// Re-export commonly used types
pub use config_store::ConfigStore;
pub use default_service::{DefaultUserConfigService, UserConfigServiceBuilder};
