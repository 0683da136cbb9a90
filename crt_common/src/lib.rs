//! CRT Common Library
//!
//! This crate provides the fixed parameter catalog of the simulated
//! cathode-ray tube, the shared error taxonomy, and configuration loading
//! utilities for all CRT workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Physical constants, tube geometry and user-adjustable ranges
//! - [`params`] - Parameter catalog, range predicates and snapshot record
//! - [`error`] - Engine error taxonomy
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! crt = { package = "crt_common", path = "../crt_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use crt_common::params::SystemParameters;
//! use crt_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod params;
pub mod prelude;
