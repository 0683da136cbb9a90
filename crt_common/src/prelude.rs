//! Prelude module for common re-exports.
//!
//! ```rust
//! use crt_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig, Validate};

// ─── Parameter Catalog ──────────────────────────────────────────────
pub use crate::params::{ParameterSnapshot, Range, SystemParameters};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{CrtError, CrtResult, Field};
