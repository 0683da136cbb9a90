//! # CRT Simulator
//!
//! Orchestration layer over the engine: configuration file and the
//! stateful [`session::Session`] used by the `crt_sim` binary.

pub mod config;
pub mod session;

pub use crate::config::SimConfig;
pub use crate::session::{LiveFrame, Mode, Session, SessionError, SessionSnapshot, VoltagePatch};
