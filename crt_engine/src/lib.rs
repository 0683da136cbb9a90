//! # CRT Engine Library
//!
//! Closed-form physics and signal engine of the CRT simulator.
//!
//! ## Components
//!
//! 1. **Trajectory** ([`trajectory`]): three voltages → screen impact,
//!    velocities and flight time, in five sequential stages.
//! 2. **Beam path** ([`path`]): the same kinematics sampled along the tube axis.
//! 3. **Signal** ([`signal`]): sinusoidal deflection voltages for
//!    Lissajous figures, partial updates, animation sequences, periods.
//! 4. **Presets** ([`presets`]): fixed catalog of named figures.
//!
//! ## Purity
//!
//! Every operation is a deterministic function of its arguments. There is no
//! interior state, no cache and no I/O; the parameter catalog is only borrowed.

pub mod path;
pub mod presets;
pub mod signal;
pub mod trajectory;

pub use crate::presets::{LissajousPreset, apply_preset, find_preset, lissajous_info};
pub use crate::signal::{
    LissajousConfig, LissajousPatch, SequenceFrame, SignalSample, SignalSequence, exact_period,
    merge_update, period, sample, sequence,
};
pub use crate::trajectory::{TrajectoryResult, VoltageTriple, compute_impact};
