//! Simulator session: the mutable state behind a display.
//!
//! A [`Session`] owns the current beam voltages, the Lissajous
//! configuration and the animation origin. In manual mode the spot follows
//! the configured voltages; in Lissajous mode the deflection voltages come
//! from the signal generator, evaluated at the time elapsed since the origin.
//!
//! ```text
//!            update_voltages()
//!   ┌────────┐ ◀──────────────────── ┌───────────┐
//!   │ Manual │                       │ Lissajous │
//!   └────────┘ ────────────────────▶ └───────────┘
//!        configure_lissajous() / apply_preset()
//! ```

use std::time::{Duration, Instant};

use crt_common::config::ConfigError;
use crt_common::error::{CrtError, Field};
use crt_common::params::SystemParameters;
use crt_engine::{
    LissajousConfig, LissajousPatch, SignalSample, TrajectoryResult, VoltageTriple, compute_impact,
    merge_update, sample,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::SimConfig;

// ─── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Live frames only exist while a Lissajous figure is running.
    #[error("Session is not in Lissajous mode")]
    NotInLissajousMode,

    #[error(transparent)]
    Engine(#[from] CrtError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ─── Types ──────────────────────────────────────────────────────────

/// Source of the deflection voltages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Deflection voltages set directly.
    #[default]
    Manual,
    /// Deflection voltages driven by the signal generator.
    Lissajous,
}

/// Partial beam update; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoltagePatch {
    pub acceleration_voltage: Option<f64>,
    pub vertical_voltage: Option<f64>,
    pub horizontal_voltage: Option<f64>,
    pub persistence_time: Option<f64>,
}

/// One rendered frame of a running figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveFrame {
    /// Seconds since the animation origin.
    pub elapsed: f64,
    pub signal: SignalSample,
    pub impact: TrajectoryResult,
    pub persistence_time: f64,
}

/// Serializable view of the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    /// Seconds since the animation origin; 0 in manual mode.
    pub elapsed: f64,
    pub voltages: VoltageTriple,
    pub persistence_time: f64,
    pub lissajous: LissajousConfig,
    pub impact: TrajectoryResult,
}

// ─── Session ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Session {
    params: SystemParameters,
    mode: Mode,
    voltages: VoltageTriple,
    persistence_time: f64,
    lissajous: LissajousConfig,
    origin: Instant,
}

impl Session {
    /// Manual mode, catalog defaults.
    pub fn new(params: SystemParameters) -> Self {
        Self {
            params,
            mode: Mode::Manual,
            voltages: VoltageTriple::defaults(&params),
            persistence_time: params.persistence_time.default,
            lissajous: LissajousConfig::defaults(&params),
            origin: Instant::now(),
        }
    }

    /// Session seeded from a configuration file.
    ///
    /// Starts in Lissajous mode when the file names a preset or carries a
    /// `[lissajous]` section, manual mode otherwise.
    pub fn from_config(params: SystemParameters, config: &SimConfig) -> Result<Self, SessionError> {
        let voltages = config.beam.voltages();
        voltages.validate(&params)?;
        let persistence_time = params.check(Field::PersistenceTime, config.beam.persistence_time)?;
        let lissajous = config.initial_lissajous(&params)?;

        let mode = if config.preset.is_some() || !config.lissajous.is_empty() {
            Mode::Lissajous
        } else {
            Mode::Manual
        };

        Ok(Self {
            params,
            mode,
            voltages,
            persistence_time,
            lissajous,
            origin: Instant::now(),
        })
    }

    pub fn params(&self) -> &SystemParameters {
        &self.params
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn voltages(&self) -> VoltageTriple {
        self.voltages
    }

    pub fn persistence_time(&self) -> f64 {
        self.persistence_time
    }

    pub fn lissajous(&self) -> &LissajousConfig {
        &self.lissajous
    }

    // ── Manual control ──────────────────────────────────────────

    /// Apply a beam update and switch to manual mode.
    ///
    /// Every present field is validated before anything is committed: on
    /// error the session is unchanged.
    pub fn update_voltages(&mut self, patch: &VoltagePatch) -> Result<TrajectoryResult, SessionError> {
        let candidate = VoltageTriple::new(
            patch.acceleration_voltage.unwrap_or(self.voltages.acceleration_voltage),
            patch.vertical_voltage.unwrap_or(self.voltages.vertical_voltage),
            patch.horizontal_voltage.unwrap_or(self.voltages.horizontal_voltage),
        );
        candidate.validate(&self.params)?;
        let persistence_time = match patch.persistence_time {
            Some(seconds) => self.params.check(Field::PersistenceTime, seconds)?,
            None => self.persistence_time,
        };

        let impact = compute_impact(&self.params, &candidate)?;
        self.voltages = candidate;
        self.persistence_time = persistence_time;
        self.set_mode(Mode::Manual);
        Ok(impact)
    }

    /// Impact of the current manual voltages.
    pub fn impact(&self) -> Result<TrajectoryResult, SessionError> {
        Ok(compute_impact(&self.params, &self.voltages)?)
    }

    // ── Lissajous control ───────────────────────────────────────

    /// Merge `patch` into the running configuration, switch to Lissajous
    /// mode and restart the animation.
    ///
    /// Invalid patch fields are dropped individually.
    pub fn configure_lissajous(&mut self, patch: &LissajousPatch) -> LissajousConfig {
        self.lissajous = merge_update(&self.params, &self.lissajous, patch);
        self.start_lissajous();
        self.lissajous
    }

    /// Load a preset figure, switch to Lissajous mode and restart the animation.
    pub fn apply_preset(&mut self, preset_id: &str) -> Result<LissajousConfig, SessionError> {
        self.lissajous = crt_engine::apply_preset(preset_id)?;
        debug!(preset_id, "preset applied");
        self.start_lissajous();
        Ok(self.lissajous)
    }

    /// Switch mode. Requesting Lissajous mode always restarts the
    /// animation, even when it is already running.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "session mode change");
            self.mode = mode;
        }
        if mode == Mode::Lissajous {
            self.origin = Instant::now();
        }
    }

    fn start_lissajous(&mut self) {
        self.set_mode(Mode::Lissajous);
    }

    /// Time since the animation origin, zero outside Lissajous mode.
    fn elapsed_at(&self, now: Instant) -> Duration {
        match self.mode {
            Mode::Lissajous => now.saturating_duration_since(self.origin),
            Mode::Manual => Duration::ZERO,
        }
    }

    /// Frame of the running figure `elapsed` after the animation origin.
    ///
    /// The acceleration voltage stays at its manual setting.
    pub fn live_frame(&self, elapsed: Duration) -> Result<LiveFrame, SessionError> {
        if self.mode != Mode::Lissajous {
            return Err(SessionError::NotInLissajousMode);
        }
        let t = elapsed.as_secs_f64();
        let signal = sample(&self.params, t, &self.lissajous)?;
        let voltages = VoltageTriple::new(
            self.voltages.acceleration_voltage,
            signal.vertical_voltage,
            signal.horizontal_voltage,
        );
        let impact = compute_impact(&self.params, &voltages)?;
        Ok(LiveFrame {
            elapsed: t,
            signal,
            impact,
            persistence_time: self.persistence_time,
        })
    }

    /// Frame of the running figure at wall-clock instant `now`.
    pub fn live_frame_at(&self, now: Instant) -> Result<LiveFrame, SessionError> {
        self.live_frame(now.saturating_duration_since(self.origin))
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.snapshot_at(Instant::now())
    }

    /// Session state as seen at wall-clock instant `now`.
    pub fn snapshot_at(&self, now: Instant) -> Result<SessionSnapshot, SessionError> {
        Ok(SessionSnapshot {
            mode: self.mode,
            elapsed: self.elapsed_at(now).as_secs_f64(),
            voltages: self.voltages,
            persistence_time: self.persistence_time,
            lissajous: self.lissajous,
            impact: self.impact()?,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SystemParameters::STANDARD)
    }
}
