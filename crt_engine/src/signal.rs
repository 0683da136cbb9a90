//! Sinusoidal deflection signals for Lissajous figures.
//!
//! ```text
//! V_axis(t) = A · sin(2π·f·t + φ)      clamped into the axis voltage range
//! ```
//!
//! Amplitude validation already bounds `|V|` by the plate range, so the
//! clamp only guards against rounding at the limits.

use core::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crt::error::{CrtError, CrtResult, Field};
use crt::params::SystemParameters;

// ─── Configuration ──────────────────────────────────────────────────

/// Complete six-parameter Lissajous configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LissajousConfig {
    /// [Hz]
    pub vertical_frequency: f64,
    /// [rad]
    pub vertical_phase: f64,
    /// [V]
    pub vertical_amplitude: f64,
    /// [Hz]
    pub horizontal_frequency: f64,
    /// [rad]
    pub horizontal_phase: f64,
    /// [V]
    pub horizontal_amplitude: f64,
}

impl LissajousConfig {
    /// Catalog defaults: 1 Hz, zero phase, 100 V on both axes.
    pub fn defaults(params: &SystemParameters) -> Self {
        let signal = &params.signal;
        Self {
            vertical_frequency: signal.frequency.default,
            vertical_phase: signal.phase.default,
            vertical_amplitude: signal.vertical_amplitude_default,
            horizontal_frequency: signal.frequency.default,
            horizontal_phase: signal.phase.default,
            horizontal_amplitude: signal.horizontal_amplitude_default,
        }
    }

    /// Field value by name.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::VerticalFrequency => Some(self.vertical_frequency),
            Field::VerticalPhase => Some(self.vertical_phase),
            Field::VerticalAmplitude => Some(self.vertical_amplitude),
            Field::HorizontalFrequency => Some(self.horizontal_frequency),
            Field::HorizontalPhase => Some(self.horizontal_phase),
            Field::HorizontalAmplitude => Some(self.horizontal_amplitude),
            _ => None,
        }
    }

    fn slot_mut(&mut self, field: Field) -> Option<&mut f64> {
        match field {
            Field::VerticalFrequency => Some(&mut self.vertical_frequency),
            Field::VerticalPhase => Some(&mut self.vertical_phase),
            Field::VerticalAmplitude => Some(&mut self.vertical_amplitude),
            Field::HorizontalFrequency => Some(&mut self.horizontal_frequency),
            Field::HorizontalPhase => Some(&mut self.horizontal_phase),
            Field::HorizontalAmplitude => Some(&mut self.horizontal_amplitude),
            _ => None,
        }
    }

    /// Check all six fields, reporting the first violation in canonical order.
    pub fn validate(&self, params: &SystemParameters) -> CrtResult<()> {
        for field in Field::LISSAJOUS {
            if let Some(value) = self.get(field) {
                params.check(field, value)?;
            }
        }
        Ok(())
    }
}

impl Default for LissajousConfig {
    fn default() -> Self {
        Self::defaults(&SystemParameters::STANDARD)
    }
}

/// Partial configuration: any subset of the six fields.
///
/// Deserializes from TOML/JSON maps where absent keys stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LissajousPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_phase: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_amplitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_phase: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_amplitude: Option<f64>,
}

impl LissajousPatch {
    /// Field value by name.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::VerticalFrequency => self.vertical_frequency,
            Field::VerticalPhase => self.vertical_phase,
            Field::VerticalAmplitude => self.vertical_amplitude,
            Field::HorizontalFrequency => self.horizontal_frequency,
            Field::HorizontalPhase => self.horizontal_phase,
            Field::HorizontalAmplitude => self.horizontal_amplitude,
            _ => None,
        }
    }

    /// `true` when no field is present.
    pub fn is_empty(&self) -> bool {
        Field::LISSAJOUS.iter().all(|f| self.get(*f).is_none())
    }
}

impl From<LissajousConfig> for LissajousPatch {
    fn from(config: LissajousConfig) -> Self {
        Self {
            vertical_frequency: Some(config.vertical_frequency),
            vertical_phase: Some(config.vertical_phase),
            vertical_amplitude: Some(config.vertical_amplitude),
            horizontal_frequency: Some(config.horizontal_frequency),
            horizontal_phase: Some(config.horizontal_phase),
            horizontal_amplitude: Some(config.horizontal_amplitude),
        }
    }
}

impl TryFrom<LissajousPatch> for LissajousConfig {
    type Error = CrtError;

    /// Assemble a full configuration. Ranges are not checked here.
    ///
    /// # Errors
    ///
    /// `CrtError::InvalidConfig` naming the first absent field.
    fn try_from(patch: LissajousPatch) -> CrtResult<Self> {
        let require = |field: Field| {
            patch
                .get(field)
                .ok_or(CrtError::InvalidConfig { missing_field: field })
        };
        Ok(Self {
            vertical_frequency: require(Field::VerticalFrequency)?,
            vertical_phase: require(Field::VerticalPhase)?,
            vertical_amplitude: require(Field::VerticalAmplitude)?,
            horizontal_frequency: require(Field::HorizontalFrequency)?,
            horizontal_phase: require(Field::HorizontalPhase)?,
            horizontal_amplitude: require(Field::HorizontalAmplitude)?,
        })
    }
}

// ─── Sampling ───────────────────────────────────────────────────────

/// Instantaneous deflection voltages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSample {
    /// [V]
    pub vertical_voltage: f64,
    /// [V]
    pub horizontal_voltage: f64,
    /// Evaluation time after normalization [s].
    pub time: f64,
}

#[inline]
fn sinusoid(amplitude: f64, frequency: f64, phase: f64, t: f64) -> f64 {
    amplitude * (TAU * frequency * t + phase).sin()
}

/// Evaluate an already-validated configuration at a normalized time.
fn evaluate(params: &SystemParameters, t: f64, config: &LissajousConfig) -> SignalSample {
    let vertical = sinusoid(
        config.vertical_amplitude,
        config.vertical_frequency,
        config.vertical_phase,
        t,
    );
    let horizontal = sinusoid(
        config.horizontal_amplitude,
        config.horizontal_frequency,
        config.horizontal_phase,
        t,
    );
    SignalSample {
        vertical_voltage: params.voltages.vertical.clamp(vertical),
        horizontal_voltage: params.voltages.horizontal.clamp(horizontal),
        time: t,
    }
}

/// `max(0, time)`; `NaN` and `+∞` are rejected.
fn normalize_time(time: f64) -> CrtResult<f64> {
    if time.is_nan() || time == f64::INFINITY {
        return Err(CrtError::OutOfRange {
            field: Field::Time,
            value: time,
            min: 0.0,
            max: f64::MAX,
        });
    }
    Ok(time.max(0.0))
}

/// Deflection voltages of `config` at `time` seconds.
///
/// Negative times evaluate at `t = 0`.
///
/// # Errors
///
/// `CrtError::OutOfRange` if any configuration field is out of range, or
/// if `time` is `NaN` or `+∞`.
pub fn sample(params: &SystemParameters, time: f64, config: &LissajousConfig) -> CrtResult<SignalSample> {
    config.validate(params)?;
    let t = normalize_time(time)?;
    Ok(evaluate(params, t, config))
}

// ─── Partial update ─────────────────────────────────────────────────

/// Apply the valid fields of `patch` over `current`.
///
/// Each present field is checked against its own range; invalid fields are
/// dropped individually and the previous value is kept. Never fails.
pub fn merge_update(
    params: &SystemParameters,
    current: &LissajousConfig,
    patch: &LissajousPatch,
) -> LissajousConfig {
    let mut merged = *current;
    for field in Field::LISSAJOUS {
        let Some(candidate) = patch.get(field) else {
            continue;
        };
        match params.check(field, candidate) {
            Ok(value) => {
                if let Some(slot) = merged.slot_mut(field) {
                    *slot = value;
                }
            }
            Err(e) => debug!(%field, "dropping Lissajous update: {e}"),
        }
    }
    merged
}

// ─── Sequences ──────────────────────────────────────────────────────

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceFrame {
    #[serde(flatten)]
    pub sample: SignalSample,
    /// Frame index, starting at 0.
    pub frame: usize,
    /// Duration of the whole sequence [s].
    pub total_duration: f64,
    pub frames_per_second: u32,
}

/// Lazy, finite sequence of frames at `t = k / fps`.
///
/// Every frame is a pure function of its index; cloning or
/// [`SignalSequence::restart`] replays the same frames.
#[derive(Debug, Clone)]
pub struct SignalSequence {
    params: SystemParameters,
    config: LissajousConfig,
    duration: f64,
    fps: u32,
    len: usize,
    next: usize,
}

impl SignalSequence {
    /// Total number of frames, `floor(duration · fps)`.
    pub fn frame_count(&self) -> usize {
        self.len
    }

    /// Frame `index`, or `None` past the end.
    pub fn frame(&self, index: usize) -> Option<SequenceFrame> {
        if index >= self.len {
            return None;
        }
        let t = index as f64 / f64::from(self.fps);
        Some(SequenceFrame {
            sample: evaluate(&self.params, t, &self.config),
            frame: index,
            total_duration: self.duration,
            frames_per_second: self.fps,
        })
    }

    /// Rewind to the first frame.
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for SignalSequence {
    type Item = SequenceFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frame(self.next)?;
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SignalSequence {}

/// Build the animation sequence of `config` over `duration_seconds`.
///
/// A negative duration yields an empty sequence.
///
/// # Errors
///
/// `CrtError::OutOfRange` for an invalid configuration, a zero frame rate
/// or a non-finite duration.
pub fn sequence(
    params: &SystemParameters,
    config: &LissajousConfig,
    duration_seconds: f64,
    frames_per_second: u32,
) -> CrtResult<SignalSequence> {
    config.validate(params)?;
    if !duration_seconds.is_finite() {
        return Err(CrtError::OutOfRange {
            field: Field::Duration,
            value: duration_seconds,
            min: 0.0,
            max: f64::MAX,
        });
    }
    if frames_per_second == 0 {
        return Err(CrtError::OutOfRange {
            field: Field::FramesPerSecond,
            value: 0.0,
            min: 1.0,
            max: f64::from(u32::MAX),
        });
    }

    let len = if duration_seconds > 0.0 {
        (duration_seconds * f64::from(frames_per_second)).floor() as usize
    } else {
        0
    };

    Ok(SignalSequence {
        params: *params,
        config: *config,
        duration: duration_seconds,
        fps: frames_per_second,
        len,
        next: 0,
    })
}

// ─── Periods ────────────────────────────────────────────────────────

fn check_frequencies(params: &SystemParameters, vertical: f64, horizontal: f64) -> CrtResult<()> {
    params.check(Field::VerticalFrequency, vertical)?;
    params.check(Field::HorizontalFrequency, horizontal)?;
    Ok(())
}

/// Coarse repetition period: `10 · max(1/fv, 1/fh)`.
///
/// This is a display heuristic, not the true period; see [`exact_period`].
pub fn period(params: &SystemParameters, vertical_frequency: f64, horizontal_frequency: f64) -> CrtResult<f64> {
    check_frequencies(params, vertical_frequency, horizontal_frequency)?;
    Ok(10.0 * (1.0 / vertical_frequency).max(1.0 / horizontal_frequency))
}

/// Frequency resolution used by [`exact_period`] [Hz].
pub const PERIOD_RESOLUTION_HZ: f64 = 1e-3;

/// Largest distance from the grid, in grid steps, still treated as on-grid.
/// Covers representation error of decimal inputs only.
const GRID_TOLERANCE_STEPS: f64 = 1e-9;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// True repetition period `1 / gcd(fv, fh)`.
///
/// Frequencies are mapped onto a 1 mHz grid. Returns `Ok(None)` when either
/// frequency is off the grid, i.e. the ratio has no small rational form and
/// the figure does not close within 1000 s.
pub fn exact_period(
    params: &SystemParameters,
    vertical_frequency: f64,
    horizontal_frequency: f64,
) -> CrtResult<Option<f64>> {
    check_frequencies(params, vertical_frequency, horizontal_frequency)?;

    let to_grid = |hz: f64| {
        let steps = hz / PERIOD_RESOLUTION_HZ;
        let rounded = steps.round();
        ((steps - rounded).abs() <= GRID_TOLERANCE_STEPS).then_some(rounded as u64)
    };
    let (Some(v), Some(h)) = (to_grid(vertical_frequency), to_grid(horizontal_frequency)) else {
        return Ok(None);
    };

    Ok(Some(1.0 / PERIOD_RESOLUTION_HZ / gcd(v, h) as f64))
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    const P: SystemParameters = SystemParameters::STANDARD;

    fn config(vf: f64, vp: f64, va: f64, hf: f64, hp: f64, ha: f64) -> LissajousConfig {
        LissajousConfig {
            vertical_frequency: vf,
            vertical_phase: vp,
            vertical_amplitude: va,
            horizontal_frequency: hf,
            horizontal_phase: hp,
            horizontal_amplitude: ha,
        }
    }

    #[test]
    fn zero_phase_starts_at_zero() {
        let s = sample(&P, 0.0, &config(3.0, 0.0, 150.0, 2.0, FRAC_PI_2, 80.0)).unwrap();
        assert_eq!(s.vertical_voltage, 0.0);
        assert!((s.horizontal_voltage - 80.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_period_reaches_amplitude() {
        let s = sample(&P, 0.25, &config(1.0, 0.0, 120.0, 1.0, 0.0, 60.0)).unwrap();
        assert!((s.vertical_voltage - 120.0).abs() < 1e-9);
        assert!((s.horizontal_voltage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn negative_time_is_clamped_to_zero() {
        let c = config(1.0, 0.3, 100.0, 2.0, 1.1, 100.0);
        let neg = sample(&P, -5.0, &c).unwrap();
        let zero = sample(&P, 0.0, &c).unwrap();
        assert_eq!(neg, zero);
        assert_eq!(neg.time, 0.0);
    }

    #[test]
    fn nan_time_rejected() {
        let err = sample(&P, f64::NAN, &LissajousConfig::default()).unwrap_err();
        assert_eq!(err.field(), Some(Field::Time));
        assert!(sample(&P, f64::NEG_INFINITY, &LissajousConfig::default()).is_ok());
    }

    #[test]
    fn full_amplitude_stays_in_range() {
        let c = config(1.0, 0.0, 200.0, 1.0, 0.0, 200.0);
        for k in 0..=100 {
            let s = sample(&P, k as f64 / 100.0, &c).unwrap();
            assert!(s.vertical_voltage.abs() <= 200.0);
            assert!(s.horizontal_voltage.abs() <= 200.0);
        }
    }

    #[test]
    fn out_of_range_fields_rejected_in_order() {
        let err = sample(&P, 0.0, &config(20.0, 7.0, 300.0, 1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.field(), Some(Field::VerticalFrequency));

        let err = sample(&P, 0.0, &config(1.0, 0.0, 100.0, 1.0, 2.0 * PI + 0.01, 0.0)).unwrap_err();
        assert_eq!(err.field(), Some(Field::HorizontalPhase));

        let err = sample(&P, 0.0, &config(1.0, 0.0, 100.0, 1.0, 0.0, 200.5)).unwrap_err();
        assert_eq!(err.field(), Some(Field::HorizontalAmplitude));
    }

    #[test]
    fn patch_assembly_reports_first_missing_field() {
        let patch = LissajousPatch {
            vertical_frequency: Some(1.0),
            vertical_phase: Some(0.0),
            horizontal_frequency: Some(1.0),
            ..Default::default()
        };
        let err = LissajousConfig::try_from(patch).unwrap_err();
        assert_eq!(
            err,
            CrtError::InvalidConfig {
                missing_field: Field::VerticalAmplitude
            }
        );
    }

    #[test]
    fn full_patch_assembles() {
        let c = config(2.0, 0.5, 50.0, 3.0, 1.5, 75.0);
        assert_eq!(LissajousConfig::try_from(LissajousPatch::from(c)).unwrap(), c);
    }

    #[test]
    fn merge_keeps_invalid_fields() {
        let current = LissajousConfig::default();
        let patch = LissajousPatch {
            vertical_frequency: Some(0.01),
            horizontal_frequency: Some(4.0),
            vertical_amplitude: Some(-3.0),
            horizontal_phase: Some(PI),
            ..Default::default()
        };
        let merged = merge_update(&P, &current, &patch);
        assert_eq!(merged.vertical_frequency, current.vertical_frequency);
        assert_eq!(merged.vertical_amplitude, current.vertical_amplitude);
        assert_eq!(merged.horizontal_frequency, 4.0);
        assert_eq!(merged.horizontal_phase, PI);
    }

    #[test]
    fn merge_with_empty_patch_is_identity() {
        let current = config(7.0, 1.0, 10.0, 0.5, 6.0, 190.0);
        assert!(LissajousPatch::default().is_empty());
        assert_eq!(merge_update(&P, &current, &LissajousPatch::default()), current);
    }

    #[test]
    fn sequence_frame_count_and_times() {
        let seq = sequence(&P, &LissajousConfig::default(), 2.0, 10).unwrap();
        assert_eq!(seq.len(), 20);
        let frames: Vec<_> = seq.collect();
        assert_eq!(frames.len(), 20);
        for (k, f) in frames.iter().enumerate() {
            assert_eq!(f.frame, k);
            assert_eq!(f.sample.time, k as f64 / 10.0);
            assert_eq!(f.total_duration, 2.0);
            assert_eq!(f.frames_per_second, 10);
        }
    }

    #[test]
    fn sequence_is_restartable() {
        let mut seq = sequence(&P, &LissajousConfig::default(), 1.0, 4).unwrap();
        let first: Vec<_> = seq.by_ref().collect();
        assert!(seq.next().is_none());
        seq.restart();
        let second: Vec<_> = seq.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn sequence_rejects_bad_inputs() {
        let c = LissajousConfig::default();
        assert_eq!(
            sequence(&P, &c, 1.0, 0).unwrap_err().field(),
            Some(Field::FramesPerSecond)
        );
        assert_eq!(
            sequence(&P, &c, f64::INFINITY, 30).unwrap_err().field(),
            Some(Field::Duration)
        );
        assert_eq!(sequence(&P, &c, -1.0, 30).unwrap().frame_count(), 0);
    }

    #[test]
    fn coarse_period() {
        assert_eq!(period(&P, 2.0, 1.0).unwrap(), 10.0);
        assert_eq!(period(&P, 4.0, 5.0).unwrap(), 2.5);
        assert!(period(&P, 0.0, 1.0).is_err());
    }

    #[test]
    fn exact_period_of_rational_ratios() {
        assert_eq!(exact_period(&P, 2.0, 1.0).unwrap(), Some(1.0));
        assert_eq!(exact_period(&P, 3.0, 2.0).unwrap(), Some(1.0));
        assert_eq!(exact_period(&P, 1.5, 1.0).unwrap(), Some(2.0));
        assert_eq!(exact_period(&P, 0.1, 10.0).unwrap(), Some(10.0));
    }

    #[test]
    fn exact_period_off_grid_is_none() {
        assert_eq!(exact_period(&P, 1.234_567_8, 1.0).unwrap(), None);
    }

    #[test]
    fn exact_period_rejects_sub_step_offsets() {
        // Half a micro-hertz above 1 Hz: 0.0005 grid steps.
        assert_eq!(exact_period(&P, 1.000_000_5, 1.0).unwrap(), None);
        assert_eq!(exact_period(&P, 1.0, 9.999_5).unwrap(), None);
        assert_eq!(exact_period(&P, 1.001, 1.0).unwrap(), Some(1000.0));
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(1500, 1000), 500);
        assert_eq!(gcd(7, 13), 1);
    }
}
