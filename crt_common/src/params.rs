//! Parameter catalog of the simulated CRT.
//!
//! [`SystemParameters`] bundles the tube's physical constants, geometry and
//! the published ranges of every user-adjustable quantity. The catalog is a
//! read-only value: engines borrow it, nothing ever mutates it.
//!
//! All range checks are closed-interval membership tests. `NaN` is never a
//! member of any range.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{CrtError, CrtResult, Field};

// ─── Range ──────────────────────────────────────────────────────────

/// Closed interval with a default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
    /// Default value, always inside `[min, max]`.
    pub default: f64,
}

impl Range {
    /// Create a range.
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Closed-interval membership test.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Clamp `value` into `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Return `value` unchanged if inside the range, otherwise an
    /// [`CrtError::OutOfRange`] naming `field`.
    pub fn check(&self, field: Field, value: f64) -> CrtResult<f64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(CrtError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Largest amplitude a zero-centred sinusoid may have while staying inside
    /// this range: `min(|min|, |max|)`.
    #[inline]
    pub fn symmetric_bound(&self) -> f64 {
        self.min.abs().min(self.max.abs())
    }
}

// ─── Geometry ───────────────────────────────────────────────────────

/// Screen dimensions [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pub width: f64,
    pub height: f64,
    pub curvature_radius: f64,
}

impl ScreenGeometry {
    /// Whether a point relative to the screen centre lands on the screen.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.width / 2.0 && y.abs() <= self.height / 2.0
    }
}

/// Pair of parallel deflection plates [m].
///
/// `width` is the plate length along the tube axis, which sets the transit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateGeometry {
    pub width: f64,
    pub height: f64,
    pub separation: f64,
}

/// Axial gaps between tube components [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeDistances {
    pub gun_to_vertical_plates: f64,
    pub vertical_to_horizontal_plates: f64,
    pub horizontal_plates_to_screen: f64,
}

impl TubeDistances {
    /// Sum of the field-free gaps; plate lengths are not included.
    #[inline]
    pub fn total(&self) -> f64 {
        self.gun_to_vertical_plates + self.vertical_to_horizontal_plates + self.horizontal_plates_to_screen
    }
}

// ─── Ranges ─────────────────────────────────────────────────────────

/// Ranges of the three controllable voltages [V].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageRanges {
    pub acceleration: Range,
    pub vertical: Range,
    pub horizontal: Range,
}

/// Ranges of the Lissajous sinusoid parameters.
///
/// Amplitude upper bounds are not stored: they derive from the deflection
/// voltage ranges so a sinusoid can never be configured past its plate limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRanges {
    /// Frequency [Hz].
    pub frequency: Range,
    /// Phase [rad].
    pub phase: Range,
    /// Default vertical amplitude [V].
    pub vertical_amplitude_default: f64,
    /// Default horizontal amplitude [V].
    pub horizontal_amplitude_default: f64,
}

// ─── SystemParameters ───────────────────────────────────────────────

/// Complete parameter set of the tube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemParameters {
    /// Elementary charge magnitude [C].
    pub electron_charge: f64,
    /// Electron mass [kg].
    pub electron_mass: f64,
    pub screen: ScreenGeometry,
    pub vertical_plates: PlateGeometry,
    pub horizontal_plates: PlateGeometry,
    pub distances: TubeDistances,
    pub voltages: VoltageRanges,
    /// Spot persistence [s].
    pub persistence_time: Range,
    /// Published calculation resolution [s].
    pub time_step: f64,
    pub signal: SignalRanges,
}

impl SystemParameters {
    /// The standard tube.
    pub const STANDARD: Self = Self {
        electron_charge: ELECTRON_CHARGE,
        electron_mass: ELECTRON_MASS,
        screen: ScreenGeometry {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            curvature_radius: SCREEN_CURVATURE_RADIUS,
        },
        vertical_plates: PlateGeometry {
            width: VERTICAL_PLATE_WIDTH,
            height: VERTICAL_PLATE_HEIGHT,
            separation: VERTICAL_PLATE_SEPARATION,
        },
        horizontal_plates: PlateGeometry {
            width: HORIZONTAL_PLATE_WIDTH,
            height: HORIZONTAL_PLATE_HEIGHT,
            separation: HORIZONTAL_PLATE_SEPARATION,
        },
        distances: TubeDistances {
            gun_to_vertical_plates: GUN_TO_VERTICAL_PLATES,
            vertical_to_horizontal_plates: VERTICAL_TO_HORIZONTAL_PLATES,
            horizontal_plates_to_screen: HORIZONTAL_PLATES_TO_SCREEN,
        },
        voltages: VoltageRanges {
            acceleration: Range::new(
                ACCELERATION_VOLTAGE_MIN,
                ACCELERATION_VOLTAGE_MAX,
                ACCELERATION_VOLTAGE_DEFAULT,
            ),
            vertical: Range::new(
                VERTICAL_VOLTAGE_MIN,
                VERTICAL_VOLTAGE_MAX,
                VERTICAL_VOLTAGE_DEFAULT,
            ),
            horizontal: Range::new(
                HORIZONTAL_VOLTAGE_MIN,
                HORIZONTAL_VOLTAGE_MAX,
                HORIZONTAL_VOLTAGE_DEFAULT,
            ),
        },
        persistence_time: Range::new(
            PERSISTENCE_TIME_MIN,
            PERSISTENCE_TIME_MAX,
            PERSISTENCE_TIME_DEFAULT,
        ),
        time_step: CALCULATION_TIME_STEP,
        signal: SignalRanges {
            frequency: Range::new(FREQUENCY_MIN, FREQUENCY_MAX, FREQUENCY_DEFAULT),
            phase: Range::new(PHASE_MIN, PHASE_MAX, PHASE_DEFAULT),
            vertical_amplitude_default: VERTICAL_AMPLITUDE_DEFAULT,
            horizontal_amplitude_default: HORIZONTAL_AMPLITUDE_DEFAULT,
        },
    };

    // ── Voltage predicates ──────────────────────────────────────

    #[inline]
    pub fn is_valid_acceleration_voltage(&self, volts: f64) -> bool {
        self.voltages.acceleration.contains(volts)
    }

    #[inline]
    pub fn is_valid_vertical_voltage(&self, volts: f64) -> bool {
        self.voltages.vertical.contains(volts)
    }

    #[inline]
    pub fn is_valid_horizontal_voltage(&self, volts: f64) -> bool {
        self.voltages.horizontal.contains(volts)
    }

    #[inline]
    pub fn is_valid_persistence_time(&self, seconds: f64) -> bool {
        self.persistence_time.contains(seconds)
    }

    // ── Signal predicates ───────────────────────────────────────

    #[inline]
    pub fn is_valid_frequency(&self, hz: f64) -> bool {
        self.signal.frequency.contains(hz)
    }

    #[inline]
    pub fn is_valid_phase(&self, radians: f64) -> bool {
        self.signal.phase.contains(radians)
    }

    #[inline]
    pub fn is_valid_vertical_amplitude(&self, volts: f64) -> bool {
        self.vertical_amplitude_range().contains(volts)
    }

    #[inline]
    pub fn is_valid_horizontal_amplitude(&self, volts: f64) -> bool {
        self.horizontal_amplitude_range().contains(volts)
    }

    /// Vertical amplitude range: `[0, min(|Vmin|, |Vmax|)]`.
    pub fn vertical_amplitude_range(&self) -> Range {
        Range::new(
            0.0,
            self.voltages.vertical.symmetric_bound(),
            self.signal.vertical_amplitude_default,
        )
    }

    /// Horizontal amplitude range: `[0, min(|Vmin|, |Vmax|)]`.
    pub fn horizontal_amplitude_range(&self) -> Range {
        Range::new(
            0.0,
            self.voltages.horizontal.symmetric_bound(),
            self.signal.horizontal_amplitude_default,
        )
    }

    /// Range governing `field`, or `None` for sequencing fields that have no
    /// catalog entry.
    pub fn range_of(&self, field: Field) -> Option<Range> {
        match field {
            Field::AccelerationVoltage => Some(self.voltages.acceleration),
            Field::VerticalVoltage => Some(self.voltages.vertical),
            Field::HorizontalVoltage => Some(self.voltages.horizontal),
            Field::PersistenceTime => Some(self.persistence_time),
            Field::VerticalFrequency | Field::HorizontalFrequency => Some(self.signal.frequency),
            Field::VerticalPhase | Field::HorizontalPhase => Some(self.signal.phase),
            Field::VerticalAmplitude => Some(self.vertical_amplitude_range()),
            Field::HorizontalAmplitude => Some(self.horizontal_amplitude_range()),
            Field::Time | Field::Duration | Field::FramesPerSecond | Field::PointsPerStage => None,
        }
    }

    /// Check `value` against the range of `field`.
    ///
    /// Fields without a catalog range are accepted as-is.
    pub fn check(&self, field: Field, value: f64) -> CrtResult<f64> {
        match self.range_of(field) {
            Some(range) => range.check(field, value),
            None => Ok(value),
        }
    }

    /// Gun to screen along the tube axis: the gaps plus both plate lengths [m].
    pub fn axial_length(&self) -> f64 {
        self.distances.total() + self.vertical_plates.width + self.horizontal_plates.width
    }

    /// Nested, serializable view of the catalog for presentation layers.
    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            screen: self.screen,
            vertical_plates: self.vertical_plates,
            horizontal_plates: self.horizontal_plates,
            distances: DistanceSnapshot {
                gun_to_vertical_plates: self.distances.gun_to_vertical_plates,
                vertical_to_horizontal_plates: self.distances.vertical_to_horizontal_plates,
                horizontal_plates_to_screen: self.distances.horizontal_plates_to_screen,
                total: self.distances.total(),
            },
            voltage_ranges: self.voltages,
            simulation: SimulationSnapshot {
                persistence: self.persistence_time,
                time_step: self.time_step,
            },
        }
    }
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ─── Snapshot ───────────────────────────────────────────────────────

/// Serializable catalog view returned by [`SystemParameters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSnapshot {
    pub screen: ScreenGeometry,
    pub vertical_plates: PlateGeometry,
    pub horizontal_plates: PlateGeometry,
    pub distances: DistanceSnapshot,
    pub voltage_ranges: VoltageRanges,
    pub simulation: SimulationSnapshot,
}

/// Tube gaps including the derived total [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceSnapshot {
    pub gun_to_vertical_plates: f64,
    pub vertical_to_horizontal_plates: f64,
    pub horizontal_plates_to_screen: f64,
    pub total: f64,
}

/// Simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub persistence: Range,
    pub time_step: f64,
}
