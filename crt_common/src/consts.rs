//! Fixed constants of the simulated CRT.
//!
//! Single source of truth for every physical constant, geometric dimension
//! and user-adjustable range. [`crate::params::SystemParameters::STANDARD`]
//! is assembled from these values.
//!
//! Lengths are in metres, voltages in volts, times in seconds.

use core::f64::consts::TAU;
use static_assertions::const_assert;

// ─── Universal Constants ────────────────────────────────────────────

/// Elementary charge magnitude [C].
pub const ELECTRON_CHARGE: f64 = 1.602176634e-19;

/// Electron rest mass [kg].
pub const ELECTRON_MASS: f64 = 9.1093837015e-31;

// ─── Screen ─────────────────────────────────────────────────────────

/// Side of the square screen [m].
pub const SCREEN_SIZE: f64 = 0.20;
/// Screen width [m].
pub const SCREEN_WIDTH: f64 = SCREEN_SIZE;
/// Screen height [m].
pub const SCREEN_HEIGHT: f64 = SCREEN_SIZE;
/// Screen curvature radius [m]. Informational; impacts use planar coordinates.
pub const SCREEN_CURVATURE_RADIUS: f64 = 0.30;

// ─── Deflection Plates ──────────────────────────────────────────────

/// Vertical-deflection plate length along the tube axis [m].
pub const VERTICAL_PLATE_WIDTH: f64 = 0.04;
/// Vertical-deflection plate height [m].
pub const VERTICAL_PLATE_HEIGHT: f64 = 0.06;
/// Gap between the vertical-deflection plates [m].
pub const VERTICAL_PLATE_SEPARATION: f64 = 0.015;

/// Horizontal-deflection plate length along the tube axis [m].
pub const HORIZONTAL_PLATE_WIDTH: f64 = 0.06;
/// Horizontal-deflection plate height [m].
pub const HORIZONTAL_PLATE_HEIGHT: f64 = 0.04;
/// Gap between the horizontal-deflection plates [m].
pub const HORIZONTAL_PLATE_SEPARATION: f64 = 0.015;

// ─── Tube Distances ─────────────────────────────────────────────────

/// Electron gun to vertical plates [m].
pub const GUN_TO_VERTICAL_PLATES: f64 = 0.05;
/// Vertical plates to horizontal plates [m].
pub const VERTICAL_TO_HORIZONTAL_PLATES: f64 = 0.03;
/// Horizontal plates to screen [m].
pub const HORIZONTAL_PLATES_TO_SCREEN: f64 = 0.15;
/// Sum of the three field-free gaps, plate lengths excluded [m].
pub const GUN_TO_SCREEN: f64 =
    GUN_TO_VERTICAL_PLATES + VERTICAL_TO_HORIZONTAL_PLATES + HORIZONTAL_PLATES_TO_SCREEN;

// ─── User-Controllable Voltages ─────────────────────────────────────

pub const ACCELERATION_VOLTAGE_MIN: f64 = 500.0;
pub const ACCELERATION_VOLTAGE_MAX: f64 = 5000.0;
pub const ACCELERATION_VOLTAGE_DEFAULT: f64 = 2000.0;

/// Negative values deflect downwards.
pub const VERTICAL_VOLTAGE_MIN: f64 = -200.0;
pub const VERTICAL_VOLTAGE_MAX: f64 = 200.0;
pub const VERTICAL_VOLTAGE_DEFAULT: f64 = 0.0;

/// Negative values deflect to the left.
pub const HORIZONTAL_VOLTAGE_MIN: f64 = -200.0;
pub const HORIZONTAL_VOLTAGE_MAX: f64 = 200.0;
pub const HORIZONTAL_VOLTAGE_DEFAULT: f64 = 0.0;

// ─── Simulation ─────────────────────────────────────────────────────

/// Time a spot stays lit on the phosphor [s].
pub const PERSISTENCE_TIME_MIN: f64 = 0.1;
pub const PERSISTENCE_TIME_MAX: f64 = 5.0;
pub const PERSISTENCE_TIME_DEFAULT: f64 = 1.0;

/// Published calculation resolution [s]. The engine is closed-form and never steps.
pub const CALCULATION_TIME_STEP: f64 = 1e-9;

// ─── Lissajous Signals ──────────────────────────────────────────────

/// Sinusoid frequency range [Hz].
pub const FREQUENCY_MIN: f64 = 0.1;
pub const FREQUENCY_MAX: f64 = 10.0;
pub const FREQUENCY_DEFAULT: f64 = 1.0;

/// Sinusoid phase range [rad].
pub const PHASE_MIN: f64 = 0.0;
pub const PHASE_MAX: f64 = TAU;
pub const PHASE_DEFAULT: f64 = 0.0;

/// Default sinusoid amplitudes [V].
pub const VERTICAL_AMPLITUDE_DEFAULT: f64 = 100.0;
pub const HORIZONTAL_AMPLITUDE_DEFAULT: f64 = 100.0;

// ─── Compile-time consistency ───────────────────────────────────────

const_assert!(ACCELERATION_VOLTAGE_MIN > 0.0);
const_assert!(ACCELERATION_VOLTAGE_MIN < ACCELERATION_VOLTAGE_MAX);
const_assert!(ACCELERATION_VOLTAGE_DEFAULT >= ACCELERATION_VOLTAGE_MIN);
const_assert!(ACCELERATION_VOLTAGE_DEFAULT <= ACCELERATION_VOLTAGE_MAX);
const_assert!(VERTICAL_VOLTAGE_MIN < 0.0 && VERTICAL_VOLTAGE_MAX > 0.0);
const_assert!(HORIZONTAL_VOLTAGE_MIN < 0.0 && HORIZONTAL_VOLTAGE_MAX > 0.0);
const_assert!(PERSISTENCE_TIME_MIN < PERSISTENCE_TIME_DEFAULT);
const_assert!(PERSISTENCE_TIME_DEFAULT < PERSISTENCE_TIME_MAX);
const_assert!(FREQUENCY_MIN > 0.0 && FREQUENCY_MIN < FREQUENCY_MAX);
const_assert!(VERTICAL_AMPLITUDE_DEFAULT <= VERTICAL_VOLTAGE_MAX);
const_assert!(HORIZONTAL_AMPLITUDE_DEFAULT <= HORIZONTAL_VOLTAGE_MAX);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(ELECTRON_CHARGE > 0.0);
        assert!(ELECTRON_MASS > 0.0);
        assert!(VERTICAL_PLATE_SEPARATION > 0.0);
        assert!(HORIZONTAL_PLATE_SEPARATION > 0.0);
        assert!(SCREEN_WIDTH > 0.0 && SCREEN_HEIGHT > 0.0);
    }

    #[test]
    fn gun_to_screen_is_sum_of_gaps() {
        assert!((GUN_TO_SCREEN - 0.23).abs() < 1e-12);
    }

    #[test]
    fn default_phase_inside_range() {
        assert!((PHASE_MIN..=PHASE_MAX).contains(&PHASE_DEFAULT));
        assert!((FREQUENCY_MIN..=FREQUENCY_MAX).contains(&FREQUENCY_DEFAULT));
    }
}
