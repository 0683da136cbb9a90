//! Electron trajectory through the deflection system.
//!
//! Five physically sequential, closed-form stages:
//!
//! ```text
//!  gun ──accel──▶ │vertical plates│ ─drift─ │horizontal plates│ ──free flight──▶ screen
//!      stage 1         stage 2      stage 3        stage 4             stage 5
//! ```
//!
//! The axial speed stays at the post-acceleration speed `v0` throughout
//! (small-deflection approximation). Vertical deflection accumulates from
//! stage 2 onward, horizontal deflection from stage 4 onward.
//!
//! Sign convention: a positive plate voltage moves the beam towards the
//! positive axis; the charge magnitude is used in every force term.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crt::error::{CrtResult, Field};
use crt::params::{PlateGeometry, SystemParameters};

// ─── Inputs / Outputs ───────────────────────────────────────────────

/// The three controllable voltages [V].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageTriple {
    pub acceleration_voltage: f64,
    pub vertical_voltage: f64,
    pub horizontal_voltage: f64,
}

impl VoltageTriple {
    pub const fn new(acceleration_voltage: f64, vertical_voltage: f64, horizontal_voltage: f64) -> Self {
        Self {
            acceleration_voltage,
            vertical_voltage,
            horizontal_voltage,
        }
    }

    /// Default voltages of the catalog (undeflected beam).
    pub fn defaults(params: &SystemParameters) -> Self {
        Self::new(
            params.voltages.acceleration.default,
            params.voltages.vertical.default,
            params.voltages.horizontal.default,
        )
    }

    /// Validate all three voltages, reporting the first violation in
    /// acceleration → vertical → horizontal order.
    pub fn validate(&self, params: &SystemParameters) -> CrtResult<()> {
        params.voltages.acceleration.check(Field::AccelerationVoltage, self.acceleration_voltage)?;
        params.voltages.vertical.check(Field::VerticalVoltage, self.vertical_voltage)?;
        params.voltages.horizontal.check(Field::HorizontalVoltage, self.horizontal_voltage)?;
        Ok(())
    }
}

/// Screen impact of one electron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    /// Horizontal impact coordinate relative to screen centre [m].
    pub position_x: f64,
    /// Vertical impact coordinate relative to screen centre [m].
    pub position_y: f64,
    /// Whether the impact lies on the screen.
    pub inside_screen: bool,
    /// Axial speed after the gun [m/s].
    pub initial_velocity: f64,
    /// Transverse horizontal speed leaving the horizontal plates [m/s].
    pub final_velocity_x: f64,
    /// Transverse vertical speed leaving the vertical plates [m/s].
    pub final_velocity_y: f64,
    /// Time from entering the vertical plates to the screen [s].
    pub total_flight_time: f64,
}

// ─── Stage kinematics ───────────────────────────────────────────────

/// Motion across one pair of deflection plates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlateTransit {
    /// Time between the plates [s].
    pub transit_time: f64,
    /// Transverse acceleration between the plates [m/s²].
    pub acceleration: f64,
    /// Transverse displacement at the plate exit [m].
    pub deflection: f64,
    /// Transverse speed at the plate exit [m/s].
    pub exit_velocity: f64,
}

/// Stage 1: `v0 = sqrt(2·|q|·Va / m)`.
#[inline]
pub(crate) fn initial_speed(params: &SystemParameters, acceleration_voltage: f64) -> f64 {
    (2.0 * params.electron_charge * acceleration_voltage / params.electron_mass).sqrt()
}

/// Uniform field between plates: `E = V / d`, `a = |q|·E / m`.
#[inline]
pub(crate) fn transverse_acceleration(params: &SystemParameters, plates: &PlateGeometry, voltage: f64) -> f64 {
    let field = voltage / plates.separation;
    params.electron_charge * field / params.electron_mass
}

/// Stages 2 and 4: uniformly accelerated transverse motion from rest.
pub(crate) fn plate_transit(
    params: &SystemParameters,
    plates: &PlateGeometry,
    voltage: f64,
    speed: f64,
) -> PlateTransit {
    let transit_time = plates.width / speed;
    let acceleration = transverse_acceleration(params, plates, voltage);
    PlateTransit {
        transit_time,
        acceleration,
        deflection: 0.5 * acceleration * transit_time * transit_time,
        exit_velocity: acceleration * transit_time,
    }
}

/// Field-free drift over `distance` at axial `speed`: returns `(time, displacement)`.
#[inline]
pub(crate) fn drift(transverse_velocity: f64, distance: f64, speed: f64) -> (f64, f64) {
    let time = distance / speed;
    (time, transverse_velocity * time)
}

// ─── Public API ─────────────────────────────────────────────────────

/// Compute where the beam hits the screen.
///
/// # Errors
///
/// `CrtError::OutOfRange` naming the first voltage outside its catalog
/// range. No partial result is produced.
pub fn compute_impact(params: &SystemParameters, voltages: &VoltageTriple) -> CrtResult<TrajectoryResult> {
    voltages.validate(params)?;

    // ── Stage 1: acceleration ───────────────────────────────
    let speed = initial_speed(params, voltages.acceleration_voltage);

    // ── Stage 2: vertical plates ────────────────────────────
    let vertical = plate_transit(params, &params.vertical_plates, voltages.vertical_voltage, speed);
    let vy = vertical.exit_velocity;

    // ── Stage 3: inter-plate drift ──────────────────────────
    let (t_gap, y_gap) = drift(vy, params.distances.vertical_to_horizontal_plates, speed);

    // ── Stage 4: horizontal plates ──────────────────────────
    let horizontal = plate_transit(params, &params.horizontal_plates, voltages.horizontal_voltage, speed);
    let vx = horizontal.exit_velocity;
    let y_horizontal_plates = vy * horizontal.transit_time;

    // ── Stage 5: free flight ────────────────────────────────
    let (t_free, y_free) = drift(vy, params.distances.horizontal_plates_to_screen, speed);
    let x_free = vx * t_free;

    let position_x = horizontal.deflection + x_free;
    let position_y = vertical.deflection + y_gap + y_horizontal_plates + y_free;

    let result = TrajectoryResult {
        position_x,
        position_y,
        inside_screen: params.screen.contains(position_x, position_y),
        initial_velocity: speed,
        final_velocity_x: vx,
        final_velocity_y: vy,
        total_flight_time: vertical.transit_time + t_gap + horizontal.transit_time + t_free,
    };

    trace!(
        va = voltages.acceleration_voltage,
        vv = voltages.vertical_voltage,
        vh = voltages.horizontal_voltage,
        x = result.position_x,
        y = result.position_y,
        "impact computed"
    );

    Ok(result)
}

// ─── Tests ──────────────────────────────────────────────────────────
