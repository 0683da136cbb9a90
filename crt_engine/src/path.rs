//! Beam path sampled along the tube axis.
//!
//! Uses the same stage kinematics as [`crate::trajectory`], evaluated at
//! evenly spaced axial positions inside each stage, so the last point of the
//! path is exactly the screen impact. Time is measured from the gun exit and
//! therefore includes the gun-to-plates drift that the impact flight time
//! leaves out.

use serde::{Deserialize, Serialize};

use crt::error::{CrtError, CrtResult, Field};
use crt::params::SystemParameters;

use crate::trajectory::{VoltageTriple, drift, initial_speed, plate_transit};

/// Tube section a path point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamStage {
    GunDrift,
    VerticalPlates,
    InterPlateDrift,
    HorizontalPlates,
    FreeFlight,
}

impl BeamStage {
    /// All stages in flight order.
    pub const ALL: [BeamStage; 5] = [
        BeamStage::GunDrift,
        BeamStage::VerticalPlates,
        BeamStage::InterPlateDrift,
        BeamStage::HorizontalPlates,
        BeamStage::FreeFlight,
    ];
}

/// One sampled point of the beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub stage: BeamStage,
    /// Distance from the gun along the tube axis [m].
    pub axial: f64,
    /// Horizontal displacement [m].
    pub x: f64,
    /// Vertical displacement [m].
    pub y: f64,
    /// Time since gun exit [s].
    pub time: f64,
}

/// Minimum points per stage: entry and exit.
pub const MIN_POINTS_PER_STAGE: usize = 2;

/// State at a stage boundary.
#[derive(Debug, Clone, Copy)]
struct Entry {
    axial: f64,
    x: f64,
    y: f64,
    time: f64,
}

/// Sample the beam path from the gun to the screen.
///
/// Each stage contributes `points_per_stage` points including its entry
/// point; one final point is appended at the screen. The path therefore has
/// `5 · points_per_stage + 1` points.
///
/// # Errors
///
/// `CrtError::OutOfRange` for an invalid voltage, or when
/// `points_per_stage < 2`.
pub fn beam_path(
    params: &SystemParameters,
    voltages: &VoltageTriple,
    points_per_stage: usize,
) -> CrtResult<Vec<PathPoint>> {
    voltages.validate(params)?;
    if points_per_stage < MIN_POINTS_PER_STAGE {
        return Err(CrtError::OutOfRange {
            field: Field::PointsPerStage,
            value: points_per_stage as f64,
            min: MIN_POINTS_PER_STAGE as f64,
            max: f64::MAX,
        });
    }

    let speed = initial_speed(params, voltages.acceleration_voltage);
    let vertical = plate_transit(params, &params.vertical_plates, voltages.vertical_voltage, speed);
    let horizontal = plate_transit(params, &params.horizontal_plates, voltages.horizontal_voltage, speed);
    let (vy, vx) = (vertical.exit_velocity, horizontal.exit_velocity);

    let lengths = [
        params.distances.gun_to_vertical_plates,
        params.vertical_plates.width,
        params.distances.vertical_to_horizontal_plates,
        params.horizontal_plates.width,
        params.distances.horizontal_plates_to_screen,
    ];

    let mut points = Vec::with_capacity(BeamStage::ALL.len() * points_per_stage + 1);
    let mut entry = Entry {
        axial: 0.0,
        x: 0.0,
        y: 0.0,
        time: 0.0,
    };

    for (stage, length) in BeamStage::ALL.into_iter().zip(lengths) {
        // Displacement (dx, dy) after travelling `s` metres into the stage.
        let offset = |s: f64| -> (f64, f64) {
            let t = s / speed;
            match stage {
                BeamStage::GunDrift => (0.0, 0.0),
                BeamStage::VerticalPlates => (0.0, 0.5 * vertical.acceleration * t * t),
                BeamStage::InterPlateDrift => (0.0, drift(vy, s, speed).1),
                BeamStage::HorizontalPlates => (0.5 * horizontal.acceleration * t * t, vy * t),
                BeamStage::FreeFlight => (vx * t, vy * t),
            }
        };

        for i in 0..points_per_stage {
            let s = length * i as f64 / points_per_stage as f64;
            let (dx, dy) = offset(s);
            points.push(PathPoint {
                stage,
                axial: entry.axial + s,
                x: entry.x + dx,
                y: entry.y + dy,
                time: entry.time + s / speed,
            });
        }

        let (dx, dy) = offset(length);
        entry = Entry {
            axial: entry.axial + length,
            x: entry.x + dx,
            y: entry.y + dy,
            time: entry.time + length / speed,
        };
    }

    points.push(PathPoint {
        stage: BeamStage::FreeFlight,
        axial: entry.axial,
        x: entry.x,
        y: entry.y,
        time: entry.time,
    });

    Ok(points)
}
