//! Error taxonomy shared by the trajectory engine and the signal generator.
//!
//! Every failure is an explicit variant naming the offending field and the
//! violated bound. There is no sentinel result: a centred impact and an
//! invalid input can never be confused.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input field an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    AccelerationVoltage,
    VerticalVoltage,
    HorizontalVoltage,
    PersistenceTime,
    VerticalFrequency,
    VerticalPhase,
    VerticalAmplitude,
    HorizontalFrequency,
    HorizontalPhase,
    HorizontalAmplitude,
    /// Signal evaluation time [s].
    Time,
    /// Sequence duration [s].
    Duration,
    /// Sequence frame rate [frames/s].
    FramesPerSecond,
    /// Beam path sampling density.
    PointsPerStage,
}

impl Field {
    /// The six Lissajous configuration fields, in canonical order.
    pub const LISSAJOUS: [Field; 6] = [
        Field::VerticalFrequency,
        Field::VerticalPhase,
        Field::VerticalAmplitude,
        Field::HorizontalFrequency,
        Field::HorizontalPhase,
        Field::HorizontalAmplitude,
    ];

    /// Stable snake_case identifier, identical to the serde name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::AccelerationVoltage => "acceleration_voltage",
            Field::VerticalVoltage => "vertical_voltage",
            Field::HorizontalVoltage => "horizontal_voltage",
            Field::PersistenceTime => "persistence_time",
            Field::VerticalFrequency => "vertical_frequency",
            Field::VerticalPhase => "vertical_phase",
            Field::VerticalAmplitude => "vertical_amplitude",
            Field::HorizontalFrequency => "horizontal_frequency",
            Field::HorizontalPhase => "horizontal_phase",
            Field::HorizontalAmplitude => "horizontal_amplitude",
            Field::Time => "time",
            Field::Duration => "duration",
            Field::FramesPerSecond => "frames_per_second",
            Field::PointsPerStage => "points_per_stage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrtError {
    /// A voltage, frequency, phase, amplitude or sequencing parameter
    /// lies outside its closed interval.
    #[error("{field} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        /// Offending field.
        field: Field,
        /// Rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// A Lissajous configuration assembled from a partial map lacks a field.
    #[error("Invalid Lissajous configuration: missing field {missing_field}")]
    InvalidConfig {
        /// First missing field in canonical order.
        missing_field: Field,
    },

    /// Unknown preset identifier.
    #[error("Preset not found: {preset_id}")]
    NotFound {
        /// Requested identifier.
        preset_id: String,
    },
}

impl CrtError {
    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            CrtError::OutOfRange { field, .. } => Some(*field),
            CrtError::InvalidConfig { missing_field } => Some(*missing_field),
            CrtError::NotFound { .. } => None,
        }
    }
}

/// Result alias for engine operations.
pub type CrtResult<T> = Result<T, CrtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lissajous_field_names_are_prefixed_by_axis() {
        let (vertical, horizontal) = Field::LISSAJOUS.split_at(3);
        assert!(vertical.iter().all(|f| f.as_str().starts_with("vertical_")));
        assert!(horizontal.iter().all(|f| f.as_str().starts_with("horizontal_")));
        assert_eq!(Field::AccelerationVoltage.to_string(), "acceleration_voltage");
    }

    #[test]
    fn out_of_range_message_names_field_and_bounds() {
        let err = CrtError::OutOfRange {
            field: Field::VerticalVoltage,
            value: 250.0,
            min: -200.0,
            max: 200.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("vertical_voltage"));
        assert!(msg.contains("250"));
        assert!(msg.contains("-200"));
        assert_eq!(err.field(), Some(Field::VerticalVoltage));
    }

    #[test]
    fn not_found_has_no_field() {
        let err = CrtError::NotFound {
            preset_id: "hexagon".to_string(),
        };
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "Preset not found: hexagon");
    }
}
