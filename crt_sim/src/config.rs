//! Simulator configuration file.
//!
//! All sections are optional except `[shared]`; missing values fall back to
//! the catalog defaults of the standard tube.

use crt_common::prelude::*;
use crt_engine::{LissajousConfig, LissajousPatch, VoltageTriple, apply_preset, merge_update};
use serde::{Deserialize, Serialize};

const P: SystemParameters = SystemParameters::STANDARD;

// ─── Top-Level Config ───────────────────────────────────────────────

/// `crt_sim` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub shared: SharedConfig,

    /// Manual-mode beam settings.
    #[serde(default)]
    pub beam: BeamConfig,

    /// Preset applied before `[lissajous]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Partial Lissajous configuration layered over the preset or defaults.
    #[serde(default, skip_serializing_if = "LissajousPatch::is_empty")]
    pub lissajous: LissajousPatch,

    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::new("crt-sim"),
            beam: BeamConfig::default(),
            preset: None,
            lissajous: LissajousPatch::default(),
            animation: AnimationConfig::default(),
        }
    }
}

// ─── Sections ───────────────────────────────────────────────────────

/// `[beam]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeamConfig {
    /// [V]
    pub acceleration_voltage: f64,
    /// [V]
    pub vertical_voltage: f64,
    /// [V]
    pub horizontal_voltage: f64,
    /// Spot persistence [s].
    pub persistence_time: f64,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            acceleration_voltage: P.voltages.acceleration.default,
            vertical_voltage: P.voltages.vertical.default,
            horizontal_voltage: P.voltages.horizontal.default,
            persistence_time: P.persistence_time.default,
        }
    }
}

impl BeamConfig {
    pub fn voltages(&self) -> VoltageTriple {
        VoltageTriple::new(
            self.acceleration_voltage,
            self.vertical_voltage,
            self.horizontal_voltage,
        )
    }
}

/// `[animation]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Sequence length [s].
    pub duration: f64,
    /// Frame rate [frames/s].
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: 2.0,
            fps: 30,
        }
    }
}

// ─── Derived values ─────────────────────────────────────────────────

impl SimConfig {
    /// Initial Lissajous configuration: preset (or defaults), then the
    /// `[lissajous]` patch merged field by field.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` for an unknown preset.
    pub fn initial_lissajous(&self, params: &SystemParameters) -> Result<LissajousConfig, ConfigError> {
        let base = match &self.preset {
            Some(id) => apply_preset(id).map_err(|e| ConfigError::ValidationError(e.to_string()))?,
            None => LissajousConfig::defaults(params),
        };
        Ok(merge_update(params, &base, &self.lissajous))
    }
}

impl Validate for SimConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let invalid = |e: CrtError| ConfigError::ValidationError(e.to_string());

        self.beam.voltages().validate(&P).map_err(invalid)?;
        P.check(Field::PersistenceTime, self.beam.persistence_time)
            .map_err(invalid)?;

        // Patch fields are checked strictly here; at runtime they are dropped.
        for field in Field::LISSAJOUS {
            if let Some(value) = self.lissajous.get(field) {
                P.check(field, value).map_err(invalid)?;
            }
        }
        self.initial_lissajous(&P)?;

        if !self.animation.duration.is_finite() || self.animation.duration < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "animation.duration must be finite and non-negative, got {}",
                self.animation.duration
            )));
        }
        if self.animation.fps == 0 {
            return Err(ConfigError::ValidationError(
                "animation.fps must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_uses_catalog_defaults() {
        let config = SimConfig::from_toml("[shared]\nservice_name = \"crt-sim\"\n").unwrap();
        assert_eq!(config.beam, BeamConfig::default());
        assert_eq!(config.beam.acceleration_voltage, 2000.0);
        assert_eq!(config.animation.fps, 30);
        assert!(config.preset.is_none());
        assert!(config.lissajous.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn preset_then_patch() {
        let config = SimConfig::from_toml(
            r#"
preset = "ocho"

[shared]
service_name = "crt-sim"

[lissajous]
vertical_amplitude = 50.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        let lissajous = config.initial_lissajous(&P).unwrap();
        assert_eq!(lissajous.vertical_frequency, 2.0);
        assert_eq!(lissajous.horizontal_frequency, 1.0);
        assert_eq!(lissajous.vertical_amplitude, 50.0);
    }

    #[test]
    fn out_of_range_beam_rejected() {
        let mut config = SimConfig::default();
        config.beam.acceleration_voltage = 100.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("acceleration_voltage")));
    }

    #[test]
    fn unknown_preset_rejected() {
        let config = SimConfig {
            preset: Some("hexagon".to_string()),
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn bad_animation_rejected() {
        let mut config = SimConfig::default();
        config.animation.fps = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.animation.duration = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = SimConfig::from_toml(
            "[shared]\nservice_name = \"x\"\n[beam]\nfocus_voltage = 3.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
