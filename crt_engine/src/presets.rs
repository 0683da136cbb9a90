//! Fixed catalog of named Lissajous figures.
//!
//! Identifiers are stable keys used by configuration files and the CLI.
//! Every preset satisfies the validation rules of [`crate::signal::sample`].

use core::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

use serde::Serialize;

use crt::error::{CrtError, CrtResult};
use crt::params::{Range, SystemParameters};

use crate::signal::LissajousConfig;

/// A named, read-only Lissajous configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LissajousPreset {
    /// Lookup key.
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub config: LissajousConfig,
    /// Vertical:horizontal frequency ratio label.
    pub ratio: Option<&'static str>,
}

const AMPLITUDE: f64 = 100.0;

const fn figure(vertical_frequency: f64, horizontal_frequency: f64, horizontal_phase: f64) -> LissajousConfig {
    LissajousConfig {
        vertical_frequency,
        vertical_phase: 0.0,
        vertical_amplitude: AMPLITUDE,
        horizontal_frequency,
        horizontal_phase,
        horizontal_amplitude: AMPLITUDE,
    }
}

/// The preset table, in display order.
pub static PRESETS: [LissajousPreset; 10] = [
    LissajousPreset {
        id: "circulo",
        display_name: "Circle",
        description: "Equal frequencies, 90° phase offset",
        config: figure(1.0, 1.0, FRAC_PI_2),
        ratio: Some("1:1"),
    },
    LissajousPreset {
        id: "linea_diagonal",
        display_name: "Diagonal line",
        description: "Equal frequencies, no phase offset",
        config: figure(1.0, 1.0, 0.0),
        ratio: Some("1:1"),
    },
    LissajousPreset {
        id: "elipse",
        display_name: "Ellipse",
        description: "Equal frequencies, 45° phase offset",
        config: figure(1.0, 1.0, FRAC_PI_4),
        ratio: Some("1:1"),
    },
    LissajousPreset {
        id: "elipse_30",
        display_name: "Narrow ellipse",
        description: "Equal frequencies, 30° phase offset",
        config: figure(1.0, 1.0, FRAC_PI_6),
        ratio: Some("1:1"),
    },
    LissajousPreset {
        id: "elipse_60",
        display_name: "Wide ellipse",
        description: "Equal frequencies, 60° phase offset",
        config: figure(1.0, 1.0, FRAC_PI_3),
        ratio: Some("1:1"),
    },
    LissajousPreset {
        id: "ocho",
        display_name: "Figure eight",
        description: "Frequency ratio 2:1",
        config: figure(2.0, 1.0, 0.0),
        ratio: Some("2:1"),
    },
    LissajousPreset {
        id: "ocho_vertical",
        display_name: "Sideways figure eight",
        description: "Frequency ratio 1:2",
        config: figure(1.0, 2.0, 0.0),
        ratio: Some("1:2"),
    },
    LissajousPreset {
        id: "trebol",
        display_name: "Trefoil",
        description: "Frequency ratio 3:1",
        config: figure(3.0, 1.0, 0.0),
        ratio: Some("3:1"),
    },
    LissajousPreset {
        id: "trebol_vertical",
        display_name: "Sideways trefoil",
        description: "Frequency ratio 1:3",
        config: figure(1.0, 3.0, 0.0),
        ratio: Some("1:3"),
    },
    LissajousPreset {
        id: "mariposa",
        display_name: "Butterfly",
        description: "Frequency ratio 3:2 with 30° phase offset",
        config: figure(3.0, 2.0, FRAC_PI_6),
        ratio: Some("3:2"),
    },
];

/// Look up a preset by identifier.
pub fn find_preset(id: &str) -> Option<&'static LissajousPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// Configuration of preset `id`.
///
/// # Errors
///
/// `CrtError::NotFound` for an unknown identifier.
pub fn apply_preset(id: &str) -> CrtResult<LissajousConfig> {
    find_preset(id)
        .map(|p| p.config)
        .ok_or_else(|| CrtError::NotFound {
            preset_id: id.to_string(),
        })
}

// ─── Info record ────────────────────────────────────────────────────

/// A range with its display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitRange {
    #[serde(flatten)]
    pub range: Range,
    pub unit: &'static str,
}

/// Signal parameter ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalRangeInfo {
    pub frequency: UnitRange,
    pub phase: UnitRange,
    pub vertical_amplitude: UnitRange,
    pub horizontal_amplitude: UnitRange,
}

/// Everything a front end needs to build Lissajous controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LissajousInfo {
    pub ranges: SignalRangeInfo,
    pub presets: &'static [LissajousPreset],
    pub default_config: LissajousConfig,
}

pub fn lissajous_info(params: &SystemParameters) -> LissajousInfo {
    LissajousInfo {
        ranges: SignalRangeInfo {
            frequency: UnitRange {
                range: params.signal.frequency,
                unit: "Hz",
            },
            phase: UnitRange {
                range: params.signal.phase,
                unit: "rad",
            },
            vertical_amplitude: UnitRange {
                range: params.vertical_amplitude_range(),
                unit: "V",
            },
            horizontal_amplitude: UnitRange {
                range: params.horizontal_amplitude_range(),
                unit: "V",
            },
        },
        presets: &PRESETS,
        default_config: LissajousConfig::defaults(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PRESETS.len());
    }

    #[test]
    fn every_preset_is_valid() {
        let params = SystemParameters::STANDARD;
        for preset in &PRESETS {
            assert!(
                preset.config.validate(&params).is_ok(),
                "preset {} fails validation",
                preset.id
            );
        }
    }

    #[test]
    fn circle_has_quarter_turn_offset() {
        let c = apply_preset("circulo").unwrap();
        assert_eq!(c.vertical_amplitude, c.horizontal_amplitude);
        assert!((c.horizontal_phase - c.vertical_phase - FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn unknown_preset_not_found() {
        assert_eq!(
            apply_preset("espiral"),
            Err(CrtError::NotFound {
                preset_id: "espiral".to_string()
            })
        );
    }

    #[test]
    fn ratio_labels_match_frequencies() {
        for preset in &PRESETS {
            let Some(ratio) = preset.ratio else { continue };
            let (v, h) = ratio.split_once(':').unwrap();
            assert_eq!(v.parse::<f64>().unwrap(), preset.config.vertical_frequency);
            assert_eq!(h.parse::<f64>().unwrap(), preset.config.horizontal_frequency);
        }
    }

    #[test]
    fn info_carries_catalog() {
        let info = lissajous_info(&SystemParameters::STANDARD);
        assert_eq!(info.presets.len(), PRESETS.len());
        assert_eq!(info.ranges.vertical_amplitude.range.max, 200.0);
        assert_eq!(info.default_config, LissajousConfig::default());
    }
}
