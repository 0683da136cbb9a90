//! Session behaviour tests.
//!
//! Mode transitions, all-or-nothing voltage updates, live frames and
//! sessions seeded from configuration files.

use std::fs;
use std::time::{Duration, Instant};

use crt_common::config::{ConfigError, ConfigLoader};
use crt_common::error::{CrtError, Field};
use crt_common::params::SystemParameters;
use crt_engine::{LissajousPatch, apply_preset, sample};
use crt_sim::config::SimConfig;
use crt_sim::session::{Mode, Session, SessionError, VoltagePatch};
use tempfile::TempDir;

const P: SystemParameters = SystemParameters::STANDARD;

#[test]
fn voltage_update_switches_to_manual() {
    let mut session = Session::default();
    session.apply_preset("ocho").unwrap();
    assert_eq!(session.mode(), Mode::Lissajous);

    let impact = session
        .update_voltages(&VoltagePatch {
            vertical_voltage: Some(200.0),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(session.mode(), Mode::Manual);
    assert!((impact.position_y - 0.034_666_666_666_666_67).abs() < 1e-9);
    assert_eq!(session.voltages().acceleration_voltage, 2000.0);
    assert_eq!(session.impact().unwrap(), impact);
}

#[test]
fn persistence_validated_with_voltages() {
    let mut session = Session::default();
    let err = session
        .update_voltages(&VoltagePatch {
            acceleration_voltage: Some(3000.0),
            persistence_time: Some(9.0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Engine(CrtError::OutOfRange { field: Field::PersistenceTime, .. })
    ));
    assert_eq!(session.voltages().acceleration_voltage, 2000.0);
    assert_eq!(session.persistence_time(), 1.0);
}

#[test]
fn configure_lissajous_merges_and_drops_invalid() {
    let mut session = Session::default();
    let config = session.configure_lissajous(&LissajousPatch {
        vertical_frequency: Some(3.0),
        horizontal_amplitude: Some(500.0),
        ..Default::default()
    });
    assert_eq!(session.mode(), Mode::Lissajous);
    assert_eq!(config.vertical_frequency, 3.0);
    assert_eq!(config.horizontal_amplitude, 100.0);
}

#[test]
fn unknown_preset_keeps_state() {
    let mut session = Session::default();
    let err = session.apply_preset("hexagon").unwrap_err();
    assert_eq!(
        err,
        SessionError::Engine(CrtError::NotFound {
            preset_id: "hexagon".to_string()
        })
    );
    assert_eq!(session.mode(), Mode::Manual);
}

#[test]
fn live_frame_follows_signal() {
    let mut session = Session::default();
    session.apply_preset("circulo").unwrap();

    let frame = session.live_frame(Duration::from_millis(250)).unwrap();
    let expected = sample(&P, 0.25, &apply_preset("circulo").unwrap()).unwrap();
    assert_eq!(frame.signal, expected);
    assert_eq!(frame.elapsed, 0.25);
    assert!(frame.impact.inside_screen);
    assert!(frame.impact.position_y > 0.0);

    // Instants before the origin clamp to the first frame.
    if let Some(earlier) = Instant::now().checked_sub(Duration::from_secs(5)) {
        let early = session.live_frame_at(earlier).unwrap();
        assert_eq!(early.elapsed, 0.0);
    }
}

#[test]
fn set_mode_manual_stops_live_frames() {
    let mut session = Session::default();
    session.apply_preset("elipse").unwrap();
    assert!(session.live_frame(Duration::ZERO).is_ok());
    session.set_mode(Mode::Manual);
    assert_eq!(
        session.live_frame(Duration::ZERO),
        Err(SessionError::NotInLissajousMode)
    );
}

#[test]
fn snapshot_serializes_mode_lowercase() {
    let mut session = Session::default();
    session.apply_preset("trebol").unwrap();
    let json = serde_json::to_value(session.snapshot().unwrap()).unwrap();
    assert_eq!(json["mode"], "lissajous");
    assert_eq!(json["lissajous"]["vertical_frequency"], 3.0);
    assert_eq!(json["impact"]["inside_screen"], true);
}

#[test]
fn session_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crt.toml");
    fs::write(
        &path,
        r#"
preset = "mariposa"

[shared]
service_name = "crt-lab"
log_level = "debug"

[beam]
acceleration_voltage = 1500.0
persistence_time = 2.5

[lissajous]
horizontal_amplitude = 60.0

[animation]
duration = 1.0
fps = 24
"#,
    )
    .unwrap();

    let config = SimConfig::load_validated(&path).unwrap();
    let session = Session::from_config(P, &config).unwrap();
    assert_eq!(session.mode(), Mode::Lissajous);
    assert_eq!(session.voltages().acceleration_voltage, 1500.0);
    assert_eq!(session.persistence_time(), 2.5);
    assert_eq!(session.lissajous().vertical_frequency, 3.0);
    assert_eq!(session.lissajous().horizontal_amplitude, 60.0);
    assert_eq!(config.animation.fps, 24);
}

#[test]
fn invalid_config_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crt.toml");
    fs::write(
        &path,
        r#"
[shared]
service_name = "crt-lab"

[beam]
vertical_voltage = 350.0
"#,
    )
    .unwrap();

    let err = SimConfig::load_validated(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("vertical_voltage")));
}

#[test]
fn reselecting_lissajous_restarts_animation() {
    let mut session = Session::default();
    session.apply_preset("circulo").unwrap();
    std::thread::sleep(Duration::from_millis(60));
    let before = session.live_frame_at(Instant::now()).unwrap();
    assert!(before.elapsed >= 0.06);

    session.set_mode(Mode::Lissajous);
    let after = session.live_frame_at(Instant::now()).unwrap();
    assert!(after.elapsed < 0.05);
    assert_eq!(session.mode(), Mode::Lissajous);
}

#[test]
fn snapshot_reports_elapsed_time() {
    let mut session = Session::new(P);
    assert_eq!(*session.params(), P);

    let later = Instant::now() + Duration::from_secs(3);
    assert_eq!(session.snapshot_at(later).unwrap().elapsed, 0.0);

    session.apply_preset("ocho").unwrap();
    let snap = session.snapshot_at(Instant::now() + Duration::from_secs(3)).unwrap();
    assert_eq!(snap.mode, Mode::Lissajous);
    assert!(snap.elapsed >= 3.0 && snap.elapsed < 3.5);

    let json = serde_json::to_value(session.snapshot().unwrap()).unwrap();
    assert!(json["elapsed"].as_f64().unwrap() >= 0.0);
}
