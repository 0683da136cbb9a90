//! # CRT Simulator Binary
//!
//! Command-line front end to the trajectory engine and the Lissajous
//! signal generator. Results are printed as JSON on stdout, logs go to
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! # Impact point for a given beam
//! crt_sim impact --acceleration 2000 --vertical 150 --horizontal -40
//!
//! # Two seconds of a preset at 10 fps, one JSON frame per line
//! crt_sim animate --preset ocho --duration 2 --fps 10
//!
//! # Run the session from a config file and follow the spot in real time
//! crt_sim --config crt.toml live --frames 90
//! ```

#![deny(warnings)]

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args as ClapArgs, Parser, Subcommand};
use crt_common::config::{ConfigError, ConfigLoader, LogLevel};
use crt_common::params::SystemParameters;
use crt_engine::path::beam_path;
use crt_engine::{LissajousPatch, exact_period, lissajous_info, period, sample, sequence};
use crt_sim::config::SimConfig;
use crt_sim::session::{Session, VoltagePatch};
use serde::Serialize;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

/// CRT Simulator - electron beam trajectories and Lissajous figures
#[derive(Parser, Debug)]
#[command(name = "crt_sim")]
#[command(version)]
#[command(about = "Electron beam trajectory and Lissajous figure simulator")]
#[command(long_about = None)]
struct Args {
    /// Simulator configuration file (TOML).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parameter catalog.
    Params,
    /// Print signal ranges, presets and the default figure.
    LissajousInfo,
    /// List the preset figures.
    Presets,
    /// Compute the screen impact of one electron.
    Impact(BeamArgs),
    /// Sample the beam path along the tube.
    Path {
        #[command(flatten)]
        beam: BeamArgs,
        /// Samples per stage (at least 2).
        #[arg(long, default_value_t = 16)]
        points: usize,
    },
    /// Deflection voltages of a figure at one instant.
    Sample {
        #[command(flatten)]
        figure: FigureArgs,
        /// Evaluation time [s].
        #[arg(short, long, allow_negative_numbers = true)]
        time: f64,
    },
    /// Frames of a figure, one JSON object per line.
    Animate {
        #[command(flatten)]
        figure: FigureArgs,
        /// Sequence length [s]; defaults to the configured animation.
        #[arg(long)]
        duration: Option<f64>,
        /// Frame rate; defaults to the configured animation.
        #[arg(long)]
        fps: Option<u32>,
    },
    /// Repetition period of a frequency pair.
    Period {
        /// Vertical frequency [Hz].
        #[arg(long)]
        vertical: f64,
        /// Horizontal frequency [Hz].
        #[arg(long)]
        horizontal: f64,
    },
    /// Follow the running figure in real time.
    Live {
        #[command(flatten)]
        figure: FigureArgs,
        /// Number of frames to emit.
        #[arg(long, default_value_t = 60)]
        frames: u32,
    },
}

/// Beam voltages; absent values keep the configured ones.
#[derive(ClapArgs, Debug)]
struct BeamArgs {
    /// Acceleration voltage [V].
    #[arg(long)]
    acceleration: Option<f64>,
    /// Vertical deflection voltage [V].
    #[arg(long, allow_negative_numbers = true)]
    vertical: Option<f64>,
    /// Horizontal deflection voltage [V].
    #[arg(long, allow_negative_numbers = true)]
    horizontal: Option<f64>,
}

impl BeamArgs {
    fn patch(&self) -> VoltagePatch {
        VoltagePatch {
            acceleration_voltage: self.acceleration,
            vertical_voltage: self.vertical,
            horizontal_voltage: self.horizontal,
            persistence_time: None,
        }
    }
}

/// Figure selection: optional preset, then per-field overrides.
#[derive(ClapArgs, Debug)]
struct FigureArgs {
    /// Preset identifier (see `presets`).
    #[arg(short, long)]
    preset: Option<String>,
    /// Vertical signal frequency [Hz].
    #[arg(long)]
    vertical_frequency: Option<f64>,
    /// Vertical signal phase [rad].
    #[arg(long)]
    vertical_phase: Option<f64>,
    /// Vertical signal amplitude [V].
    #[arg(long)]
    vertical_amplitude: Option<f64>,
    /// Horizontal signal frequency [Hz].
    #[arg(long)]
    horizontal_frequency: Option<f64>,
    /// Horizontal signal phase [rad].
    #[arg(long)]
    horizontal_phase: Option<f64>,
    /// Horizontal signal amplitude [V].
    #[arg(long)]
    horizontal_amplitude: Option<f64>,
}

impl FigureArgs {
    fn patch(&self) -> LissajousPatch {
        LissajousPatch {
            vertical_frequency: self.vertical_frequency,
            vertical_phase: self.vertical_phase,
            vertical_amplitude: self.vertical_amplitude,
            horizontal_frequency: self.horizontal_frequency,
            horizontal_phase: self.horizontal_phase,
            horizontal_amplitude: self.horizontal_amplitude,
        }
    }

    /// Put `session` into Lissajous mode with this figure.
    fn apply(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(id) = &self.preset {
            session.apply_preset(id)?;
        }
        session.configure_lissajous(&self.patch());
        Ok(())
    }
}

#[derive(Serialize)]
struct PeriodReport {
    vertical_frequency: f64,
    horizontal_frequency: f64,
    /// Display heuristic `10 · max(1/fv, 1/fh)` [s].
    period: f64,
    /// True period, when the ratio is rational on the 1 mHz grid [s].
    exact_period: Option<f64>,
}

fn main() {
    let args = Args::parse();

    let config = load_config(&args);
    let level = match (&config, args.verbose) {
        (_, true) => Level::DEBUG,
        (Ok(config), false) => config.shared.log_level.into(),
        (Err(_), false) => LogLevel::default().into(),
    };
    setup_tracing(level, args.json);

    let result = config
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(|config| run(&args.command, &config));
    if let Err(e) = result {
        error!("crt_sim failed: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<SimConfig, ConfigError> {
    match &args.config {
        Some(path) => SimConfig::load_validated(path),
        None => Ok(SimConfig::default()),
    }
}

fn run(command: &Command, config: &SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::from_config(SystemParameters::STANDARD, config)?;
    let params = *session.params();
    debug!(service = %config.shared.service_name, mode = ?session.mode(), "session ready");

    match command {
        Command::Params => emit(&params.snapshot()),
        Command::LissajousInfo => emit(&lissajous_info(&params)),
        Command::Presets => emit(&lissajous_info(&params).presets),
        Command::Impact(beam) => emit(&session.update_voltages(&beam.patch())?),
        Command::Path { beam, points } => {
            session.update_voltages(&beam.patch())?;
            emit(&beam_path(&params, &session.voltages(), *points)?)
        }
        Command::Sample { figure, time } => {
            figure.apply(&mut session)?;
            emit(&sample(&params, *time, session.lissajous())?)
        }
        Command::Animate {
            figure,
            duration,
            fps,
        } => {
            figure.apply(&mut session)?;
            let duration = duration.unwrap_or(config.animation.duration);
            let fps = fps.unwrap_or(config.animation.fps);
            let frames = sequence(&params, session.lissajous(), duration, fps)?;
            info!(frames = frames.frame_count(), duration, fps, "animating");
            let mut out = std::io::stdout().lock();
            for frame in frames {
                writeln!(out, "{}", serde_json::to_string(&frame)?)?;
            }
            Ok(())
        }
        Command::Period {
            vertical,
            horizontal,
        } => emit(&PeriodReport {
            vertical_frequency: *vertical,
            horizontal_frequency: *horizontal,
            period: period(&params, *vertical, *horizontal)?,
            exact_period: exact_period(&params, *vertical, *horizontal)?,
        }),
        Command::Live { figure, frames } => {
            figure.apply(&mut session)?;
            live(&session, config.animation.fps, *frames)
        }
    }
}

/// Emit `frames` live frames paced at `fps`.
fn live(session: &Session, fps: u32, frames: u32) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    info!(?interval, frames, "following live figure");
    let mut out = std::io::stdout().lock();
    for _ in 0..frames {
        let frame = session.live_frame_at(Instant::now())?;
        writeln!(out, "{}", serde_json::to_string(&frame)?)?;
        out.flush()?;
        std::thread::sleep(interval);
    }
    Ok(())
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Setup tracing subscriber on stderr.
fn setup_tracing(level: Level, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
