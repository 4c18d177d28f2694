//! Configuration types for loading rolling-ball scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`TrackConfig`]       – where the waypoints come from and how finely to resample
//! - [`BallConfig`]        – physical constants of the ball and the rails
//! - [`IntegrationConfig`] – step size, run budget and run options
//! - [`OutputConfig`]      – optional output table
//! - [`ReferenceConfig`]   – optional experimental table to compare against
//! - [`ScenarioConfig`]    – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! track:
//!   shape: { kind: parabola, length: 1.362, height: 0.412, points: 21 }
//!   resample: 400           # default 10 * waypoints
//!
//! ball:
//!   g: 9.81                 # gravitational acceleration
//!   b: 0.012                # rail-to-rail separation
//!   r: 0.008                # ball radius
//!   e: 0.0004               # rolling-friction coefficient
//!   m: 0.008                # optional mass, absent -> specific energies
//!
//! integration:
//!   integrator: "symplectic_euler"
//!   dt: 0.001
//!   t_end: 8.4              # or `steps: 8400`
//!
//! output:
//!   file: simulation_data.txt
//!
//! reference:
//!   file: tracker_data.txt
//!   skip_header: 2
//! ```
//!
//! Waypoints can also come from a file of `x y z` rows:
//!
//! ```yaml
//! track:
//!   waypoints: xyz_circuit.txt
//!   unit_scale: 0.01        # centimetres -> metres
//! ```
//!
//! `Scenario::build` maps this configuration into validated runtime types.

use std::path::PathBuf;

use serde::Deserialize;

/// Time-stepping scheme used by the integrator
/// `integrator: "symplectic_euler"` or `integrator: "explicit_euler"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "symplectic_euler")] // Semi-implicit Euler, position advanced with the updated speed
    SymplecticEuler,

    #[serde(rename = "explicit_euler")] // Plain forward Euler, drifts in energy; diagnostics only
    ExplicitEuler,
}

/// Generated waypoint shapes
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Parabola {
        length: f64,                // horizontal span
        height: f64,                // height of both ends above the bottom
        #[serde(default = "default_shape_points")]
        points: usize,              // number of waypoints
        #[serde(default)]
        lateral_slope: f64,         // sideways tilt, y = lateral_slope * x
    },
    StraightLine {
        length: f64,                // horizontal span
        height: f64,                // total drop
        #[serde(default = "default_shape_points")]
        points: usize,
    },
    Looping {
        #[serde(default = "default_looping_points")]
        points: usize,
    },
    SLooping {
        origin: [f64; 3],           // first waypoint
        radius: f64,                // loop size
        spread: f64,                // sideways offset between entry and exit
    },
}

fn default_shape_points() -> usize {
    12
}

fn default_looping_points() -> usize {
    21
}

/// Track source and resolution
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TrackConfig {
    pub waypoints: Option<PathBuf>, // text file of `x y z` rows
    pub shape: Option<ShapeConfig>, // generated waypoints
    pub unit_scale: Option<f64>,    // multiplies file coordinates, default 1
    pub resample: Option<usize>,    // resampled point count, default 10 * N
}

/// Ball and rail constants
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BallConfig {
    pub g: f64,        // gravitational acceleration
    pub b: f64,        // rail-to-rail separation
    pub r: f64,        // ball radius
    pub e: f64,        // rolling-friction coefficient
    pub m: Option<f64>, // mass, default 1 (specific energies)
}

/// Step size, run budget and run options
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub integrator: IntegratorConfig,    // time-stepping scheme
    pub dt: f64,                          // step size
    pub t_end: Option<f64>,               // run duration, steps = floor(t_end / dt)
    pub steps: Option<usize>,             // explicit step budget, wins over t_end
    pub stop_at_track_end: Option<bool>,  // default true
    pub track_energy: Option<bool>,       // default true
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub file: PathBuf,                   // simulation table destination
    #[serde(default)]
    pub energy_columns: bool,            // append kinetic/potential columns
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReferenceConfig {
    pub file: PathBuf,                   // experimental table (t s vs a)
    pub skip_header: Option<usize>,      // header lines to skip, default 2
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub track: TrackConfig,                 // rail geometry source
    pub ball: BallConfig,                   // physical constants
    pub integration: IntegrationConfig,     // numerical settings
    pub output: Option<OutputConfig>,       // where to write the trajectory
    pub reference: Option<ReferenceConfig>, // data to compare against
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
