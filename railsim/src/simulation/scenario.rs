//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - engine settings (`Engine`)
//! - validated ball constants (`BallParams`)
//! - step size and budget (`RunParams`)
//! - the rail geometry (`Path`), built once and only read afterwards
//!
//! Relative file names in the configuration are resolved against `base_dir`,
//! normally the directory holding the YAML file.

use std::path::{Path as FsPath, PathBuf};

use tracing::{debug, info};

use crate::analysis::compare::{compare, Comparison};
use crate::configuration::config::{ScenarioConfig, ShapeConfig, TrackConfig};
use crate::error::{ScenarioError, TableError};
use crate::io::tables::{load_reference, load_waypoints, save_trajectory, ReferenceData};
use crate::path::{shapes, Path};
use crate::simulation::engine::Engine;
use crate::simulation::integrator::{simulate, RunOutput};
use crate::simulation::params::{BallParams, RunParams};
use crate::simulation::states::NVec3;

/// Header lines in tracker exports (object name, column titles)
pub const DEFAULT_SKIP_HEADER: usize = 2;

/// Resolved output destination
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub file: PathBuf,
    pub energy_columns: bool,
}

/// Resolved reference table
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSource {
    pub file: PathBuf,
    pub skip_header: usize,
}

/// Runtime bundle constructed from a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub ball: BallParams,
    pub run: RunParams,
    pub path: Path,
    pub output: Option<OutputTarget>,
    pub reference: Option<ReferenceSource>,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig, base_dir: &FsPath) -> Result<Self, ScenarioError> {
        let resolve = |file: &FsPath| -> PathBuf {
            if file.is_absolute() {
                file.to_path_buf()
            } else {
                base_dir.join(file)
            }
        };

        // Track: waypoints from a file or a generated shape, then the fitted path
        let waypoints = track_waypoints(&cfg.track, &resolve)?;
        let path = Path::from_waypoints(&waypoints, cfg.track.resample)?;

        // Ball: mass is optional, m = 1 gives specific energies
        let b_cfg = cfg.ball;
        let ball = BallParams::new(b_cfg.g, b_cfg.b, b_cfg.r, b_cfg.e, b_cfg.m.unwrap_or(1.0))?;

        // Run budget: explicit steps win over a duration
        let i_cfg = cfg.integration;
        let run = match (i_cfg.steps, i_cfg.t_end) {
            (Some(steps), _) => RunParams::new(i_cfg.dt, steps)?,
            (None, Some(t_end)) => RunParams::from_duration(i_cfg.dt, t_end)?,
            (None, None) => return Err(ScenarioError::MissingRunLength),
        };

        // energy columns in the output need the energies recorded
        let energy_columns = cfg.output.as_ref().is_some_and(|o| o.energy_columns);
        let track_energy = i_cfg.track_energy.unwrap_or(true) || energy_columns;
        if track_energy && i_cfg.track_energy == Some(false) {
            debug!("Energy tracking enabled for the output energy columns");
        }

        let engine = Engine {
            integrator: i_cfg.integrator,
            stop_at_track_end: i_cfg.stop_at_track_end.unwrap_or(true),
            track_energy,
        };

        let output = cfg.output.map(|o| OutputTarget {
            file: resolve(o.file.as_path()),
            energy_columns: o.energy_columns,
        });
        let reference = cfg.reference.map(|r| ReferenceSource {
            file: resolve(r.file.as_path()),
            skip_header: r.skip_header.unwrap_or(DEFAULT_SKIP_HEADER),
        });

        info!(
            waypoints = waypoints.len(),
            samples = path.len(),
            length = format!("{:.4}", path.total_length()),
            h = format!("{:.5}", ball.h()),
            inertia = format!("{:.4}", ball.inertia()),
            "Scenario built"
        );

        Ok(Self {
            engine,
            ball,
            run,
            path,
            output,
            reference,
        })
    }

    pub fn run(&self) -> RunOutput {
        simulate(&self.path, &self.ball, &self.run, &self.engine)
    }

    /// Write `output` to the configured table, if any
    pub fn save(&self, output: &RunOutput) -> Result<(), TableError> {
        if let Some(target) = &self.output {
            save_trajectory(&target.file, &output.trajectory, target.energy_columns)?;
            info!(path = %target.file.display(), rows = output.trajectory.len(), "Saved trajectory");
        }
        Ok(())
    }

    pub fn load_reference(&self) -> Result<Option<ReferenceData>, TableError> {
        self.reference
            .as_ref()
            .map(|r| load_reference(&r.file, r.skip_header))
            .transpose()
    }

    /// Compare a run against the configured reference table, if any
    pub fn compare(&self, output: &RunOutput) -> Result<Option<Comparison>, TableError> {
        Ok(self
            .load_reference()?
            .map(|reference| compare(&output.trajectory, &reference)))
    }
}

fn track_waypoints(track: &TrackConfig, resolve: &dyn Fn(&FsPath) -> PathBuf) -> Result<Vec<NVec3>, ScenarioError> {
    match (&track.waypoints, &track.shape) {
        (Some(file), None) => Ok(load_waypoints(&resolve(file.as_path()), track.unit_scale.unwrap_or(1.0))?),
        (None, Some(shape)) => Ok(shape_waypoints(shape)),
        (Some(_), Some(_)) => Err(ScenarioError::InvalidTrack(
            "give either `waypoints` or `shape`, not both".to_string(),
        )),
        (None, None) => Err(ScenarioError::InvalidTrack(
            "one of `waypoints` or `shape` is required".to_string(),
        )),
    }
}

pub fn shape_waypoints(shape: &ShapeConfig) -> Vec<NVec3> {
    match *shape {
        ShapeConfig::Parabola {
            length,
            height,
            points,
            lateral_slope,
        } => shapes::parabola(length, height, points, lateral_slope),
        ShapeConfig::StraightLine { length, height, points } => shapes::straight_line(length, height, points),
        ShapeConfig::Looping { points } => shapes::looping(points),
        ShapeConfig::SLooping { origin, radius, spread } => {
            shapes::s_looping(NVec3::new(origin[0], origin[1], origin[2]), radius, spread)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParamError, PathError};
    use crate::simulation::integrator::RunState;

    fn config(text: &str) -> ScenarioConfig {
        ScenarioConfig::from_yaml_str(text).unwrap()
    }

    const RAMP: &str = r#"
track:
  shape: { kind: straight_line, length: 1.0, height: 0.2, points: 8 }
  resample: 200
ball: { g: 9.81, b: 0.012, r: 0.008, e: 0.0 }
integration:
  dt: 0.001
  t_end: 2.0
output:
  file: out/run.txt
reference:
  file: /data/tracker.txt
"#;

    #[test]
    fn builds_and_resolves_files() {
        let scenario = Scenario::build(config(RAMP), FsPath::new("/scenarios")).unwrap();

        assert_eq!(scenario.path.len(), 200);
        assert_eq!(scenario.run.steps, 2000);
        assert_eq!(scenario.ball.m(), 1.0);
        assert_eq!(scenario.engine, Engine::default());
        assert_eq!(
            scenario.output.unwrap().file,
            PathBuf::from("/scenarios/out/run.txt")
        );
        let reference = scenario.reference.unwrap();
        assert_eq!(reference.file, PathBuf::from("/data/tracker.txt"));
        assert_eq!(reference.skip_header, DEFAULT_SKIP_HEADER);
    }

    #[test]
    fn steps_win_over_duration() {
        let text = RAMP.replace("  t_end: 2.0", "  t_end: 2.0\n  steps: 10");
        let scenario = Scenario::build(config(&text), FsPath::new(".")).unwrap();
        assert_eq!(scenario.run.steps, 10);

        let out = scenario.run();
        assert_eq!(out.state, RunState::StoppedAtTimeLimit);
        assert_eq!(out.trajectory.len(), 11);
    }

    #[test]
    fn energy_columns_turn_on_energy_tracking() {
        let text = RAMP
            .replace("  t_end: 2.0", "  t_end: 0.1\n  track_energy: false")
            .replace("  file: out/run.txt", "  file: out/run.txt\n  energy_columns: true");
        let scenario = Scenario::build(config(&text), FsPath::new(".")).unwrap();
        assert!(scenario.engine.track_energy);
        assert!(scenario.run().trajectory.energy.is_some());

        let text = RAMP.replace("  t_end: 2.0", "  t_end: 0.1\n  track_energy: false");
        let scenario = Scenario::build(config(&text), FsPath::new(".")).unwrap();
        assert!(!scenario.engine.track_energy);
    }

    #[test]
    fn path_warnings_stay_attached_to_the_path() {
        let text = RAMP
            .replace(
                "  shape: { kind: straight_line, length: 1.0, height: 0.2, points: 8 }",
                "  shape: { kind: s_looping, origin: [0.0, 0.0, 0.0], radius: 1.0, spread: 0.5 }",
            )
            .replace("  resample: 200", "  resample: 10");
        let scenario = Scenario::build(config(&text), FsPath::new(".")).unwrap();
        assert!(!scenario.path.warnings().is_empty());
    }

    #[test]
    fn unrepresentable_duration_is_rejected() {
        let text = RAMP.replace("  dt: 0.001", "  dt: 1.0e-300");
        let err = Scenario::build(config(&text), FsPath::new(".")).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Param(ParamError::InvalidParameter { name: "t_end", .. })
        ));
    }

    #[test]
    fn missing_run_length_is_rejected() {
        let text = RAMP.replace("  t_end: 2.0\n", "");
        let err = Scenario::build(config(&text), FsPath::new(".")).unwrap_err();
        assert!(matches!(err, ScenarioError::MissingRunLength));
    }

    #[test]
    fn track_source_must_be_unique() {
        let text = RAMP.replace("  resample: 200", "  resample: 200\n  waypoints: xyz.txt");
        let err = Scenario::build(config(&text), FsPath::new(".")).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidTrack(_)));
    }

    #[test]
    fn invalid_inputs_surface_typed_errors() {
        let text = RAMP.replace("points: 8", "points: 3");
        let err = Scenario::build(config(&text), FsPath::new(".")).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Path(PathError::InsufficientData { required: 4, found: 3 })
        ));

        let text = RAMP.replace("r: 0.008", "r: 0.005");
        let err = Scenario::build(config(&text), FsPath::new(".")).unwrap_err();
        assert!(matches!(err, ScenarioError::Param(ParamError::InvalidGeometry { .. })));
    }

    #[test]
    fn missing_waypoint_file_is_a_table_error() {
        let text = RAMP.replace(
            "  shape: { kind: straight_line, length: 1.0, height: 0.2, points: 8 }",
            "  waypoints: does_not_exist.txt",
        );
        let err = Scenario::build(config(&text), FsPath::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, ScenarioError::Table(TableError::Open { .. })));
    }
}
