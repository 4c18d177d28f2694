//! Fixed-step time integration of the ball along the rail
//!
//! State machine: `Running` until either the step budget is spent
//! (`StoppedAtTimeLimit`) or, when enabled, the ball passes the end of the
//! rail (`StoppedAtTrackEnd`). The overshooting step is discarded, so the
//! last retained sample is the last one still on the track.

use tracing::{debug, info};

use crate::configuration::config::IntegratorConfig;
use crate::path::{Path, PathCursor};
use crate::simulation::energy::energy_record;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{LocalGeometry, RollingDynamics};
use crate::simulation::params::{BallParams, RunParams};
use crate::simulation::states::{BallState, Trajectory};

/// Upper bound on samples reserved up front, the columns grow past it
pub const MAX_PREALLOCATED_SAMPLES: usize = 1 << 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    StoppedAtTrackEnd,
    StoppedAtTimeLimit,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub trajectory: Trajectory, // retained samples, initial state included
    pub state: RunState,        // terminal state
    pub steps_taken: usize,     // steps computed, the discarded overshoot included
}

fn geometry_at(cursor: &mut PathCursor<'_>, s: f64) -> LocalGeometry {
    let sample = cursor.at(s);
    LocalGeometry {
        tangent: sample.tangent,
        curvature: sample.curvature,
    }
}

/// Advance one step using semi-implicit (symplectic) Euler:
/// the position update uses the speed that was just updated.
pub fn symplectic_euler_step(state: &BallState, cursor: &mut PathCursor<'_>, dynamics: &RollingDynamics, dt: f64) -> BallState {
    let geom = geometry_at(cursor, state.s);
    let a = dynamics.acceleration(state.vs, &geom);

    // Kick: Vs_n+1 = Vs_n + a_n dt
    let vs = state.vs + a * dt;
    // Drift with the new speed: s_n+1 = s_n + Vs_n+1 dt
    let s = state.s + vs * dt;

    BallState {
        t: state.t + dt,
        s,
        vs,
        a,
    }
}

/// Advance one step using plain explicit Euler (position uses the old speed).
/// Kept for drift comparisons against the symplectic scheme.
pub fn explicit_euler_step(state: &BallState, cursor: &mut PathCursor<'_>, dynamics: &RollingDynamics, dt: f64) -> BallState {
    let geom = geometry_at(cursor, state.s);
    let a = dynamics.acceleration(state.vs, &geom);

    BallState {
        t: state.t + dt,
        s: state.s + state.vs * dt,
        vs: state.vs + a * dt,
        a,
    }
}

/// Run from rest at s = 0 until the step budget or the end of the rail.
///
/// `path` is only read, so several runs may share it.
pub fn integrate(path: &Path, dynamics: &RollingDynamics, ball: &BallParams, run: &RunParams, engine: &Engine) -> RunOutput {
    let length = path.total_length();
    let mut cursor = path.cursor();

    let step: fn(&BallState, &mut PathCursor<'_>, &RollingDynamics, f64) -> BallState = match engine.integrator {
        IntegratorConfig::SymplecticEuler => symplectic_euler_step,
        IntegratorConfig::ExplicitEuler => explicit_euler_step,
    };

    let mut state = BallState::default();
    // a track-end stop usually ends the run long before the budget
    let capacity = run.steps.saturating_add(1).min(MAX_PREALLOCATED_SAMPLES);
    let mut trajectory = Trajectory::with_capacity(capacity, engine.track_energy);
    record(&mut trajectory, &mut cursor, ball, &state);

    info!(
        steps = run.steps,
        dt = run.dt,
        length = format!("{:.4}", length),
        integrator = ?engine.integrator,
        "Starting run"
    );

    let mut status = RunState::Running;
    let mut steps_taken = 0;

    while status == RunState::Running {
        if steps_taken == run.steps {
            status = RunState::StoppedAtTimeLimit;
            break;
        }

        let next = step(&state, &mut cursor, dynamics, run.dt);
        steps_taken += 1;

        if engine.stop_at_track_end && next.s > length {
            debug!(t = next.t, s = next.s, vs = next.vs, "Ball left the track, discarding step");
            status = RunState::StoppedAtTrackEnd;
            break;
        }

        state = next;
        record(&mut trajectory, &mut cursor, ball, &state);
    }

    info!(
        state = ?status,
        samples = trajectory.len(),
        t = format!("{:.4}", state.t),
        s = format!("{:.4}", state.s),
        vs = format!("{:.4}", state.vs),
        "Run finished"
    );

    RunOutput {
        trajectory,
        state: status,
        steps_taken,
    }
}

/// Convenience wrapper building the default dynamics for `ball`
pub fn simulate(path: &Path, ball: &BallParams, run: &RunParams, engine: &Engine) -> RunOutput {
    let dynamics = RollingDynamics::new(ball);
    integrate(path, &dynamics, ball, run, engine)
}

fn record(trajectory: &mut Trajectory, cursor: &mut PathCursor<'_>, ball: &BallParams, state: &BallState) {
    trajectory.push(state);
    if let Some(energy) = trajectory.energy.as_mut() {
        let z = cursor.at(state.s).position.z;
        energy.push(energy_record(ball, state.vs, z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::forces::{ForceSet, TangentialForce};
    use crate::simulation::states::NVec3;
    use approx::assert_relative_eq;

    /// Constant push along the rail
    struct Constant(f64);

    impl TangentialForce for Constant {
        fn tangential(&self, _vs: f64, _geom: &LocalGeometry) -> f64 {
            self.0
        }
    }

    fn flat_path(length: f64) -> Path {
        let pts: Vec<NVec3> = (0..101).map(|i| NVec3::new(length * i as f64 / 100.0, 0.0, 0.0)).collect();
        Path::from_samples(pts).unwrap()
    }

    fn ball() -> BallParams {
        BallParams::new(9.81, 0.012, 0.008, 0.0, 1.0).unwrap()
    }

    #[test]
    fn symplectic_step_uses_updated_speed() {
        let path = flat_path(10.0);
        let dynamics = RollingDynamics::from_parts(ForceSet::new().with(Constant(2.0)), 1.0);
        let mut cursor = path.cursor();

        let s0 = BallState { t: 0.0, s: 1.0, vs: 0.5, a: 0.0 };
        let s1 = symplectic_euler_step(&s0, &mut cursor, &dynamics, 0.1);
        assert_relative_eq!(s1.vs, 0.7, epsilon = 1e-12);
        assert_relative_eq!(s1.s, 1.07, epsilon = 1e-12);
        assert_relative_eq!(s1.t, 0.1, epsilon = 1e-12);
        assert_relative_eq!(s1.a, 2.0, epsilon = 1e-12);

        let e1 = explicit_euler_step(&s0, &mut cursor, &dynamics, 0.1);
        assert_relative_eq!(e1.s, 1.05, epsilon = 1e-12);
        assert_relative_eq!(e1.vs, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn budget_exhaustion_stops_at_time_limit() {
        let path = flat_path(10.0);
        let run = RunParams::new(0.01, 50).unwrap();
        let out = simulate(&path, &ball(), &run, &Engine::default());

        // level rail, at rest: nothing moves
        assert_eq!(out.state, RunState::StoppedAtTimeLimit);
        assert_eq!(out.trajectory.len(), 51);
        assert_eq!(out.steps_taken, 50);
        assert_relative_eq!(out.trajectory.t[50], 0.5, epsilon = 1e-9);
        assert_eq!(out.trajectory.s[50], 0.0);
    }

    #[test]
    fn overshoot_is_discarded() {
        let path = flat_path(1.0);
        let dynamics = RollingDynamics::from_parts(ForceSet::new().with(Constant(1.0)), 1.0);
        let run = RunParams::new(0.01, 10_000).unwrap();
        let out = integrate(&path, &dynamics, &ball(), &run, &Engine::default());

        assert_eq!(out.state, RunState::StoppedAtTrackEnd);
        assert_eq!(out.steps_taken, out.trajectory.len());
        let last = out.trajectory.final_state().unwrap();
        assert!(last.s <= path.total_length());
        assert!(last.s + (last.vs + 0.01) * 0.01 > path.total_length());
    }

    #[test]
    fn huge_budget_is_not_reserved_up_front() {
        let path = flat_path(1.0);
        let dynamics = RollingDynamics::from_parts(ForceSet::new().with(Constant(1.0)), 1.0);
        let run = RunParams::new(1e-3, 1 << 40).unwrap();
        let out = integrate(&path, &dynamics, &ball(), &run, &Engine::default());

        assert_eq!(out.state, RunState::StoppedAtTrackEnd);
        assert!(out.trajectory.len() < 2000);
    }

    #[test]
    fn without_track_end_stop_the_run_continues() {
        let path = flat_path(1.0);
        let dynamics = RollingDynamics::from_parts(ForceSet::new().with(Constant(1.0)), 1.0);
        let run = RunParams::new(0.01, 300).unwrap();
        let engine = Engine {
            stop_at_track_end: false,
            ..Engine::default()
        };
        let out = integrate(&path, &dynamics, &ball(), &run, &engine);

        assert_eq!(out.state, RunState::StoppedAtTimeLimit);
        assert_eq!(out.trajectory.len(), 301);
        assert!(out.trajectory.max_arc_length() > path.total_length());
    }

    #[test]
    fn energy_columns_follow_samples() {
        let path = flat_path(1.0);
        let run = RunParams::new(0.01, 20).unwrap();
        let out = simulate(&path, &ball(), &run, &Engine::default());
        assert_eq!(out.trajectory.energy.as_ref().map(Vec::len), Some(21));

        let engine = Engine {
            track_energy: false,
            ..Engine::default()
        };
        let out = simulate(&path, &ball(), &run, &engine);
        assert!(out.trajectory.energy.is_none());
    }
}
