//! Core state types for the rolling-ball simulation.
//!
//! - `NVec3`      3D vector (nalgebra) used for positions, tangents, curvatures
//! - `BallState`  instantaneous state of the ball along the rail
//! - `Trajectory` parallel output sequences, one entry per retained step

use nalgebra::Vector3;

use crate::simulation::energy::EnergyRecord;

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct BallState {
    pub t: f64,  // time
    pub s: f64,  // arc-length position
    pub vs: f64, // tangential speed, positive towards increasing s
    pub a: f64,  // tangential acceleration that produced this state
}

/// Parallel sequences filled by the integrator. All columns have equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub s: Vec<f64>,
    pub vs: Vec<f64>,
    pub a: Vec<f64>,
    pub energy: Option<Vec<EnergyRecord>>, // present when energy tracking is on
}

impl Trajectory {
    pub fn with_capacity(capacity: usize, track_energy: bool) -> Self {
        Self {
            t: Vec::with_capacity(capacity),
            s: Vec::with_capacity(capacity),
            vs: Vec::with_capacity(capacity),
            a: Vec::with_capacity(capacity),
            energy: track_energy.then(|| Vec::with_capacity(capacity)),
        }
    }

    pub fn push(&mut self, state: &BallState) {
        self.t.push(state.t);
        self.s.push(state.s);
        self.vs.push(state.vs);
        self.a.push(state.a);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn state(&self, i: usize) -> BallState {
        BallState {
            t: self.t[i],
            s: self.s[i],
            vs: self.vs[i],
            a: self.a[i],
        }
    }

    pub fn final_state(&self) -> Option<BallState> {
        (!self.is_empty()).then(|| self.state(self.len() - 1))
    }

    /// Largest arc-length reached
    pub fn max_arc_length(&self) -> f64 {
        self.s.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Time at which the ball first reaches arc-length `target`,
    /// linearly interpolated between the bracketing steps.
    pub fn time_at_arc_length(&self, target: f64) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        if self.s[0] >= target {
            return Some(self.t[0]);
        }
        self.s.windows(2).enumerate().find_map(|(i, w)| {
            if w[0] < target && w[1] >= target {
                let f = (target - w[0]) / (w[1] - w[0]);
                Some(self.t[i] + f * (self.t[i + 1] - self.t[i]))
            } else {
                None
            }
        })
    }
}
