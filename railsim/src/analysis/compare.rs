//! Simulation vs. reference comparison.
//!
//! The simulated arc-length and speed are linearly interpolated at each
//! reference time that falls inside the simulated time span. Speeds are
//! compared as magnitudes, since tracking data carries no direction.
//! Rows with a non-finite time, position or speed are skipped.

use tracing::info;

use crate::io::tables::ReferenceData;
use crate::simulation::states::Trajectory;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ErrorStats {
    pub rms: f64,     // root-mean-square error
    pub max_abs: f64, // largest absolute error
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Comparison {
    pub samples: usize,          // reference points inside the simulated span
    pub arc_length: ErrorStats,  // s_sim - s_ref
    pub speed: ErrorStats,       // |vs_sim| - |vs_ref|
}

/// Linear interpolation of `y(x)` at `x0`, with `x` increasing
fn interp(x: &[f64], y: &[f64], x0: f64) -> f64 {
    let last = x.len() - 1;
    if x0 <= x[0] {
        return y[0];
    }
    if x0 >= x[last] {
        return y[last];
    }
    let i = x.partition_point(|&v| v <= x0) - 1;
    let f = (x0 - x[i]) / (x[i + 1] - x[i]);
    y[i] + f * (y[i + 1] - y[i])
}

fn stats(errors: &[f64]) -> ErrorStats {
    if errors.is_empty() {
        return ErrorStats::default();
    }
    let sum_sq: f64 = errors.iter().map(|e| e * e).sum();
    ErrorStats {
        rms: (sum_sq / errors.len() as f64).sqrt(),
        max_abs: errors.iter().fold(0.0, |m, e| m.max(e.abs())),
    }
}

/// Compare a simulated trajectory against reference data
pub fn compare(sim: &Trajectory, reference: &ReferenceData) -> Comparison {
    if sim.is_empty() {
        return Comparison::default();
    }
    let (t0, t1) = (sim.t[0], sim.t[sim.len() - 1]);
    let speeds: Vec<f64> = sim.vs.iter().map(|v| v.abs()).collect();

    let mut ds = Vec::new();
    let mut dv = Vec::new();
    for i in 0..reference.len() {
        let (t, s, vs) = (reference.t[i], reference.s[i], reference.vs[i]);
        // NaN fails both bounds
        if !(t >= t0 && t <= t1) || !s.is_finite() || !vs.is_finite() {
            continue;
        }
        ds.push(interp(&sim.t, &sim.s, t) - s);
        dv.push(interp(&sim.t, &speeds, t) - vs.abs());
    }

    let comparison = Comparison {
        samples: ds.len(),
        arc_length: stats(&ds),
        speed: stats(&dv),
    };

    info!(
        samples = comparison.samples,
        s_rms = comparison.arc_length.rms,
        vs_rms = comparison.speed.rms,
        "Compared against reference"
    );

    comparison
}
