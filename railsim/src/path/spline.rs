//! Cubic spline fitting through ordered 3D waypoints.
//!
//! Waypoints are parameterized by cumulative chord length (tau), and one
//! not-a-knot cubic spline per coordinate axis is fitted against tau. All
//! three axes share the same knot vector, so the three tridiagonal systems
//! are solved together with `NVec3` right-hand sides.

use tracing::debug;

use crate::error::PathError;
use crate::simulation::states::NVec3;

/// Minimum number of waypoints for a not-a-knot cubic fit
pub const MIN_WAYPOINTS: usize = 4;

/// Default number of resampled points per waypoint
pub const DEFAULT_RESAMPLE_FACTOR: usize = 10;

/// Interpolating C² cubic spline `tau -> NVec3` with not-a-knot end conditions
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline3 {
    knots: Vec<f64>,    // parameter value at each waypoint, strictly increasing
    points: Vec<NVec3>, // waypoint coordinates
    second: Vec<NVec3>, // second derivative d²X/dtau² at each knot
}

impl CubicSpline3 {
    /// Fit the spline through `points` at parameter values `knots`.
    ///
    /// Needs at least [`MIN_WAYPOINTS`] points and strictly increasing knots.
    pub fn fit(knots: &[f64], points: &[NVec3]) -> Result<Self, PathError> {
        let n = points.len();
        if n < MIN_WAYPOINTS || knots.len() != n {
            return Err(PathError::InsufficientData {
                required: MIN_WAYPOINTS,
                found: n.min(knots.len()),
            });
        }

        // segment widths h[i] = tau[i+1] - tau[i]
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        if let Some(index) = h.iter().position(|&hi| !(hi > 0.0)) {
            return Err(PathError::DegenerateParameterization { index });
        }

        // divided differences d[i] = (X[i+1] - X[i]) / h[i]
        let d: Vec<NVec3> = points
            .windows(2)
            .zip(h.iter())
            .map(|(w, &hi)| (w[1] - w[0]) / hi)
            .collect();

        // Interior unknowns M[1..n-1]; M[0] and M[n-1] are eliminated with the
        // not-a-knot conditions (third derivative continuous at knots 1 and n-2)
        let k = n - 2;
        let mut lower = vec![0.0; k];
        let mut diag = vec![0.0; k];
        let mut upper = vec![0.0; k];
        let mut rhs = vec![NVec3::zeros(); k];

        for j in 0..k {
            let i = j + 1;
            lower[j] = h[i - 1];
            diag[j] = 2.0 * (h[i - 1] + h[i]);
            upper[j] = h[i];
            rhs[j] = 6.0 * (d[i] - d[i - 1]);
        }

        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (2.0 + h0 / h1);
        upper[0] = h1 - h0 * h0 / h1;

        let (ha, hb) = (h[n - 3], h[n - 2]);
        lower[k - 1] = ha - hb * hb / ha;
        diag[k - 1] = 2.0 * (ha + hb) + hb * (ha + hb) / ha;
        upper[k - 1] = 0.0;

        let interior = solve_tridiagonal(&lower, &mut diag, &upper, &mut rhs);

        let mut second = Vec::with_capacity(n);
        second.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        second.extend_from_slice(&interior);
        second.push(((ha + hb) * interior[k - 1] - hb * interior[k - 2]) / ha);

        Ok(Self {
            knots: knots.to_vec(),
            points: points.to_vec(),
            second,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Parameter value at the last knot
    pub fn end(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Evaluate the spline at parameter `tau`.
    /// Values outside the knot range extrapolate the first/last cubic piece.
    pub fn evaluate(&self, tau: f64) -> NVec3 {
        let last = self.knots.len() - 2;
        let i = self
            .knots
            .partition_point(|&k| k <= tau)
            .saturating_sub(1)
            .min(last);

        let hi = self.knots[i + 1] - self.knots[i];
        let t = tau - self.knots[i];
        let (m0, m1) = (self.second[i], self.second[i + 1]);
        let slope = (self.points[i + 1] - self.points[i]) / hi - hi * (2.0 * m0 + m1) / 6.0;

        self.points[i] + slope * t + m0 * (0.5 * t * t) + (m1 - m0) * (t * t * t / (6.0 * hi))
    }
}

/// Thomas algorithm for a tridiagonal system with vector right-hand sides.
/// `diag` and `rhs` are overwritten by the forward sweep.
fn solve_tridiagonal(lower: &[f64], diag: &mut [f64], upper: &[f64], rhs: &mut [NVec3]) -> Vec<NVec3> {
    let k = diag.len();

    // Forward elimination
    for j in 1..k {
        let w = lower[j] / diag[j - 1];
        diag[j] -= w * upper[j - 1];
        let prev = rhs[j - 1];
        rhs[j] -= prev * w;
    }

    // Back substitution
    let mut x = vec![NVec3::zeros(); k];
    x[k - 1] = rhs[k - 1] / diag[k - 1];
    for j in (0..k - 1).rev() {
        x[j] = (rhs[j] - upper[j] * x[j + 1]) / diag[j];
    }
    x
}

/// Cumulative chord length of a point sequence, starting at 0
pub fn chord_parameters(points: &[NVec3]) -> Vec<f64> {
    let mut tau = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    tau.push(acc);
    for w in points.windows(2) {
        acc += (w[1] - w[0]).norm();
        tau.push(acc);
    }
    tau
}

/// PathBuilder: fit a chord-parameterized spline through `waypoints` and
/// sample it at `samples` uniformly spaced parameter values over
/// `[0, total chord length]`.
///
/// `samples` defaults to 10 × N.
pub fn resample_waypoints(waypoints: &[NVec3], samples: Option<usize>) -> Result<Vec<NVec3>, PathError> {
    if waypoints.len() < MIN_WAYPOINTS {
        return Err(PathError::InsufficientData {
            required: MIN_WAYPOINTS,
            found: waypoints.len(),
        });
    }

    let tau = chord_parameters(waypoints);
    let spline = CubicSpline3::fit(&tau, waypoints)?;

    let m = samples.unwrap_or(DEFAULT_RESAMPLE_FACTOR * waypoints.len());
    let tau_end = spline.end();

    debug!(waypoints = waypoints.len(), samples = m, chord_length = tau_end, "Resampling spline");

    let resampled = (0..m)
        .map(|i| {
            if i + 1 == m {
                // land exactly on the last waypoint
                return waypoints[waypoints.len() - 1];
            }
            let u = if m > 1 { i as f64 / (m - 1) as f64 } else { 0.0 };
            spline.evaluate(u * tau_end)
        })
        .collect();

    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f64 = 1e-10;

    fn cubic_points(knots: &[f64]) -> Vec<NVec3> {
        knots.iter().map(|&t| NVec3::new(t, t * t, t * t * t)).collect()
    }

    #[test]
    fn fit_passes_through_knots() {
        let knots = [0.0, 0.3, 1.1, 1.5, 2.6, 3.0];
        let points: Vec<NVec3> = knots
            .iter()
            .map(|&t: &f64| NVec3::new(t.sin(), t.cos(), 0.5 * t))
            .collect();
        let spline = CubicSpline3::fit(&knots, &points).unwrap();

        for (t, p) in knots.iter().zip(points.iter()) {
            let q = spline.evaluate(*t);
            assert_relative_eq!((q - p).norm(), 0.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn not_a_knot_reproduces_cubics() {
        let knots = [-1.0, -0.4, 0.1, 0.5, 1.2, 2.0];
        let spline = CubicSpline3::fit(&knots, &cubic_points(&knots)).unwrap();

        for t in [-0.9, -0.1, 0.33, 0.8, 1.7] {
            let q = spline.evaluate(t);
            assert_relative_eq!(q.x, t, epsilon = 1e-9);
            assert_relative_eq!(q.y, t * t, epsilon = 1e-9);
            assert_relative_eq!(q.z, t * t * t, epsilon = 1e-9);
        }
    }

    #[test]
    fn four_points_is_enough() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let spline = CubicSpline3::fit(&knots, &cubic_points(&knots)).unwrap();
        let q = spline.evaluate(1.5);
        assert_relative_eq!(q.z, 3.375, epsilon = 1e-9);
    }

    #[test]
    fn fit_rejects_three_points() {
        let knots = [0.0, 1.0, 2.0];
        let err = CubicSpline3::fit(&knots, &cubic_points(&knots)).unwrap_err();
        assert_eq!(err, PathError::InsufficientData { required: 4, found: 3 });
    }

    #[test]
    fn chord_parameters_accumulate() {
        let pts = [
            NVec3::new(0.0, 0.0, 0.0),
            NVec3::new(3.0, 4.0, 0.0),
            NVec3::new(3.0, 4.0, 2.0),
        ];
        let tau = chord_parameters(&pts);
        assert_eq!(tau.len(), 3);
        assert_relative_eq!(tau[1], 5.0, epsilon = TOLERANCE);
        assert_relative_eq!(tau[2], 7.0, epsilon = TOLERANCE);
    }

    #[test]
    fn resample_default_count_is_ten_per_waypoint() {
        let pts: Vec<NVec3> = (0..5).map(|i| NVec3::new(i as f64, 0.0, -(i as f64))).collect();
        let out = resample_waypoints(&pts, None).unwrap();
        assert_eq!(out.len(), 50);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[49], pts[4]);
    }

    #[test]
    fn resample_detects_duplicate_waypoints() {
        let pts = [
            NVec3::new(0.0, 0.0, 0.0),
            NVec3::new(1.0, 0.0, 0.0),
            NVec3::new(1.0, 0.0, 0.0),
            NVec3::new(2.0, 0.0, 0.0),
        ];
        let err = resample_waypoints(&pts, Some(20)).unwrap_err();
        assert_eq!(err, PathError::DegenerateParameterization { index: 1 });
    }
}
