//! Arc-length, tangent and curvature fields along a sampled curve.
//!
//! `Path` is the immutable product of path construction. It stores four
//! parallel tables indexed by sample: position, cumulative arc-length,
//! unit tangent dX/ds and curvature vector d²X/ds².

use tracing::{info, warn};

use crate::error::{PathError, PathWarning};
use crate::path::spline::resample_waypoints;
use crate::simulation::states::NVec3;

/// Minimum number of samples for a second derivative
pub const MIN_SAMPLES: usize = 3;

/// Largest tolerated | |T| - 1 | before a conditioning warning is attached
pub const TANGENT_TOLERANCE: f64 = 1e-3;

/// Tabulated rail geometry, indexed by sample
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    positions: Vec<NVec3>,  // resampled curve points
    arc: Vec<f64>,          // cumulative arc-length, arc[0] = 0, strictly increasing
    tangents: Vec<NVec3>,   // dX/ds, near unit length
    curvatures: Vec<NVec3>, // d²X/ds², |C| = 1 / radius
    warnings: Vec<PathWarning>,
}

impl Path {
    /// Build a path from waypoints: spline fit, resample to `samples` points
    /// (default 10 × N), then derive the fields.
    pub fn from_waypoints(waypoints: &[NVec3], samples: Option<usize>) -> Result<Self, PathError> {
        let resampled = resample_waypoints(waypoints, samples)?;
        let path = Self::from_samples(resampled)?;

        info!(
            waypoints = waypoints.len(),
            samples = path.len(),
            length = format!("{:.4}", path.total_length()),
            "Path built"
        );

        Ok(path)
    }

    /// Derive the fields from an already dense sampled curve.
    pub fn from_samples(positions: Vec<NVec3>) -> Result<Self, PathError> {
        if positions.len() < MIN_SAMPLES {
            return Err(PathError::InsufficientSamples {
                required: MIN_SAMPLES,
                found: positions.len(),
            });
        }

        let arc = arc_lengths(&positions)?;
        let tangents = gradient(&positions, &arc);
        let curvatures = gradient(&tangents, &arc);

        let mut warnings = Vec::new();
        if let Some((index, deviation)) = worst_tangent_deviation(&tangents) {
            if deviation > TANGENT_TOLERANCE {
                warn!(index, deviation, "Tangent magnitude deviates from unit length, resampling may be too coarse");
                warnings.push(PathWarning::NumericalIllConditioning { index, deviation });
            }
        }

        Ok(Self {
            positions,
            arc,
            tangents,
            curvatures,
            warnings,
        })
    }

    pub fn len(&self) -> usize {
        self.arc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arc.is_empty()
    }

    /// Arc-length of the last sample
    pub fn total_length(&self) -> f64 {
        self.arc[self.arc.len() - 1]
    }

    pub fn positions(&self) -> &[NVec3] {
        &self.positions
    }

    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc
    }

    pub fn tangents(&self) -> &[NVec3] {
        &self.tangents
    }

    pub fn curvatures(&self) -> &[NVec3] {
        &self.curvatures
    }

    pub fn warnings(&self) -> &[PathWarning] {
        &self.warnings
    }
}

/// Cumulative Euclidean distance between consecutive samples
fn arc_lengths(positions: &[NVec3]) -> Result<Vec<f64>, PathError> {
    let mut arc = Vec::with_capacity(positions.len());
    let mut s = 0.0;
    arc.push(s);
    for (index, w) in positions.windows(2).enumerate() {
        let ds = (w[1] - w[0]).norm();
        if !(ds > 0.0) {
            return Err(PathError::DegenerateParameterization { index });
        }
        s += ds;
        arc.push(s);
    }
    Ok(arc)
}

/// Numerical derivative of `values` with respect to the non-uniform grid `x`.
///
/// Second-order central differences in the interior and second-order
/// one-sided differences at both ends. Needs at least 3 points.
pub fn gradient(values: &[NVec3], x: &[f64]) -> Vec<NVec3> {
    let n = values.len();
    debug_assert!(n >= MIN_SAMPLES && x.len() == n);

    let mut out = vec![NVec3::zeros(); n];

    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        out[i] = (hs * hs * values[i + 1] + (hd * hd - hs * hs) * values[i] - hd * hd * values[i - 1])
            / (hs * hd * (hd + hs));
    }

    // left edge
    let dx1 = x[1] - x[0];
    let dx2 = x[2] - x[1];
    let a = -(2.0 * dx1 + dx2) / (dx1 * (dx1 + dx2));
    let b = (dx1 + dx2) / (dx1 * dx2);
    let c = -dx1 / (dx2 * (dx1 + dx2));
    out[0] = a * values[0] + b * values[1] + c * values[2];

    // right edge
    let dx1 = x[n - 2] - x[n - 3];
    let dx2 = x[n - 1] - x[n - 2];
    let a = dx2 / (dx1 * (dx1 + dx2));
    let b = -(dx2 + dx1) / (dx1 * dx2);
    let c = (2.0 * dx2 + dx1) / (dx2 * (dx1 + dx2));
    out[n - 1] = a * values[n - 3] + b * values[n - 2] + c * values[n - 1];

    out
}

/// Index and size of the largest | |T| - 1 |
fn worst_tangent_deviation(tangents: &[NVec3]) -> Option<(usize, f64)> {
    tangents
        .iter()
        .map(|t| (t.norm() - 1.0).abs())
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f64 = 1e-9;

    fn circle(radius: f64, n: usize) -> Vec<NVec3> {
        (0..n)
            .map(|i| {
                let phi = std::f64::consts::PI * i as f64 / (n - 1) as f64;
                NVec3::new(radius * phi.cos(), radius * phi.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn gradient_exact_for_quadratics_on_uneven_grid() {
        let x = [0.0, 0.2, 0.5, 0.6, 1.0, 1.7];
        let values: Vec<NVec3> = x.iter().map(|&t| NVec3::new(t * t, 3.0 * t, 1.0)).collect();
        let grad = gradient(&values, &x);

        for (g, &t) in grad.iter().zip(x.iter()) {
            assert_relative_eq!(g.x, 2.0 * t, epsilon = TOLERANCE);
            assert_relative_eq!(g.y, 3.0, epsilon = TOLERANCE);
            assert_relative_eq!(g.z, 0.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn straight_samples_have_unit_tangent_and_no_curvature() {
        let pts: Vec<NVec3> = (0..10).map(|i| NVec3::new(0.1 * i as f64, 0.0, -0.05 * i as f64)).collect();
        let path = Path::from_samples(pts).unwrap();

        for (t, c) in path.tangents().iter().zip(path.curvatures()) {
            assert_relative_eq!(t.norm(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(c.norm(), 0.0, epsilon = 1e-8);
        }
        assert!(path.warnings().is_empty());
    }

    #[test]
    fn circle_curvature_matches_inverse_radius() {
        let path = Path::from_samples(circle(0.5, 400)).unwrap();
        let mid = path.len() / 2;

        assert_relative_eq!(path.curvatures()[mid].norm(), 2.0, epsilon = 1e-3);
        // principal normal points to the centre
        let inward = -path.positions()[mid].normalize();
        assert_relative_eq!(path.curvatures()[mid].normalize().dot(&inward), 1.0, epsilon = 1e-6);
        assert_relative_eq!(path.total_length(), 0.5 * std::f64::consts::PI, epsilon = 1e-4);
    }

    #[test]
    fn two_samples_are_rejected() {
        let err = Path::from_samples(vec![NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0)]).unwrap_err();
        assert_eq!(err, PathError::InsufficientSamples { required: 3, found: 2 });
    }

    #[test]
    fn coarse_circle_is_flagged() {
        let path = Path::from_samples(circle(1.0, 5)).unwrap();
        assert!(matches!(
            path.warnings().first(),
            Some(PathWarning::NumericalIllConditioning { .. })
        ));
    }
}
