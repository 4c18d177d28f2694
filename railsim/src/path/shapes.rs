//! Waypoint generators for test tracks.

use crate::simulation::states::NVec3;

fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| if i + 1 == n { end } else { start + step * i as f64 })
}

/// Parabola z = 4H/L² · x² over x ∈ [-L/2, L/2], both ends at height H.
/// `lateral_slope` tilts the track sideways (y = lateral_slope · x).
pub fn parabola(length: f64, height: f64, points: usize, lateral_slope: f64) -> Vec<NVec3> {
    let a = 4.0 * height / (length * length);
    linspace(-0.5 * length, 0.5 * length, points)
        .map(|x| NVec3::new(x, lateral_slope * x, a * x * x))
        .collect()
}

/// Straight descending ramp: horizontal span L, total drop H
pub fn straight_line(length: f64, height: f64, points: usize) -> Vec<NVec3> {
    let slope = height / length;
    linspace(-0.5 * length, 0.5 * length, points)
        .map(|x| NVec3::new(x, 0.0, -slope * x))
        .collect()
}

/// Track with a loop, t ∈ [-1, 1]:
///
/// x = 0.5t + t(t-1)(t+1), y = 0.5t(t-1)(t+1), z = 2t²(t-0.9)(t+0.9)
pub fn looping(points: usize) -> Vec<NVec3> {
    linspace(-1.0, 1.0, points)
        .map(|t| {
            let cubic = t * (t - 1.0) * (t + 1.0);
            NVec3::new(0.5 * t + cubic, 0.5 * cubic, 2.0 * t * t * (t - 0.9) * (t + 0.9))
        })
        .collect()
}

/// Seven-point vertical loop starting at `origin`, exiting `spread` to the side
pub fn s_looping(origin: NVec3, radius: f64, spread: f64) -> Vec<NVec3> {
    let offsets = [
        (0.0, 0.0, 0.0),
        (0.5 * radius, 0.0, 0.0),
        (radius, 0.0, 0.5 * radius),
        (0.5 * radius, 0.5 * spread, radius),
        (0.0, spread, 0.5 * radius),
        (0.5 * radius, spread, 0.0),
        (radius, spread, 0.0),
    ];
    offsets
        .iter()
        .map(|&(dx, dy, dz)| origin + NVec3::new(dx, dy, dz))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parabola_ends_at_height_and_bottoms_at_zero() {
        let pts = parabola(1.362, 0.412, 21, 0.0);
        assert_eq!(pts.len(), 21);
        assert_relative_eq!(pts[0].z, 0.412, epsilon = 1e-12);
        assert_relative_eq!(pts[20].z, 0.412, epsilon = 1e-12);
        assert_relative_eq!(pts[10].z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pts[0].x, -0.681, epsilon = 1e-12);
    }

    #[test]
    fn straight_line_drops_by_height() {
        let pts = straight_line(2.0, 0.5, 12);
        assert_relative_eq!(pts[0].z - pts[11].z, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn looping_is_symmetric_in_height() {
        let pts = looping(21);
        assert_eq!(pts.len(), 21);
        assert_relative_eq!(pts[0].z, pts[20].z, epsilon = 1e-12);
        assert_relative_eq!(pts[10].z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn s_looping_has_seven_points() {
        let pts = s_looping(NVec3::new(45.0, 10.0, 60.0), 10.0, 5.0);
        assert_eq!(pts.len(), 7);
        assert_relative_eq!(pts[3].z, 70.0, epsilon = 1e-12);
        assert_relative_eq!(pts[6].y, 15.0, epsilon = 1e-12);
    }
}
