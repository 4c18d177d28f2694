//! Field lookup at an arbitrary arc-length.
//!
//! Linear interpolation between the two bracketing samples, clamped to the
//! first/last sample outside `[0, total_length]`. [`Path::at`] is stateless
//! and uses a binary search. [`PathCursor`] caches the last bracketing
//! segment per caller, which makes the sequential access pattern of the
//! integrator O(1) amortized while the `Path` itself stays shared and
//! read-only.

use crate::path::fields::Path;
use crate::simulation::states::NVec3;

/// Geometry of the rail at one arc-length value
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathSample {
    pub s: f64,            // queried arc-length (unclamped)
    pub position: NVec3,   // interpolated position
    pub tangent: NVec3,    // interpolated tangent T
    pub curvature: NVec3,  // interpolated curvature vector C
}

/// Where `s` falls relative to the tabulated arc-lengths
#[derive(Debug, Copy, Clone, PartialEq)]
enum Bracket {
    First,
    Last,
    Segment(usize, f64), // lower index and interpolation factor in [0, 1)
}

fn lerp(a: NVec3, b: NVec3, t: f64) -> NVec3 {
    a + (b - a) * t
}

impl Path {
    /// Interpolated geometry at arc-length `s`
    pub fn at(&self, s: f64) -> PathSample {
        let bracket = self.bracket_from(s, None);
        self.sample(s, bracket)
    }

    /// Interpolated position only
    pub fn position_at(&self, s: f64) -> NVec3 {
        self.at(s).position
    }

    /// Start a cursor for sequential queries
    pub fn cursor(&self) -> PathCursor<'_> {
        PathCursor { path: self, index: 0 }
    }

    fn bracket_from(&self, s: f64, hint: Option<usize>) -> Bracket {
        let arc = self.arc_lengths();
        let last = arc.len() - 1;

        // clamp outside the table (NaN falls through to First)
        if !(s > arc[0]) {
            return Bracket::First;
        }
        if s >= arc[last] {
            return Bracket::Last;
        }

        let lo = match hint {
            Some(i) if i < last && arc[i] <= s && s < arc[i + 1] => i,
            Some(i) if i + 1 < last && arc[i + 1] <= s && s < arc[i + 2] => i + 1,
            _ => arc.partition_point(|&a| a <= s) - 1,
        };

        let t = (s - arc[lo]) / (arc[lo + 1] - arc[lo]);
        Bracket::Segment(lo, t)
    }

    fn sample(&self, s: f64, bracket: Bracket) -> PathSample {
        let (pos, tan, curv) = (self.positions(), self.tangents(), self.curvatures());
        match bracket {
            Bracket::First => PathSample {
                s,
                position: pos[0],
                tangent: tan[0],
                curvature: curv[0],
            },
            Bracket::Last => {
                let i = pos.len() - 1;
                PathSample {
                    s,
                    position: pos[i],
                    tangent: tan[i],
                    curvature: curv[i],
                }
            }
            Bracket::Segment(i, t) => PathSample {
                s,
                position: lerp(pos[i], pos[i + 1], t),
                tangent: lerp(tan[i], tan[i + 1], t),
                curvature: lerp(curv[i], curv[i + 1], t),
            },
        }
    }
}

/// Per-caller lookup state over a shared [`Path`]
#[derive(Debug, Clone)]
pub struct PathCursor<'a> {
    path: &'a Path,
    index: usize, // last bracketing segment
}

impl<'a> PathCursor<'a> {
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Same result as [`Path::at`], reusing the previous segment when possible
    pub fn at(&mut self, s: f64) -> PathSample {
        let bracket = self.path.bracket_from(s, Some(self.index));
        if let Bracket::Segment(i, _) = bracket {
            self.index = i;
        }
        self.path.sample(s, bracket)
    }
}
