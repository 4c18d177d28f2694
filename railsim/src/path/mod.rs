//! Rail geometry: spline fit through waypoints, derived fields, lookups.
//!
//! waypoints -> [`spline::resample_waypoints`] -> [`Path`] -> [`Path::at`] / [`PathCursor`]

pub mod fields;
pub mod query;
pub mod shapes;
pub mod spline;

pub use fields::{gradient, Path, MIN_SAMPLES, TANGENT_TOLERANCE};
pub use query::{PathCursor, PathSample};
pub use spline::{chord_parameters, resample_waypoints, CubicSpline3, DEFAULT_RESAMPLE_FACTOR, MIN_WAYPOINTS};
