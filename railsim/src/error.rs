//! Error and warning types for path construction, parameters and tables.
//!
//! Every geometry or parameter error is raised once, while a scenario is
//! being assembled. Stepping the integrator never fails: reaching the end of
//! the track or the end of the step budget are normal terminal states.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`Path`](crate::path::Path).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Too few waypoints for a cubic fit.
    #[error("insufficient waypoints: need at least {required}, got {found}")]
    InsufficientData { required: usize, found: usize },

    /// Two consecutive points coincide, so the curve parameter does not advance.
    #[error("degenerate parameterization: zero separation after point {index}")]
    DegenerateParameterization { index: usize },

    /// Too few resampled points to estimate a second derivative.
    #[error("insufficient samples: need at least {required}, got {found}")]
    InsufficientSamples { required: usize, found: usize },
}

/// Non-fatal diagnostics attached to a built path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathWarning {
    /// Tangent magnitude drifts away from 1, usually a sign of too coarse resampling.
    #[error("numerical ill-conditioning: |T| deviates from 1 by {deviation:.3e} at sample {index}")]
    NumericalIllConditioning { index: usize, deviation: f64 },
}

/// Errors raised while validating ball and run parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The ball cannot sit on the rails: r must exceed b/2.
    #[error("invalid geometry: ball radius {radius} must exceed half the rail separation ({gauge} / 2)")]
    InvalidGeometry { radius: f64, gauge: f64 },

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Errors raised while reading or writing flat numeric tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: expected at least {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while assembling a runnable scenario from configuration.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("invalid track configuration: {0}")]
    InvalidTrack(String),

    #[error("integration needs either `steps` or `t_end`")]
    MissingRunLength,
}
