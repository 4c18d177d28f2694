//! Physical and numerical parameters for a run
//!
//! `BallParams` holds the ball/rail constants and the two quantities derived
//! from them once, at construction:
//! - contact offset h = sqrt(r² - b²/4), height of the ball centre above the rail contact line
//! - inertia coefficient 1 + (2/5)·r²/h², effective-mass factor of a rolling solid sphere
//!
//! `RunParams` holds the step size and the step budget.

use crate::error::ParamError;

/// Standard gravity [m/s²]
pub const G_STANDARD: f64 = 9.81;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BallParams {
    g: f64,       // gravitational acceleration
    b: f64,       // rail-to-rail separation
    r: f64,       // ball radius
    e: f64,       // rolling-friction coefficient
    m: f64,       // mass, 1.0 gives specific energies
    h: f64,       // contact offset
    inertia: f64, // 1 + 2/5 r²/h²
}

fn check(name: &'static str, value: f64, valid: bool) -> Result<(), ParamError> {
    if value.is_finite() && valid {
        Ok(())
    } else {
        Err(ParamError::InvalidParameter { name, value })
    }
}

impl BallParams {
    /// Validate the constants and derive `h` and the inertia coefficient.
    ///
    /// Fails with [`ParamError::InvalidGeometry`] when r ≤ b/2 (the ball would
    /// fall between the rails, h = 0).
    pub fn new(g: f64, b: f64, r: f64, e: f64, m: f64) -> Result<Self, ParamError> {
        check("g", g, g > 0.0)?;
        check("b", b, b >= 0.0)?;
        check("e", e, e >= 0.0)?;
        check("m", m, m > 0.0)?;

        let h2 = r * r - 0.25 * b * b;
        if !r.is_finite() || r <= 0.0 || !(h2 > 0.0) {
            return Err(ParamError::InvalidGeometry { radius: r, gauge: b });
        }
        let h = h2.sqrt();

        Ok(Self {
            g,
            b,
            r,
            e,
            m,
            h,
            inertia: inertia_coefficient(r, h),
        })
    }

    /// Same ball with a different friction coefficient
    pub fn with_friction(self, e: f64) -> Result<Self, ParamError> {
        check("e", e, e >= 0.0)?;
        Ok(Self { e, ..self })
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn e(&self) -> f64 {
        self.e
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }
}

/// Effective-mass multiplier of a solid sphere rolling on two rails
pub fn inertia_coefficient(r: f64, h: f64) -> f64 {
    1.0 + 0.4 * r * r / (h * h)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RunParams {
    pub dt: f64,      // step size
    pub steps: usize, // step budget
}

impl RunParams {
    pub fn new(dt: f64, steps: usize) -> Result<Self, ParamError> {
        check("dt", dt, dt > 0.0)?;
        Ok(Self { dt, steps })
    }

    /// Budget of floor(t_end / dt) steps
    pub fn from_duration(dt: f64, t_end: f64) -> Result<Self, ParamError> {
        check("dt", dt, dt > 0.0)?;
        check("t_end", t_end, t_end >= 0.0)?;

        // `as usize` saturates, so reject counts that do not fit
        let steps = (t_end / dt).floor();
        check("t_end", t_end, steps < usize::MAX as f64)?;
        Ok(Self {
            dt,
            steps: steps as usize,
        })
    }

    pub fn t_end(&self) -> f64 {
        self.dt * self.steps as f64
    }
}
