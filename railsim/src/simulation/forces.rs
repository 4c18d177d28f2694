//! Tangential force terms for a ball rolling on a curved rail
//!
//! Conventions: z is up, so gravity is g⃗ = (0, 0, -g). `T` is the unit
//! tangent towards increasing arc-length and `C` the curvature vector.
//!
//! - gravity along the rail:  g_s = g⃗·T = -g·T_z
//! - gravity across the rail: g⃗_n = g⃗ - g_s·T
//! - rail reaction per unit mass: N⃗ = Vs²·C - g⃗_n
//! - rolling friction: -e·Vs·|N⃗| / h, opposite to the sign of Vs
//!
//! The summed terms are divided by the inertia coefficient of the rolling
//! sphere to give the tangential acceleration.

use crate::simulation::params::{inertia_coefficient, BallParams};
use crate::simulation::states::NVec3;

/// Local rail geometry seen by the force terms
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalGeometry {
    pub tangent: NVec3,   // T
    pub curvature: NVec3, // C
}

/// Collection of tangential force terms (per unit mass).
/// Each term implements [`TangentialForce`] and their contributions are summed
pub struct ForceSet {
    terms: Vec<Box<dyn TangentialForce + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: TangentialForce + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum of all tangential contributions at speed `vs`
    pub fn accumulate(&self, vs: f64, geom: &LocalGeometry) -> f64 {
        self.terms.iter().map(|term| term.tangential(vs, geom)).sum()
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for tangential force sources (force per unit mass along T)
pub trait TangentialForce {
    fn tangential(&self, vs: f64, geom: &LocalGeometry) -> f64;
}

/// Gravity in a z-up frame
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gravity {
    pub g: f64, // gravitational acceleration
}

impl Gravity {
    pub fn vector(&self) -> NVec3 {
        NVec3::new(0.0, 0.0, -self.g)
    }

    /// g_s = g⃗·T
    pub fn along(&self, tangent: &NVec3) -> f64 {
        self.vector().dot(tangent)
    }

    /// g⃗_n = g⃗ - g_s·T
    pub fn across(&self, tangent: &NVec3) -> NVec3 {
        self.vector() - self.along(tangent) * *tangent
    }
}

impl TangentialForce for Gravity {
    fn tangential(&self, _vs: f64, geom: &LocalGeometry) -> f64 {
        self.along(&geom.tangent)
    }
}

/// Rolling resistance proportional to speed and to the rail reaction
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RollingFriction {
    pub gravity: Gravity,
    pub e: f64, // friction coefficient
    pub h: f64, // contact offset
}

impl RollingFriction {
    /// N⃗ = Vs²·C - g⃗_n, reaction per unit mass needed to keep the ball on the rail
    pub fn normal_force(&self, vs: f64, geom: &LocalGeometry) -> NVec3 {
        vs * vs * geom.curvature - self.gravity.across(&geom.tangent)
    }
}

impl TangentialForce for RollingFriction {
    fn tangential(&self, vs: f64, geom: &LocalGeometry) -> f64 {
        -self.e * vs * self.normal_force(vs, geom).norm() / self.h
    }
}

/// DynamicsModel: tangential acceleration of the ball for a given speed and geometry
pub struct RollingDynamics {
    forces: ForceSet,
    inertia: f64, // effective-mass divisor
}

impl RollingDynamics {
    /// Gravity plus rolling friction for the given ball
    pub fn new(params: &BallParams) -> Self {
        let gravity = Gravity { g: params.g() };
        let forces = ForceSet::new().with(gravity).with(RollingFriction {
            gravity,
            e: params.e(),
            h: params.h(),
        });
        Self {
            forces,
            inertia: params.inertia(),
        }
    }

    /// Custom force terms with an explicit inertia coefficient
    pub fn from_parts(forces: ForceSet, inertia: f64) -> Self {
        Self { forces, inertia }
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn acceleration(&self, vs: f64, geom: &LocalGeometry) -> f64 {
        self.forces.accumulate(vs, geom) / self.inertia
    }
}

/// Tangential acceleration from raw inputs, for one-off evaluations.
///
/// `h` must be positive; [`BallParams::new`] guarantees that for runs.
pub fn tangential_acceleration(vs: f64, tangent: NVec3, curvature: NVec3, h: f64, e: f64, r: f64, g: f64) -> f64 {
    let gravity = Gravity { g };
    let friction = RollingFriction { gravity, e, h };
    let geom = LocalGeometry { tangent, curvature };
    (gravity.tangential(vs, &geom) + friction.tangential(vs, &geom)) / inertia_coefficient(r, h)
}
