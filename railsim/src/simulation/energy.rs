//! Energy bookkeeping for conservation diagnostics.
//!
//! Read-only: nothing here feeds back into the dynamics. With m = 1 the
//! values are specific energies (J/kg).

use crate::path::Path;
use crate::simulation::params::BallParams;
use crate::simulation::states::Trajectory;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct EnergyRecord {
    pub kinetic: f64,   // translational + rotational
    pub potential: f64, // relative to z = 0
}

impl EnergyRecord {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// Kinetic energy per unit mass, rotation included through the inertia coefficient
pub fn specific_kinetic_energy(vs: f64, inertia: f64) -> f64 {
    0.5 * inertia * vs * vs
}

pub fn specific_potential_energy(z: f64, g: f64) -> f64 {
    g * z
}

pub fn kinetic_energy(m: f64, vs: f64, inertia: f64) -> f64 {
    m * specific_kinetic_energy(vs, inertia)
}

pub fn potential_energy(m: f64, z: f64, g: f64) -> f64 {
    m * specific_potential_energy(z, g)
}

/// Energy of the ball at speed `vs` and height `z`
pub fn energy_record(params: &BallParams, vs: f64, z: f64) -> EnergyRecord {
    EnergyRecord {
        kinetic: kinetic_energy(params.m(), vs, params.inertia()),
        potential: potential_energy(params.m(), z, params.g()),
    }
}

/// Energies for every sample of an existing trajectory
pub fn energy_series(trajectory: &Trajectory, path: &Path, params: &BallParams) -> Vec<EnergyRecord> {
    let mut cursor = path.cursor();
    trajectory
        .s
        .iter()
        .zip(trajectory.vs.iter())
        .map(|(&s, &vs)| energy_record(params, vs, cursor.at(s).position.z))
        .collect()
}
