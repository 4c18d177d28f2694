//! Runtime engine settings
//!
//! Selects the time-stepping scheme and the optional behaviours of a run
//! (track-end stop, energy tracking).

use crate::configuration::config::IntegratorConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub integrator: IntegratorConfig, // symplectic_euler or explicit_euler
    pub stop_at_track_end: bool,      // hard stop once s passes the end of the rail
    pub track_energy: bool,           // record kinetic/potential energy per sample
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::SymplecticEuler,
            stop_at_track_end: true,
            track_energy: true,
        }
    }
}
