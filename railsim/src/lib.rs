pub mod error;
pub mod path;
pub mod simulation;
pub mod configuration;
pub mod io;
pub mod analysis;
pub mod benchmark;

pub use error::{PathError, PathWarning, ParamError, TableError, ScenarioError};

pub use path::{Path, PathCursor, PathSample};

pub use simulation::states::{BallState, Trajectory, NVec3};
pub use simulation::params::{BallParams, RunParams};
pub use simulation::engine::Engine;
pub use simulation::forces::{TangentialForce, ForceSet, Gravity, RollingFriction, RollingDynamics, LocalGeometry, tangential_acceleration};
pub use simulation::energy::{EnergyRecord, energy_series};
pub use simulation::integrator::{integrate, simulate, RunOutput, RunState};
pub use simulation::scenario::Scenario;

pub use configuration::config::{IntegratorConfig, ShapeConfig, TrackConfig, BallConfig, IntegrationConfig, ScenarioConfig};

pub use io::tables::ReferenceData;
pub use analysis::compare::{compare, Comparison};

pub use benchmark::benchmark::{bench_path_query, bench_integrator};
