pub mod tables;

pub use tables::{
    load_reference, load_waypoints, read_reference, read_waypoints, save_trajectory, save_waypoints, write_trajectory,
    write_waypoints, ReferenceData,
};
