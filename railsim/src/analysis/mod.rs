pub mod compare;

pub use compare::{compare, Comparison, ErrorStats};
