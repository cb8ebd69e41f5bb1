pub mod application;
pub mod config;
pub mod infrastructure;

pub use application::{agent, tooling};
pub use infrastructure::{manifest, model, server};
