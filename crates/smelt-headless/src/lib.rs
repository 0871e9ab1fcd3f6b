//! Smelt headless runner - configuration, RON scenarios and snapshots
//! around a `smelt_core::Sandbox`

pub mod config;
pub mod scenario;
pub mod snapshot;

pub use config::HeadlessConfig;
