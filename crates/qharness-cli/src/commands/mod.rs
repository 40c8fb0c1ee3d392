//! CLI command implementations.

pub mod backends;
pub mod common;
pub mod linear;
pub mod sat;
pub mod scenarios;
pub mod suite;
pub mod version;
