//! Core types and constants for viewtrack
//!
//! This crate contains the wire types and tunables shared across all other
//! crates.

mod constants;
mod env_config;
mod track;

pub use constants::*;
pub use env_config::*;
pub use track::*;
