//! Core types and utilities for the garden simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod species;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use species::*;
