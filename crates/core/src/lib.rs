//! Core types for the TNS mirror
//!
//! This crate contains the spherical-coordinate codec and the catalog
//! record type shared across all other crates. No I/O happens here.

mod constants;
mod env_config;
mod error;
mod record;
mod sphere;

pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use record::*;
pub use sphere::*;
