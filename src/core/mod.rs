// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

pub use error::Bb84Error;
pub use state::{Basis, Bit, Polarization};

pub mod constants;
pub use constants::bb84_constants::{DANGER_QBER_LIMIT, SAFE_QBER_LIMIT}; // Re-export
