// src/random/mod.rs

//! Uniform sampling of bits, bases and Bernoulli trials.
//!
//! Every stochastic decision in the channel goes through [`RandomSource`].
//! Any `rand::Rng` is a `RandomSource`, so sessions can run on a seeded
//! `StdRng` (reproducible, used by tests) or on an entropy-seeded one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Basis, Bit};

/// Source of the independent random draws the simulation needs.
pub trait RandomSource {
    /// A uniformly random bit.
    fn random_bit(&mut self) -> Bit;

    /// A uniformly random basis.
    fn random_basis(&mut self) -> Basis;

    /// A single Bernoulli trial that succeeds with `probability` (0.0..=1.0).
    /// `0.0` never succeeds and `1.0` always succeeds.
    fn chance(&mut self, probability: f64) -> bool;
}

impl<R: Rng> RandomSource for R {
    fn random_bit(&mut self) -> Bit {
        Bit::from(self.random::<bool>())
    }

    fn random_basis(&mut self) -> Basis {
        if self.random::<bool>() { Basis::Diagonal } else { Basis::Rectilinear }
    }

    fn chance(&mut self, probability: f64) -> bool {
        // random::<f64>() samples [0, 1), so the endpoints are exact.
        self.random::<f64>() < probability
    }
}

/// A reproducible generator for a given seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A generator seeded from operating-system entropy.
pub fn entropy_seeded() -> StdRng {
    StdRng::from_os_rng()
}
