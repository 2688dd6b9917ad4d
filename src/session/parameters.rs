// src/session/parameters.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::EveBasisPolicy;
use crate::core::Bb84Error;
use crate::validation::validate_parameters;

/// Immutable snapshot of the channel configuration for one session.
///
/// Probabilities are percentages (0-100). Changing any value means building
/// a new session; a running session never sees its parameters change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionParameters {
    /// Whether an eavesdropper sits on the channel.
    pub eve_enabled: bool,
    /// Chance (percent) that Eve intercepts a given photon.
    pub eve_intercept_probability: f64,
    /// How Eve chooses her measurement basis.
    pub eve_basis_policy: EveBasisPolicy,
    /// Chance (percent) that a detected bit is flipped by noise.
    pub channel_noise_probability: f64,
    /// Direct photon loss (percent), independent of distance.
    pub photon_loss_probability: f64,
    /// Fibre length; contributes loss through `channel::attenuate`.
    pub distance_km: f64,
    /// Bob copies Alice's basis instead of choosing his own.
    pub force_match_bases: bool,
}

impl Default for SessionParameters {
    fn default() -> Self {
        Self {
            eve_enabled: false,
            eve_intercept_probability: 100.0,
            eve_basis_policy: EveBasisPolicy::Random,
            channel_noise_probability: 0.0,
            photon_loss_probability: 0.0,
            distance_km: 0.0,
            force_match_bases: false,
        }
    }
}

impl SessionParameters {
    /// Starts a builder from the default (ideal, Eve-free) channel.
    pub fn builder() -> SessionParametersBuilder {
        SessionParametersBuilder::new()
    }

    /// Checks every field without modifying anything.
    pub fn validate(&self) -> Result<(), Bb84Error> {
        validate_parameters(self)
    }
}

impl fmt::Display for SessionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eve_enabled {
            write!(f, "Eve {}% ({:?})", self.eve_intercept_probability, self.eve_basis_policy)?;
        } else {
            write!(f, "no Eve")?;
        }
        write!(
            f,
            ", noise {}%, loss {}%, {} km{}",
            self.channel_noise_probability,
            self.photon_loss_probability,
            self.distance_km,
            if self.force_match_bases { ", forced bases" } else { "" }
        )
    }
}

/// Method-chaining construction of [`SessionParameters`].
///
/// `build` does not validate; sessions validate when they are created.
#[derive(Debug, Clone, Default)]
pub struct SessionParametersBuilder {
    parameters: SessionParameters,
}

impl SessionParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables Eve with the given interception chance and basis policy.
    pub fn eve(mut self, intercept_probability: f64, policy: EveBasisPolicy) -> Self {
        self.parameters.eve_enabled = true;
        self.parameters.eve_intercept_probability = intercept_probability;
        self.parameters.eve_basis_policy = policy;
        self
    }

    pub fn eve_enabled(mut self, enabled: bool) -> Self {
        self.parameters.eve_enabled = enabled;
        self
    }

    pub fn eve_intercept_probability(mut self, percent: f64) -> Self {
        self.parameters.eve_intercept_probability = percent;
        self
    }

    pub fn eve_basis_policy(mut self, policy: EveBasisPolicy) -> Self {
        self.parameters.eve_basis_policy = policy;
        self
    }

    pub fn channel_noise_probability(mut self, percent: f64) -> Self {
        self.parameters.channel_noise_probability = percent;
        self
    }

    pub fn photon_loss_probability(mut self, percent: f64) -> Self {
        self.parameters.photon_loss_probability = percent;
        self
    }

    pub fn distance_km(mut self, km: f64) -> Self {
        self.parameters.distance_km = km;
        self
    }

    pub fn force_match_bases(mut self, force: bool) -> Self {
        self.parameters.force_match_bases = force;
        self
    }

    pub fn build(self) -> SessionParameters {
        self.parameters
    }
}
