// src/channel/mod.rs

//! Stateless models of what can happen to a photon between Alice and Bob.
//!
//! Each function takes the upstream photon (or bit) plus the relevant
//! probability and returns an outcome that records *why* it came out the
//! way it did. Percent-valued knobs (interception, noise, direct loss) are
//! given on the 0-100 scale the experiments expose; `attenuate` and
//! `apply_loss` work on 0.0-1.0 probabilities.

use serde::{Deserialize, Serialize};

use crate::core::constants::bb84_constants::{ATTENUATION_LENGTH_KM, MAX_DISTANCE_LOSS};
use crate::core::{Basis, Bit, Polarization};
use crate::random::RandomSource;

/// How Eve picks the basis she measures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EveBasisPolicy {
    /// Always `+`.
    FixedRectilinear,
    /// Always `×`.
    FixedDiagonal,
    /// Uniformly random per photon.
    #[default]
    Random,
}

impl EveBasisPolicy {
    fn choose<R: RandomSource + ?Sized>(self, rng: &mut R) -> Basis {
        match self {
            EveBasisPolicy::FixedRectilinear => Basis::Rectilinear,
            EveBasisPolicy::FixedDiagonal => Basis::Diagonal,
            EveBasisPolicy::Random => rng.random_basis(),
        }
    }
}

/// Result of the loss trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossOutcome {
    /// The photon never reached Bob's detector.
    Lost,
    /// The photon continues down the channel.
    Transmitted,
}

impl LossOutcome {
    pub fn is_lost(self) -> bool {
        self == LossOutcome::Lost
    }
}

/// What Eve did to a photon she intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interception {
    /// Basis Eve measured in.
    pub eve_basis: Basis,
    /// Bit Eve read off Alice's photon.
    pub measured_bit: Bit,
    /// Bit encoded in the replacement photon.
    pub resend_bit: Bit,
    /// Basis of the replacement photon (always Eve's own basis).
    pub resend_basis: Basis,
}

impl Interception {
    /// The photon Eve sends on to Bob.
    pub fn resent(&self) -> Polarization {
        Polarization::new(self.resend_basis, self.resend_bit)
    }
}

/// Why a measurement produced the bit it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementReason {
    /// Observer and carrier bases agreed; the carrier bit was read back.
    BasisAligned,
    /// Bases were conjugate; the state collapsed to a uniformly random bit.
    RandomCollapse,
}

/// A detector reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub bit: Bit,
    pub reason: MeasurementReason,
}

/// Bit after channel noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseOutcome {
    pub bit: Bit,
    /// `true` when the noise inverted the input bit.
    pub flipped: bool,
}

/// Loss probability (0.0-0.9) for a fibre of `distance_km`.
///
/// Linear in distance and capped at 90%. Deliberately simpler than the
/// exponential attenuation of real fibre. Negative distances map to 0.
pub fn attenuate(distance_km: f64) -> f64 {
    (distance_km / ATTENUATION_LENGTH_KM).max(0.0).min(MAX_DISTANCE_LOSS)
}

/// Combines direct photon loss (percent) with distance attenuation into a
/// single loss probability (0.0-1.0). The two mechanisms are independent.
pub fn combined_loss_probability(photon_loss_percent: f64, distance_km: f64) -> f64 {
    let direct = (photon_loss_percent / 100.0).clamp(0.0, 1.0);
    1.0 - (1.0 - direct) * (1.0 - attenuate(distance_km))
}

/// One Bernoulli trial deciding whether the photon is lost.
pub fn apply_loss<R: RandomSource + ?Sized>(loss_probability: f64, rng: &mut R) -> LossOutcome {
    if rng.chance(loss_probability) { LossOutcome::Lost } else { LossOutcome::Transmitted }
}

/// Intercept-resend attack on Alice's photon.
///
/// With probability `intercept_percent / 100` Eve chooses a basis per
/// `policy`, measures `alice`, and resends her result in her own basis.
/// Returns `None` when she lets the photon through untouched.
pub fn eavesdrop<R: RandomSource + ?Sized>(
    alice: Polarization,
    intercept_percent: f64,
    policy: EveBasisPolicy,
    rng: &mut R,
) -> Option<Interception> {
    if !rng.chance(intercept_percent / 100.0) {
        return None;
    }
    let eve_basis = policy.choose(rng);
    let reading = measure(alice, eve_basis, rng);
    Some(Interception {
        eve_basis,
        measured_bit: reading.bit,
        resend_bit: reading.bit,
        resend_basis: eve_basis,
    })
}

/// Reads `carrier` with a detector aligned to `observer`.
///
/// The outcome follows the Born-rule probability of reading `Bit::One`.
/// When the bases agree that probability is exactly 0 or 1 and no
/// randomness is consumed; for conjugate BB84 bases it is 1/2.
pub fn measure<R: RandomSource + ?Sized>(carrier: Polarization, observer: Basis, rng: &mut R) -> Measurement {
    let p_one = carrier.probability_of_one(observer);
    if p_one == 0.0 || p_one == 1.0 {
        return Measurement { bit: Bit::from(p_one == 1.0), reason: MeasurementReason::BasisAligned };
    }
    Measurement {
        bit: Bit::from(rng.chance(p_one)),
        reason: MeasurementReason::RandomCollapse,
    }
}

/// Flips `bit` with probability `noise_percent / 100`.
pub fn apply_noise<R: RandomSource + ?Sized>(bit: Bit, noise_percent: f64, rng: &mut R) -> NoiseOutcome {
    if rng.chance(noise_percent / 100.0) {
        NoiseOutcome { bit: bit.flip(), flipped: true }
    } else {
        NoiseOutcome { bit, flipped: false }
    }
}
