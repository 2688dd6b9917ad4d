// src/photon/record.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::{Interception, MeasurementReason};
use crate::core::{Basis, Bit};

/// Lifecycle marker of a photon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotonStatus {
    /// Still travelling; only seen on an unfinished `PhotonEvent`.
    Pending,
    /// Reached Bob's detector.
    Detected,
    /// Never triggered Bob's detector.
    Lost,
}

/// Eve's involvement with a single photon, when an eavesdropper is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum EveAction {
    /// Eve was on the line but let this photon through.
    PassedThrough,
    /// Eve measured and resent this photon.
    Intercepted(Interception),
}

impl EveAction {
    pub fn intercepted(&self) -> bool {
        matches!(self, EveAction::Intercepted(_))
    }

    pub fn interception(&self) -> Option<&Interception> {
        match self {
            EveAction::Intercepted(hit) => Some(hit),
            EveAction::PassedThrough => None,
        }
    }
}

/// The full lifecycle of one simulated photon.
///
/// Produced once by [`PhotonEvent`](super::PhotonEvent); every field is
/// populated, so consumers never need to patch in missing keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotonRecord {
    /// 1-based position in the session.
    pub index: usize,
    pub alice_bit: Bit,
    pub alice_basis: Basis,
    pub bob_basis: Basis,
    /// `None` when no eavesdropper is modelled or the photon was lost first.
    pub eavesdropper: Option<EveAction>,
    /// `None` for a lost photon.
    pub bob_measured_bit: Option<Bit>,
    /// Alice and Bob used the same basis. Always `false` for a lost photon.
    pub basis_match: bool,
    /// Sifted bit that disagrees with Alice's.
    pub is_error: bool,
    pub status: PhotonStatus,
    /// Channel noise inverted Bob's raw reading.
    pub noise_flipped: bool,
    /// How Bob's detector produced its raw reading; `None` for a lost photon.
    pub measurement: Option<MeasurementReason>,
}

impl PhotonRecord {
    pub(crate) fn pending(index: usize, alice_bit: Bit, alice_basis: Basis, bob_basis: Basis) -> Self {
        Self {
            index,
            alice_bit,
            alice_basis,
            bob_basis,
            eavesdropper: None,
            bob_measured_bit: None,
            basis_match: false,
            is_error: false,
            status: PhotonStatus::Pending,
            noise_flipped: false,
            measurement: None,
        }
    }

    pub fn is_lost(&self) -> bool {
        self.status == PhotonStatus::Lost
    }

    /// Detected with matching bases: this photon contributes to the sifted key.
    pub fn is_sifted(&self) -> bool {
        self.basis_match && self.bob_measured_bit.is_some()
    }

    pub fn was_intercepted(&self) -> bool {
        self.eavesdropper.as_ref().is_some_and(EveAction::intercepted)
    }
}

impl fmt::Display for PhotonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bob_bit = self.bob_measured_bit.map_or_else(|| "-".to_string(), |b| b.to_string());
        let eve = match &self.eavesdropper {
            None => "-".to_string(),
            Some(EveAction::PassedThrough) => "pass".to_string(),
            Some(EveAction::Intercepted(hit)) => format!("{}{}", hit.eve_basis, hit.measured_bit),
        };
        write!(
            f,
            "#{:<4} A:{}{} Eve:{:<5} B:{}{} {:?}{}{}",
            self.index,
            self.alice_basis,
            self.alice_bit,
            eve,
            self.bob_basis,
            bob_bit,
            self.status,
            if self.basis_match { " match" } else { "" },
            if self.is_error { " ERROR" } else { "" },
        )
    }
}
