// src/analysis/mod.rs

//! Key statistics derived from a sequence of photon records.
//!
//! [`analyze`] is pure: it can be called on any prefix of a session's
//! records (for live displays) and never touches the records themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Bit, DANGER_QBER_LIMIT, SAFE_QBER_LIMIT};
use crate::photon::PhotonRecord;

/// Three-tier verdict on the sifted key's error rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecurityStatus {
    /// QBER below 11%.
    Safe,
    /// QBER from 11% to 25% inclusive.
    Beware,
    /// QBER above 25%.
    Danger,
}

impl SecurityStatus {
    /// Classifies a QBER given in percent.
    pub fn from_qber(qber_percent: f64) -> Self {
        if qber_percent < SAFE_QBER_LIMIT {
            SecurityStatus::Safe
        } else if qber_percent <= DANGER_QBER_LIMIT {
            SecurityStatus::Beware
        } else {
            SecurityStatus::Danger
        }
    }

    /// Banner text shown next to the QBER gauge.
    pub fn verdict(self) -> &'static str {
        match self {
            SecurityStatus::Safe => "Secure: error rate is within the tolerable range for BB84.",
            SecurityStatus::Beware => "Warning: elevated error rate, possible eavesdropping or a noisy channel.",
            SecurityStatus::Danger => "Insecure: error rate too high, discard the key.",
        }
    }
}

impl fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Statistics over a set of records. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySummary {
    /// Number of sifted (detected, basis-matched) photons.
    pub sifted_length: usize,
    /// Sifted photons whose bit differs from Alice's.
    pub error_count: usize,
    /// Error rate on the sifted key, percent, rounded to one decimal.
    pub qber_percent: f64,
    pub security_status: SecurityStatus,
    /// Bob's sifted key in detection order.
    pub sifted_key_bits: Vec<Bit>,
    /// Alice's bits at the same positions, for side-by-side comparison.
    pub alice_sifted_bits: Vec<Bit>,
    /// Records analysed.
    pub sent: usize,
    pub detected: usize,
    pub lost: usize,
    /// Detected but discarded during sifting.
    pub basis_mismatched: usize,
    /// Photons Eve measured and resent.
    pub intercepted: usize,
    /// Detected photons whose bit was flipped by channel noise.
    pub noise_flips: usize,
}

impl KeySummary {
    /// Fraction of sent photons that ended up in the sifted key (0.0-1.0).
    pub fn sift_ratio(&self) -> f64 {
        if self.sent == 0 { 0.0 } else { self.sifted_length as f64 / self.sent as f64 }
    }

    /// Bob's sifted key as a `0`/`1` string.
    pub fn key_string(&self) -> String {
        self.sifted_key_bits.iter().map(|b| if *b == Bit::One { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for KeySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key Summary:")?;
        writeln!(f, "  Sent: {} (detected {}, lost {})", self.sent, self.detected, self.lost)?;
        writeln!(f, "  Sifted: {} (discarded {} on basis mismatch)", self.sifted_length, self.basis_mismatched)?;
        writeln!(f, "  Errors: {}  QBER: {:.1}%  Status: {}", self.error_count, self.qber_percent, self.security_status)?;
        if self.intercepted > 0 || self.noise_flips > 0 {
            writeln!(f, "  Intercepted: {}  Noise flips: {}", self.intercepted, self.noise_flips)?;
        }
        Ok(())
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes sifted key, QBER and verdict for `records`.
///
/// A record is sifted when its bases match and Bob detected it. QBER is 0
/// when nothing was sifted.
pub fn analyze(records: &[PhotonRecord]) -> KeySummary {
    let sifted: Vec<&PhotonRecord> = records.iter().filter(|r| r.is_sifted()).collect();
    let error_count = sifted.iter().filter(|r| r.is_error).count();
    let qber_percent = if sifted.is_empty() {
        0.0
    } else {
        round1(error_count as f64 / sifted.len() as f64 * 100.0)
    };

    let detected = records.iter().filter(|r| r.bob_measured_bit.is_some()).count();

    KeySummary {
        sifted_length: sifted.len(),
        error_count,
        qber_percent,
        security_status: SecurityStatus::from_qber(qber_percent),
        sifted_key_bits: sifted.iter().filter_map(|r| r.bob_measured_bit).collect(),
        alice_sifted_bits: sifted.iter().map(|r| r.alice_bit).collect(),
        sent: records.len(),
        detected,
        lost: records.iter().filter(|r| r.is_lost()).count(),
        basis_mismatched: detected - sifted.len(),
        intercepted: records.iter().filter(|r| r.was_intercepted()).count(),
        noise_flips: records.iter().filter(|r| r.noise_flipped).count(),
    }
}
