// src/core/state.rs

use num_complex::Complex;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use super::constants::bb84_constants::PROBABILITY_TOLERANCE;
use super::error::Bb84Error;

/// A classical bit carried by a photon.
///
/// Serialized as the integer `0` or `1` so the presentation layer can render
/// bit tables directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    /// Returns the opposite bit.
    pub fn flip(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> u8 {
        bit.as_u8()
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value { Bit::One } else { Bit::Zero }
    }
}

impl TryFrom<u8> for Bit {
    type Error = Bb84Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(Bb84Error::invalid(format!("bit must be 0 or 1, got {}", other))),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// The encoding/measurement frame of a photon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Basis {
    /// `+`: horizontal (0) / vertical (1)
    Rectilinear,
    /// `×`: 45° (0) / 135° (1)
    Diagonal,
}

impl Basis {
    /// The symbol used in the bit tables.
    pub fn symbol(self) -> char {
        match self {
            Basis::Rectilinear => '+',
            Basis::Diagonal => '×',
        }
    }

    /// The conjugate basis.
    pub fn other(self) -> Self {
        match self {
            Basis::Rectilinear => Basis::Diagonal,
            Basis::Diagonal => Basis::Rectilinear,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single-photon polarization state: a bit encoded in a basis.
///
/// The state is modelled as a Jones vector `[cos θ, sin θ]` with
/// θ ∈ {0°, 90°} for the rectilinear basis and {45°, 135°} for the
/// diagonal one. Measurement probabilities follow the Born rule
/// `|⟨observer|carrier⟩|²`, which for the two BB84 bases is exactly 1/0
/// when the bases agree and 1/2 when they are conjugate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polarization {
    pub basis: Basis,
    pub bit: Bit,
}

impl Polarization {
    pub fn new(basis: Basis, bit: Bit) -> Self {
        Self { basis, bit }
    }

    /// Jones vector `(cos θ, sin θ)` for polarization angle θ: 0° and 90°
    /// in the rectilinear basis, 45° and 135° in the diagonal one.
    pub fn amplitudes(&self) -> [Complex<f64>; 2] {
        let d = Complex::new(FRAC_1_SQRT_2, 0.0);
        match (self.basis, self.bit) {
            (Basis::Rectilinear, Bit::Zero) => [Complex::one(), Complex::zero()],
            (Basis::Rectilinear, Bit::One) => [Complex::zero(), Complex::one()],
            (Basis::Diagonal, Bit::Zero) => [d, d],
            (Basis::Diagonal, Bit::One) => [-d, d],
        }
    }

    /// Probability that a detector aligned with `observer` reads `Bit::One`
    /// when this photon arrives.
    ///
    /// Values within `PROBABILITY_TOLERANCE` of 0 or 1 are snapped, so
    /// same-basis measurements come out as exactly 0 or 1 and
    /// `channel::measure` can skip the random draw for them.
    pub fn probability_of_one(&self, observer: Basis) -> f64 {
        let one = Polarization::new(observer, Bit::One).amplitudes();
        let carrier = self.amplitudes();
        let overlap = one[0].conj() * carrier[0] + one[1].conj() * carrier[1];
        let p = overlap.norm_sqr();
        if p < PROBABILITY_TOLERANCE {
            0.0
        } else if p > 1.0 - PROBABILITY_TOLERANCE {
            1.0
        } else {
            p
        }
    }

    /// Arrow glyph used by the photon animation.
    pub fn symbol(&self) -> char {
        match (self.basis, self.bit) {
            (Basis::Rectilinear, Bit::Zero) => '→',
            (Basis::Rectilinear, Bit::One) => '↑',
            (Basis::Diagonal, Bit::Zero) => '↗',
            (Basis::Diagonal, Bit::One) => '↖',
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.basis, self.bit, self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_BASES: [Basis; 2] = [Basis::Rectilinear, Basis::Diagonal];
    const ALL_BITS: [Bit; 2] = [Bit::Zero, Bit::One];

    #[test]
    fn test_bit_conversions() {
        assert_eq!(Bit::try_from(0u8), Ok(Bit::Zero));
        assert_eq!(Bit::try_from(1u8), Ok(Bit::One));
        assert!(matches!(Bit::try_from(2u8), Err(Bb84Error::InvalidConfiguration { .. })));
        assert_eq!(Bit::Zero.flip(), Bit::One);
        assert_eq!(u8::from(Bit::One), 1);
        assert_eq!(Bit::from(true), Bit::One);
    }

    #[test]
    fn test_aligned_measurement_is_deterministic() {
        for basis in ALL_BASES {
            for bit in ALL_BITS {
                let p = Polarization::new(basis, bit).probability_of_one(basis);
                let expected = if bit == Bit::One { 1.0 } else { 0.0 };
                assert_eq!(p, expected, "aligned {} {}", basis, bit);
            }
        }
    }

    #[test]
    fn test_conjugate_measurement_is_uniform() {
        for basis in ALL_BASES {
            for bit in ALL_BITS {
                let p = Polarization::new(basis, bit).probability_of_one(basis.other());
                assert!((p - 0.5).abs() < 1e-9, "conjugate {} {} gave {}", basis, bit, p);
            }
        }
    }

    #[test]
    fn test_amplitudes_are_normalized() {
        for basis in ALL_BASES {
            for bit in ALL_BITS {
                let norm: f64 = Polarization::new(basis, bit).amplitudes().iter().map(|c| c.norm_sqr()).sum();
                assert!((norm - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_display_symbols() {
        assert_eq!(Basis::Rectilinear.to_string(), "+");
        assert_eq!(Basis::Diagonal.to_string(), "×");
        assert_eq!(Polarization::new(Basis::Diagonal, Bit::One).symbol(), '↖');
    }
}
