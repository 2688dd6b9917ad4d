// src/validation/mod.rs

//! Checks on session configuration and on emitted photon records.
//!
//! Configuration checks are strict: out-of-range values are rejected, never
//! clamped. Record checks assert the invariants every `PhotonRecord` must
//! satisfy and are used by tests and debug builds.

use crate::channel::MeasurementReason;
use crate::core::Bb84Error;
use crate::photon::{PhotonRecord, PhotonStatus};
use crate::session::SessionParameters;

/// Rejects a session that would send no photons.
pub fn validate_planned_count(planned_count: usize) -> Result<(), Bb84Error> {
    if planned_count == 0 {
        return Err(Bb84Error::invalid("planned photon count must be at least 1"));
    }
    Ok(())
}

fn check_percent(name: &str, value: f64) -> Result<(), Bb84Error> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(Bb84Error::invalid(format!("{} must be within [0, 100], got {}", name, value)));
    }
    Ok(())
}

/// Verifies every probability is a percentage in [0, 100] and the distance
/// is a finite, non-negative number of kilometres.
///
/// The intercept probability is checked even when Eve is disabled, so a
/// preset cannot carry a bad value that only surfaces once Eve is switched on.
pub fn validate_parameters(parameters: &SessionParameters) -> Result<(), Bb84Error> {
    check_percent("eve intercept probability", parameters.eve_intercept_probability)?;
    check_percent("channel noise probability", parameters.channel_noise_probability)?;
    check_percent("photon loss probability", parameters.photon_loss_probability)?;
    if !parameters.distance_km.is_finite() || parameters.distance_km < 0.0 {
        return Err(Bb84Error::invalid(format!(
            "distance must be a non-negative number of km, got {}",
            parameters.distance_km
        )));
    }
    Ok(())
}

/// Checks the invariants of a single finished record.
///
/// * `basis_match` agrees with the two bases for detected photons.
/// * Lost photons have no measurement, no match and no error.
/// * Detected photons say how Bob's detector resolved them, and on an
///   untouched matched-basis photon only noise can make Bob disagree.
/// * An error implies a detected, basis-matched bit that differs from Alice's.
pub fn check_record(record: &PhotonRecord) -> Result<(), Bb84Error> {
    let fail = |what: &str| Err(Bb84Error::invalid(format!("record #{}: {}", record.index, what)));

    if record.index == 0 {
        return fail("index must be 1-based");
    }
    match record.status {
        PhotonStatus::Pending => return fail("record was never finished"),
        PhotonStatus::Lost => {
            if record.bob_measured_bit.is_some() || record.measurement.is_some() || record.basis_match || record.is_error {
                return fail("lost photon carries a measurement");
            }
            if record.eavesdropper.is_some() || record.noise_flipped {
                return fail("lost photon carries channel effects");
            }
        }
        PhotonStatus::Detected => {
            if record.bob_measured_bit.is_none() {
                return fail("detected photon has no measured bit");
            }
            if record.basis_match != (record.alice_basis == record.bob_basis) {
                return fail("basis_match disagrees with the bases");
            }
            let Some(reason) = record.measurement else {
                return fail("detected photon has no measurement reason");
            };
            // Bob reads Alice's own photon unless Eve replaced it
            if record.basis_match && !record.was_intercepted() {
                if reason != MeasurementReason::BasisAligned {
                    return fail("matched bases resolved by random collapse");
                }
                let disagrees = record.bob_measured_bit != Some(record.alice_bit);
                if disagrees != record.noise_flipped {
                    return fail("noise_flipped disagrees with Bob's bit");
                }
            }
        }
    }
    let expected_error = record.basis_match && record.bob_measured_bit.is_some_and(|b| b != record.alice_bit);
    if record.is_error != expected_error {
        return fail("is_error disagrees with the sifted bits");
    }
    Ok(())
}

/// Checks every record and that indices run 1, 2, 3, ... in order.
pub fn check_records(records: &[PhotonRecord]) -> Result<(), Bb84Error> {
    for (position, record) in records.iter().enumerate() {
        if record.index != position + 1 {
            return Err(Bb84Error::invalid(format!(
                "record at position {} has index {}",
                position, record.index
            )));
        }
        check_record(record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Basis, Bit};
    use crate::photon::EveAction;

    // Helper: a plausible detected record; a wrong matched-basis bit is blamed on noise
    fn detected(index: usize, alice: Bit, bob: Bit, basis_match: bool) -> PhotonRecord {
        PhotonRecord {
            index,
            alice_bit: alice,
            alice_basis: Basis::Rectilinear,
            bob_basis: if basis_match { Basis::Rectilinear } else { Basis::Diagonal },
            eavesdropper: None,
            bob_measured_bit: Some(bob),
            basis_match,
            is_error: basis_match && alice != bob,
            status: PhotonStatus::Detected,
            noise_flipped: basis_match && alice != bob,
            measurement: Some(if basis_match {
                MeasurementReason::BasisAligned
            } else {
                MeasurementReason::RandomCollapse
            }),
        }
    }

    #[test]
    fn test_parameter_ranges() {
        assert!(validate_parameters(&SessionParameters::default()).is_ok());

        let bad = [
            SessionParameters { channel_noise_probability: -0.1, ..Default::default() },
            SessionParameters { photon_loss_probability: 100.5, ..Default::default() },
            SessionParameters { eve_intercept_probability: f64::NAN, ..Default::default() },
            SessionParameters { distance_km: -1.0, ..Default::default() },
            SessionParameters { distance_km: f64::INFINITY, ..Default::default() },
        ];
        for params in bad {
            assert!(
                matches!(validate_parameters(&params), Err(Bb84Error::InvalidConfiguration { .. })),
                "accepted {:?}",
                params
            );
        }

        let edges = SessionParameters {
            channel_noise_probability: 100.0,
            photon_loss_probability: 0.0,
            distance_km: 500.0,
            ..Default::default()
        };
        assert!(validate_parameters(&edges).is_ok(), "long links are valid; attenuation caps the loss");
    }

    #[test]
    fn test_planned_count() {
        assert!(validate_planned_count(0).is_err());
        assert!(validate_planned_count(1).is_ok());
    }

    #[test]
    fn test_record_invariants() {
        assert!(check_record(&detected(1, Bit::Zero, Bit::One, true)).is_ok());
        assert!(check_record(&detected(1, Bit::Zero, Bit::One, false)).is_ok());

        let mut inconsistent = detected(2, Bit::Zero, Bit::One, true);
        inconsistent.is_error = false;
        assert!(check_record(&inconsistent).is_err());

        let mut lost = detected(3, Bit::Zero, Bit::Zero, true);
        lost.status = PhotonStatus::Lost;
        assert!(check_record(&lost).is_err(), "lost photons cannot keep a measurement");

        lost.bob_measured_bit = None;
        lost.measurement = None;
        lost.basis_match = false;
        lost.eavesdropper = Some(EveAction::PassedThrough);
        assert!(check_record(&lost).is_err());
        lost.eavesdropper = None;
        assert!(check_record(&lost).is_ok());
    }

    #[test]
    fn test_detected_record_consistency() {
        let mut unexplained = detected(4, Bit::One, Bit::One, true);
        unexplained.measurement = None;
        assert!(check_record(&unexplained).is_err(), "detected photons say how they were read");

        let mut silent_flip = detected(5, Bit::One, Bit::Zero, true);
        silent_flip.noise_flipped = false;
        assert!(check_record(&silent_flip).is_err(), "an untouched matched photon only differs through noise");

        // Eve's resend can make Bob disagree without any noise
        silent_flip.eavesdropper = Some(EveAction::Intercepted(crate::channel::Interception {
            eve_basis: Basis::Diagonal,
            measured_bit: Bit::Zero,
            resend_bit: Bit::Zero,
            resend_basis: Basis::Diagonal,
        }));
        assert!(check_record(&silent_flip).is_ok());

        let mut collapsed = detected(6, Bit::One, Bit::One, true);
        collapsed.measurement = Some(MeasurementReason::RandomCollapse);
        assert!(check_record(&collapsed).is_err());
    }

    #[test]
    fn test_record_sequence() {
        let records = vec![detected(1, Bit::One, Bit::One, true), detected(3, Bit::One, Bit::One, true)];
        assert!(check_records(&records).is_err());
        assert!(check_records(&records[..1]).is_ok());
    }
}
