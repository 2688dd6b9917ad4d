// src/photon/event.rs
use std::fmt;

use super::record::{EveAction, PhotonRecord, PhotonStatus};
use crate::channel::{
    apply_loss, apply_noise, combined_loss_probability, eavesdrop, measure, Interception,
};
use crate::core::{Basis, Bit, Polarization};
use crate::random::RandomSource;
use crate::session::SessionParameters;

/// Where a photon is in its trip from Alice to Bob.
///
/// `Created → Prepared → (Intercepted | PassThrough) → Measured`, or
/// `Prepared → Lost` when the loss trial fires. `Measured` and `Lost` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotonStage {
    /// Index and plan assigned, nothing emitted yet.
    Created,
    /// Alice has encoded her bit in her basis.
    Prepared,
    /// Eve measured and replaced the photon.
    Intercepted,
    /// The photon crossed Eve's position untouched (or no Eve is modelled).
    PassThrough,
    /// Bob's detector fired and the record is classified.
    Measured,
    /// The photon never reached Bob.
    Lost,
}

impl PhotonStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, PhotonStage::Measured | PhotonStage::Lost)
    }
}

impl fmt::Display for PhotonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One photon advanced step by step through the channel pipeline.
///
/// Effects are applied in a single fixed order: loss, then eavesdropping,
/// then Bob's measurement, then channel noise. A lost photon skips every
/// later effect. Each call to [`step`](Self::step) performs exactly one
/// transition, which lets a caller inspect intermediate stages; most
/// callers use [`run_photon`] instead.
#[derive(Debug, Clone)]
pub struct PhotonEvent<'p> {
    params: &'p SessionParameters,
    stage: PhotonStage,
    /// The photon currently travelling towards Bob.
    carrier: Polarization,
    record: PhotonRecord,
}

impl<'p> PhotonEvent<'p> {
    /// Creates a pending photon. Nothing random happens until `step`.
    pub fn new(index: usize, alice: Polarization, bob_basis: Basis, params: &'p SessionParameters) -> Self {
        Self {
            params,
            stage: PhotonStage::Created,
            carrier: alice,
            record: PhotonRecord::pending(index, alice.bit, alice.basis, bob_basis),
        }
    }

    pub fn stage(&self) -> PhotonStage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage.is_terminal()
    }

    /// The record as populated so far.
    pub fn record(&self) -> &PhotonRecord {
        &self.record
    }

    /// Performs the next transition and returns the new stage.
    /// Calling this on a finished event is a no-op.
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> PhotonStage {
        self.stage = match self.stage {
            PhotonStage::Created => PhotonStage::Prepared,
            PhotonStage::Prepared => self.travel(rng),
            PhotonStage::Intercepted | PhotonStage::PassThrough => self.detect(rng),
            terminal => terminal,
        };
        self.stage
    }

    /// Consumes the event and returns its record. The status is still
    /// `Pending` if the event was not driven to a terminal stage.
    pub fn into_record(self) -> PhotonRecord {
        self.record
    }

    fn travel<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> PhotonStage {
        let loss = combined_loss_probability(self.params.photon_loss_probability, self.params.distance_km);
        if apply_loss(loss, rng).is_lost() {
            self.record.status = PhotonStatus::Lost;
            return PhotonStage::Lost;
        }

        if !self.params.eve_enabled {
            return PhotonStage::PassThrough;
        }

        match eavesdrop(self.carrier, self.params.eve_intercept_probability, self.params.eve_basis_policy, rng) {
            Some(hit) => self.intercepted(hit),
            None => {
                self.record.eavesdropper = Some(EveAction::PassedThrough);
                PhotonStage::PassThrough
            }
        }
    }

    fn intercepted(&mut self, hit: Interception) -> PhotonStage {
        self.carrier = hit.resent();
        self.record.eavesdropper = Some(EveAction::Intercepted(hit));
        PhotonStage::Intercepted
    }

    fn detect<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> PhotonStage {
        let raw = measure(self.carrier, self.record.bob_basis, rng);
        let noisy = apply_noise(raw.bit, self.params.channel_noise_probability, rng);

        let record = &mut self.record;
        record.measurement = Some(raw.reason);
        record.noise_flipped = noisy.flipped;
        record.bob_measured_bit = Some(noisy.bit);
        record.basis_match = record.alice_basis == record.bob_basis;
        record.is_error = record.basis_match && noisy.bit != record.alice_bit;
        record.status = PhotonStatus::Detected;
        PhotonStage::Measured
    }
}

/// Runs one photon through the whole pipeline and returns its final record.
pub fn run_photon<R: RandomSource + ?Sized>(
    index: usize,
    alice_bit: Bit,
    alice_basis: Basis,
    bob_basis: Basis,
    params: &SessionParameters,
    rng: &mut R,
) -> PhotonRecord {
    let mut event = PhotonEvent::new(index, Polarization::new(alice_basis, alice_bit), bob_basis, params);
    while !event.is_finished() {
        event.step(rng);
    }
    event.into_record()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::EveBasisPolicy;
    use crate::random::seeded;

    fn ideal() -> SessionParameters {
        SessionParameters::default()
    }

    #[test]
    fn test_stage_sequence_without_eve() {
        let params = ideal();
        let mut rng = seeded(10);
        let mut event = PhotonEvent::new(1, Polarization::new(Basis::Rectilinear, Bit::One), Basis::Rectilinear, &params);
        assert_eq!(event.stage(), PhotonStage::Created);
        assert_eq!(event.step(&mut rng), PhotonStage::Prepared);
        assert_eq!(event.step(&mut rng), PhotonStage::PassThrough);
        assert_eq!(event.record().status, PhotonStatus::Pending);
        assert_eq!(event.step(&mut rng), PhotonStage::Measured);
        assert_eq!(event.step(&mut rng), PhotonStage::Measured, "terminal stage is sticky");

        let record = event.into_record();
        assert_eq!(record.status, PhotonStatus::Detected);
        assert_eq!(record.bob_measured_bit, Some(Bit::One));
        assert!(record.basis_match);
        assert!(!record.is_error);
        assert_eq!(record.eavesdropper, None);
    }

    #[test]
    fn test_total_loss_is_terminal() {
        let params = SessionParameters::builder()
            .photon_loss_probability(100.0)
            .eve(100.0, EveBasisPolicy::Random)
            .channel_noise_probability(100.0)
            .build();
        let mut rng = seeded(11);
        for i in 1..=50 {
            let record = run_photon(i, Bit::Zero, Basis::Diagonal, Basis::Diagonal, &params, &mut rng);
            assert_eq!(record.status, PhotonStatus::Lost);
            assert_eq!(record.bob_measured_bit, None);
            assert!(!record.basis_match);
            assert!(!record.is_error);
            assert_eq!(record.eavesdropper, None);
            assert_eq!(record.measurement, None);
            assert!(!record.noise_flipped);
        }
    }

    #[test]
    fn test_noise_only_touches_what_bob_reads() {
        // Eve shares Alice's basis, so she reads Alice exactly unless noise
        // reached the photon before her; full noise then flips every bit Bob gets.
        let params = SessionParameters::builder()
            .eve(100.0, EveBasisPolicy::FixedDiagonal)
            .channel_noise_probability(100.0)
            .build();
        let mut rng = seeded(16);
        for i in 1..=200 {
            let alice_bit = if i % 2 == 0 { Bit::Zero } else { Bit::One };
            let record = run_photon(i, alice_bit, Basis::Diagonal, Basis::Diagonal, &params, &mut rng);
            match record.eavesdropper {
                Some(EveAction::Intercepted(hit)) => assert_eq!(hit.measured_bit, alice_bit, "#{}", i),
                other => panic!("#{}: expected an interception, got {:?}", i, other),
            }
            assert!(record.noise_flipped && record.is_error, "#{}", i);
            assert_eq!(record.bob_measured_bit, Some(alice_bit.flip()));
        }
    }

    #[test]
    fn test_interception_replaces_carrier() {
        let params = SessionParameters::builder().eve(100.0, EveBasisPolicy::FixedDiagonal).build();
        let mut rng = seeded(12);
        let mut event = PhotonEvent::new(1, Polarization::new(Basis::Rectilinear, Bit::Zero), Basis::Rectilinear, &params);
        event.step(&mut rng);
        assert_eq!(event.step(&mut rng), PhotonStage::Intercepted);
        match event.record().eavesdropper {
            Some(EveAction::Intercepted(hit)) => assert_eq!(hit.resent().basis, Basis::Diagonal),
            other => panic!("expected an interception, got {:?}", other),
        }
    }

    #[test]
    fn test_eve_pass_through_is_recorded() {
        let params = SessionParameters::builder().eve(0.0, EveBasisPolicy::Random).build();
        let mut rng = seeded(13);
        let record = run_photon(1, Bit::One, Basis::Diagonal, Basis::Diagonal, &params, &mut rng);
        assert_eq!(record.eavesdropper, Some(EveAction::PassedThrough));
        assert!(!record.was_intercepted());
        assert_eq!(record.bob_measured_bit, Some(Bit::One));
    }

    #[test]
    fn test_full_noise_flips_every_detected_bit() {
        let params = SessionParameters::builder().channel_noise_probability(100.0).build();
        let mut rng = seeded(14);
        let record = run_photon(3, Bit::Zero, Basis::Rectilinear, Basis::Rectilinear, &params, &mut rng);
        assert_eq!(record.bob_measured_bit, Some(Bit::One));
        assert!(record.noise_flipped);
        assert!(record.is_error);
        assert_eq!(record.index, 3);
    }

    #[test]
    fn test_mismatched_basis_is_never_an_error() {
        let params = SessionParameters::builder().channel_noise_probability(100.0).build();
        let mut rng = seeded(15);
        for i in 1..=100 {
            let record = run_photon(i, Bit::One, Basis::Rectilinear, Basis::Diagonal, &params, &mut rng);
            assert!(!record.basis_match);
            assert!(!record.is_error);
            assert!(record.bob_measured_bit.is_some());
        }
    }
}
