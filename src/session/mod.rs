// src/session/mod.rs

//! A single run of the protocol under one parameter configuration.
//!
//! A [`TransmissionSession`] owns its photon plan, its records and its
//! random stream. There is no shared global state: each experiment owns a
//! session, and "apply settings" means building a new one.

mod parameters;

pub use parameters::{SessionParameters, SessionParametersBuilder};
pub use crate::channel::EveBasisPolicy;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::analysis::{analyze, KeySummary};
use crate::core::{Basis, Bb84Error, Bit, Polarization};
use crate::photon::{run_photon, PhotonRecord};
use crate::random::{entropy_seeded, seeded, RandomSource};
use crate::validation::{check_record, validate_parameters, validate_planned_count};

/// What Alice will send and which basis Bob will measure in, fixed before
/// the first photon leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPhoton {
    pub alice_bit: Bit,
    pub alice_basis: Basis,
    pub bob_basis: Basis,
}

impl PlannedPhoton {
    pub fn new(alice_bit: Bit, alice_basis: Basis, bob_basis: Basis) -> Self {
        Self { alice_bit, alice_basis, bob_basis }
    }

    /// The photon Alice prepares.
    pub fn alice(&self) -> Polarization {
        Polarization::new(self.alice_basis, self.alice_bit)
    }
}

/// Receives every record a session emits, in order, as soon as it exists.
///
/// Presentation code hooks in here to drive animation on its own clock.
pub trait RecordObserver {
    fn on_record(&mut self, record: &PhotonRecord);
}

impl<F: FnMut(&PhotonRecord)> RecordObserver for F {
    fn on_record(&mut self, record: &PhotonRecord) {
        self(record)
    }
}

/// Ordered, append-only photon exchange for one parameter snapshot.
#[derive(Debug, Clone)]
pub struct TransmissionSession<R = StdRng> {
    parameters: SessionParameters,
    plan: Vec<PlannedPhoton>,
    records: Vec<PhotonRecord>,
    rng: R,
}

impl TransmissionSession<StdRng> {
    /// Creates a session seeded from operating-system entropy.
    pub fn create(planned_count: usize, parameters: SessionParameters) -> Result<Self, Bb84Error> {
        Self::with_rng(planned_count, parameters, entropy_seeded())
    }

    /// Creates a reproducible session.
    pub fn with_seed(planned_count: usize, parameters: SessionParameters, seed: u64) -> Result<Self, Bb84Error> {
        Self::with_rng(planned_count, parameters, seeded(seed))
    }
}

impl<R: RandomSource> TransmissionSession<R> {
    /// Creates a session, drawing Alice's bits and bases and Bob's bases
    /// from `rng` up front.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `planned_count` is zero or any parameter is
    /// out of range.
    pub fn with_rng(planned_count: usize, parameters: SessionParameters, mut rng: R) -> Result<Self, Bb84Error> {
        validate_planned_count(planned_count).inspect_err(reject)?;
        validate_parameters(&parameters).inspect_err(reject)?;

        let plan = (0..planned_count)
            .map(|_| {
                let alice_bit = rng.random_bit();
                let alice_basis = rng.random_basis();
                let bob_basis = if parameters.force_match_bases { alice_basis } else { rng.random_basis() };
                PlannedPhoton::new(alice_bit, alice_basis, bob_basis)
            })
            .collect();

        Ok(Self::assemble(plan, parameters, rng))
    }

    /// Creates a session from an explicit plan, e.g. a worked classroom example.
    /// With `force_match_bases` set, each planned Bob basis is replaced by Alice's.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the plan is empty or any parameter is out of range.
    pub fn with_plan(plan: Vec<PlannedPhoton>, parameters: SessionParameters, rng: R) -> Result<Self, Bb84Error> {
        validate_planned_count(plan.len()).inspect_err(reject)?;
        validate_parameters(&parameters).inspect_err(reject)?;

        let plan = if parameters.force_match_bases {
            plan.into_iter().map(|p| PlannedPhoton { bob_basis: p.alice_basis, ..p }).collect()
        } else {
            plan
        };

        Ok(Self::assemble(plan, parameters, rng))
    }

    fn assemble(plan: Vec<PlannedPhoton>, parameters: SessionParameters, rng: R) -> Self {
        tracing::debug!(planned_count = plan.len(), parameters = %parameters, "Created transmission session");
        Self {
            records: Vec::with_capacity(plan.len()),
            parameters,
            plan,
            rng,
        }
    }

    /// Discards every record and starts over with new settings, continuing
    /// the same random stream.
    pub fn reset(self, planned_count: usize, parameters: SessionParameters) -> Result<Self, Bb84Error> {
        tracing::debug!(discarded = self.records.len(), "Resetting transmission session");
        Self::with_rng(planned_count, parameters, self.rng)
    }

    pub fn planned_count(&self) -> usize {
        self.plan.len()
    }

    pub fn parameters(&self) -> &SessionParameters {
        &self.parameters
    }

    pub fn plan(&self) -> &[PlannedPhoton] {
        &self.plan
    }

    /// Records emitted so far, in send order.
    pub fn records(&self) -> &[PhotonRecord] {
        &self.records
    }

    pub fn remaining(&self) -> usize {
        self.plan.len() - self.records.len()
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() == self.plan.len()
    }

    /// Key statistics over the records emitted so far.
    pub fn summary(&self) -> KeySummary {
        analyze(&self.records)
    }

    /// Sends the next planned photon.
    ///
    /// # Errors
    /// `Exhausted` once every planned photon has been sent.
    pub fn advance_one(&mut self) -> Result<&PhotonRecord, Bb84Error> {
        let Some(planned) = self.plan.get(self.records.len()).copied() else {
            tracing::debug!(planned_count = self.plan.len(), "Advance requested on a complete session");
            return Err(Bb84Error::Exhausted { planned_count: self.plan.len() });
        };

        let record = run_photon(
            self.records.len() + 1,
            planned.alice_bit,
            planned.alice_basis,
            planned.bob_basis,
            &self.parameters,
            &mut self.rng,
        );
        tracing::trace!(
            index = record.index,
            status = ?record.status,
            basis_match = record.basis_match,
            is_error = record.is_error,
            intercepted = record.was_intercepted(),
            "Photon recorded"
        );
        debug_assert!(check_record(&record).is_ok(), "malformed record {:?}", record);
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Sends every remaining photon and returns the records this call emitted.
    /// Equivalent to calling `advance_one` until exhausted.
    pub fn advance_all(&mut self) -> &[PhotonRecord] {
        self.advance_all_observed(&mut |_: &PhotonRecord| {})
    }

    /// `advance_one`, notifying `observer` of the new record.
    pub fn advance_one_observed<O: RecordObserver + ?Sized>(&mut self, observer: &mut O) -> Result<&PhotonRecord, Bb84Error> {
        let record = self.advance_one()?;
        observer.on_record(record);
        Ok(record)
    }

    /// `advance_all`, notifying `observer` of each record as it is emitted.
    pub fn advance_all_observed<O: RecordObserver + ?Sized>(&mut self, observer: &mut O) -> &[PhotonRecord] {
        let start = self.records.len();
        while !self.is_complete() {
            if self.advance_one_observed(observer).is_err() {
                break;
            }
        }
        tracing::debug!(sent = self.records.len() - start, "Burst transmission finished");
        &self.records[start..]
    }
}

fn reject(error: &Bb84Error) {
    tracing::warn!(error = %error, "Rejected session configuration");
}
