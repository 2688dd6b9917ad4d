// src/lib.rs

//! `bb84` - A per-photon simulator of the BB84 quantum key distribution protocol
//!
//! Alice prepares photons, an optional eavesdropper intercepts and resends
//! them, the channel loses and scrambles some, and Bob measures what arrives.
//! The crate produces one complete record per photon and derives the sifted
//! key, QBER and a security verdict from those records. Rendering and
//! animation are left to the caller, which observes records as they are
//! emitted.

pub mod core;
pub mod random;
pub mod channel;
pub mod photon;
pub mod session;
pub mod analysis;
pub mod presets;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{Basis, Bb84Error, Bit, Polarization};
pub use channel::{attenuate, EveBasisPolicy, Interception};
pub use photon::{run_photon, EveAction, PhotonEvent, PhotonRecord, PhotonStage, PhotonStatus};
pub use session::{PlannedPhoton, RecordObserver, SessionParameters, TransmissionSession};
pub use analysis::{analyze, KeySummary, SecurityStatus};
pub use presets::{Experiment, ExperimentPreset};
pub use random::RandomSource;

// Example 1: The ideal teaching channel
// Bob always measures in Alice's basis and nobody is listening, so the
// sifted key is exactly Alice's bits and the QBER is zero.
/// ```
/// use bb84::{Basis, Bit, PlannedPhoton, SecurityStatus, SessionParameters, TransmissionSession, Bb84Error};
/// use bb84::random::seeded;
///
/// # fn main() -> Result<(), Bb84Error> {
/// let plan = vec![
///     PlannedPhoton::new(Bit::Zero, Basis::Rectilinear, Basis::Rectilinear),
///     PlannedPhoton::new(Bit::One, Basis::Rectilinear, Basis::Rectilinear),
///     PlannedPhoton::new(Bit::Zero, Basis::Diagonal, Basis::Diagonal),
///     PlannedPhoton::new(Bit::One, Basis::Diagonal, Basis::Diagonal),
/// ];
/// let params = SessionParameters::builder().force_match_bases(true).build();
/// let mut session = TransmissionSession::with_plan(plan, params, seeded(1))?;
///
/// // "Send next" twice, then "burst" the rest
/// session.advance_one()?;
/// session.advance_one()?;
/// session.advance_all();
///
/// let summary = session.summary();
/// println!("{}", summary);
/// assert_eq!(summary.sifted_length, 4);
/// assert_eq!(summary.key_string(), "0101");
/// assert_eq!(summary.qber_percent, 0.0);
/// assert_eq!(summary.security_status, SecurityStatus::Safe);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Catching an eavesdropper
// Eve intercepts every photon in a random basis. Half of her guesses are
// wrong, and each wrong guess gives Bob a random bit: about 25% errors on the
// sifted key.
/// ```
/// use bb84::{EveBasisPolicy, SecurityStatus, SessionParameters, TransmissionSession, Bb84Error};
///
/// # fn main() -> Result<(), Bb84Error> {
/// let params = SessionParameters::builder()
///     .eve(100.0, EveBasisPolicy::Random)
///     .build();
/// let mut session = TransmissionSession::with_seed(2_000, params, 42)?;
///
/// let mut errors_seen = 0;
/// session.advance_all_observed(&mut |record: &bb84::PhotonRecord| {
///     if record.is_error {
///         errors_seen += 1;
///     }
/// });
///
/// let summary = session.summary();
/// assert_eq!(summary.error_count, errors_seen);
/// assert!(summary.qber_percent > 18.0 && summary.qber_percent < 32.0);
/// // 25% sits on the Beware/Danger boundary; either way the key is not safe.
/// assert_ne!(summary.security_status, SecurityStatus::Safe);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
