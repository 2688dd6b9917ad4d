// src/photon/mod.rs

//! A single photon's trip from Alice, past an optional eavesdropper, to Bob.
//!
//! [`PhotonEvent`] is the state machine that applies the channel effects in
//! order; [`PhotonRecord`] is the complete, immutable result it produces.

mod event;
mod record;

pub use event::{run_photon, PhotonEvent, PhotonStage};
pub use record::{EveAction, PhotonRecord, PhotonStatus};
