//! Error handling logic

use thiserror::Error;

/// Failures surfaced by the simulation core.
///
/// The simulation itself is total over its valid input domain, so the only
/// errors are a rejected configuration and an attempt to send more photons
/// than a session planned for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bb84Error {
    /// Session parameters or photon plan were rejected at creation time.
    /// Values are never clamped; the caller must supply a valid configuration.
    #[error("Invalid Configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the configuration
        message: String,
    },

    /// `advance_one` was called after every planned photon had been sent.
    /// Recoverable: check `is_complete` first or treat this as a "done" signal.
    #[error("Session Exhausted: all {planned_count} planned photons have been sent")]
    Exhausted {
        /// Number of photons the session was created with
        planned_count: usize,
    },
}

impl Bb84Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Bb84Error::InvalidConfiguration { message: message.into() }
    }
}
