//! Protocol and channel constants shared across the simulation.

/// Constants fixed by the BB84 protocol or by the teaching channel model.
pub mod bb84_constants {
    /// QBER (percent) below which the key is considered safe.
    /// The intercept-resend detection bound used in the experiments.
    pub const SAFE_QBER_LIMIT: f64 = 11.0;
    /// QBER (percent) above which the channel is considered compromised.
    /// A full intercept-resend attack produces 25% on the sifted key.
    pub const DANGER_QBER_LIMIT: f64 = 25.0;
    /// Distance (km) at which the linear attenuation model reaches 100% loss before capping.
    pub const ATTENUATION_LENGTH_KM: f64 = 200.0;
    /// Upper bound on the distance-derived loss probability.
    pub const MAX_DISTANCE_LOSS: f64 = 0.9;
    /// Probabilities closer than this to 0 or 1 are snapped to the exact value.
    pub const PROBABILITY_TOLERANCE: f64 = 1e-12;
}
