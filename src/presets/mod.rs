// src/presets/mod.rs

//! The guided experiments, expressed as configuration.
//!
//! Every experiment runs the same photon pipeline; they differ only in
//! starting parameters, photon-count limits and which knobs the student may
//! change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::channel::EveBasisPolicy;
use crate::session::SessionParameters;

/// A parameter the student can adjust in an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Knob {
    PhotonCount,
    EveEnabled,
    EveInterceptProbability,
    EveBasisPolicy,
    ChannelNoise,
    PhotonLoss,
    Distance,
}

/// The guided experiments, in teaching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Experiment {
    /// Bob always guesses Alice's basis; no Eve, no noise, no loss.
    IdealChannel,
    /// Independent bases on both sides: introduces sifting.
    RandomBases,
    /// Eve intercepts every photon in a random basis.
    Eavesdropper,
    /// Eve intercepts half the photons.
    PartialInterception,
    /// A noisy but honest channel.
    ChannelNoise,
    /// An honest channel that drops photons.
    PhotonLoss,
    /// Loss driven by fibre length.
    Distance,
    /// Eve, noise and distance together.
    FullAttack,
}

/// Starting configuration for one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentPreset {
    pub parameters: SessionParameters,
    pub default_photon_count: usize,
    /// Inclusive bounds of the photon-count slider.
    pub photon_count_range: RangeInclusive<usize>,
    /// Knobs the student may change; everything else is frozen.
    pub interactive: Vec<Knob>,
}

impl ExperimentPreset {
    /// Whether `count` is allowed by this experiment's slider.
    pub fn accepts_photon_count(&self, count: usize) -> bool {
        self.photon_count_range.contains(&count)
    }
}

impl Experiment {
    pub const ALL: [Experiment; 8] = [
        Experiment::IdealChannel,
        Experiment::RandomBases,
        Experiment::Eavesdropper,
        Experiment::PartialInterception,
        Experiment::ChannelNoise,
        Experiment::PhotonLoss,
        Experiment::Distance,
        Experiment::FullAttack,
    ];

    /// 1-based position in the course.
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|e| *e == self).map_or(0, |i| i + 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            Experiment::IdealChannel => "Ideal channel",
            Experiment::RandomBases => "Random bases and sifting",
            Experiment::Eavesdropper => "Intercept-resend eavesdropper",
            Experiment::PartialInterception => "Partial interception",
            Experiment::ChannelNoise => "Channel noise",
            Experiment::PhotonLoss => "Photon loss",
            Experiment::Distance => "Transmission distance",
            Experiment::FullAttack => "Eavesdropper on a real channel",
        }
    }

    pub fn preset(self) -> ExperimentPreset {
        let builder = SessionParameters::builder();
        let (parameters, interactive) = match self {
            Experiment::IdealChannel => (builder.force_match_bases(true).build(), vec![Knob::PhotonCount]),
            Experiment::RandomBases => (builder.build(), vec![Knob::PhotonCount]),
            Experiment::Eavesdropper => (
                builder.eve(100.0, EveBasisPolicy::Random).build(),
                vec![Knob::PhotonCount, Knob::EveEnabled, Knob::EveBasisPolicy],
            ),
            Experiment::PartialInterception => (
                builder.eve(50.0, EveBasisPolicy::Random).build(),
                vec![Knob::PhotonCount, Knob::EveInterceptProbability, Knob::EveBasisPolicy],
            ),
            Experiment::ChannelNoise => (builder.channel_noise_probability(5.0).build(), vec![Knob::PhotonCount, Knob::ChannelNoise]),
            Experiment::PhotonLoss => (builder.photon_loss_probability(30.0).build(), vec![Knob::PhotonCount, Knob::PhotonLoss]),
            Experiment::Distance => (builder.distance_km(50.0).build(), vec![Knob::PhotonCount, Knob::Distance]),
            Experiment::FullAttack => (
                builder
                    .eve(100.0, EveBasisPolicy::Random)
                    .channel_noise_probability(5.0)
                    .distance_km(50.0)
                    .build(),
                vec![Knob::PhotonCount, Knob::EveEnabled, Knob::EveInterceptProbability, Knob::ChannelNoise, Knob::Distance],
            ),
        };

        let (default_photon_count, photon_count_range) = match self {
            Experiment::IdealChannel | Experiment::RandomBases => (16, 1..=500),
            _ => (100, 16..=500),
        };

        ExperimentPreset { parameters, default_photon_count, photon_count_range, interactive }
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Experiment {}: {}", self.number(), self.title())
    }
}
