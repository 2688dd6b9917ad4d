//! Sweeps Eve's interception probability and prints the resulting QBER next
//! to the intercept-resend prediction of 25% x interception rate. Finishes
//! with one run of every guided experiment.

use bb84::{Bb84Error, EveBasisPolicy, Experiment, SessionParameters, TransmissionSession};
use tracing_subscriber::EnvFilter;

const PHOTONS: usize = 5_000;

fn main() -> Result<(), Bb84Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("--- bb84 Example: QBER vs. interception rate ({} photons per run) ---", PHOTONS);
    println!("\n intercept | predicted | measured | sifted | status");
    for step in 0..=10 {
        let percent = step as f64 * 10.0;
        let params = SessionParameters::builder()
            .eve(percent, EveBasisPolicy::Random)
            .build();
        let mut session = TransmissionSession::with_seed(PHOTONS, params, step)?;
        session.advance_all();
        let summary = session.summary();
        println!(
            " {:>8.0}% | {:>8.1}% | {:>7.1}% | {:>6} | {}",
            percent,
            25.0 * percent / 100.0,
            summary.qber_percent,
            summary.sifted_length,
            summary.security_status
        );
    }

    println!("\n--- Guided experiments at their default settings ---");
    for experiment in Experiment::ALL {
        let preset = experiment.preset();
        let mut session = TransmissionSession::create(preset.default_photon_count, preset.parameters)?;
        session.advance_all();
        let summary = session.summary();
        println!(
            "{:<48} QBER {:>5.1}%  sifted {:>3}/{:<3}  {}",
            experiment.to_string(),
            summary.qber_percent,
            summary.sifted_length,
            summary.sent,
            summary.security_status
        );
    }

    Ok(())
}
