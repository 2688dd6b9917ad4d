// tests/statistics_tests.rs
//
// Large-N behaviour of the channel. All runs are seeded, and tolerances are
// several standard deviations wide for the sifted-key sizes involved.

use bb84::{analyze, Bb84Error, EveBasisPolicy, KeySummary, SecurityStatus, SessionParameters, TransmissionSession};

const LARGE_N: usize = 10_000;

fn summarize(planned_count: usize, params: SessionParameters, seed: u64) -> Result<KeySummary, Bb84Error> {
    let mut session = TransmissionSession::with_seed(planned_count, params, seed)?;
    session.advance_all();
    Ok(analyze(session.records()))
}

fn assert_close(actual: f64, expected: f64, tolerance: f64, context: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{}: expected {:.2} ± {:.2}, got {:.2}",
        context,
        expected,
        tolerance,
        actual
    );
}

#[test]
fn test_full_interception_converges_to_25_percent() -> Result<(), Bb84Error> {
    let params = SessionParameters::builder().eve(100.0, EveBasisPolicy::Random).build();
    let summary = summarize(LARGE_N, params, 100)?;
    println!("{}", summary);

    assert_close(summary.qber_percent, 25.0, 2.0, "full intercept-resend");
    assert_eq!(summary.intercepted, LARGE_N);
    Ok(())
}

#[test]
fn test_qber_scales_with_interception_rate() -> Result<(), Bb84Error> {
    for (seed, percent) in [(200, 0.0), (201, 25.0), (202, 50.0), (203, 75.0)] {
        let params = SessionParameters::builder().eve(percent, EveBasisPolicy::Random).build();
        let summary = summarize(LARGE_N, params, seed)?;
        assert_close(summary.qber_percent, 25.0 * percent / 100.0, 2.0, &format!("Eve at {}%", percent));
    }
    Ok(())
}

#[test]
fn test_fixed_basis_eve_also_gives_25_percent() -> Result<(), Bb84Error> {
    // Alice's bases are random, so a fixed guess is still wrong half the time.
    for (seed, policy) in [(300, EveBasisPolicy::FixedRectilinear), (301, EveBasisPolicy::FixedDiagonal)] {
        let params = SessionParameters::builder().eve(100.0, policy).build();
        let summary = summarize(LARGE_N, params, seed)?;
        assert_close(summary.qber_percent, 25.0, 2.0, &format!("{:?}", policy));
    }
    Ok(())
}

#[test]
fn test_loss_shortens_the_key_without_adding_errors() -> Result<(), Bb84Error> {
    let settings = [
        (0.0, 0.0),
        (30.0, 0.0),
        (60.0, 0.0),
        (0.0, 150.0),
        (90.0, 0.0),
    ];
    let mut previous_length = usize::MAX;
    for (seed, (loss, distance)) in settings.into_iter().enumerate() {
        let params = SessionParameters::builder()
            .photon_loss_probability(loss)
            .distance_km(distance)
            .build();
        let summary = summarize(LARGE_N, params, 400 + seed as u64)?;

        assert_eq!(summary.qber_percent, 0.0, "loss {}%, {} km", loss, distance);
        assert_eq!(summary.security_status, SecurityStatus::Safe);
        assert!(summary.sifted_length < previous_length, "key should shrink as loss grows");
        previous_length = summary.sifted_length;
    }
    Ok(())
}

#[test]
fn test_distance_loss_rate() -> Result<(), Bb84Error> {
    // 100 km -> 50% loss under the linear model
    let params = SessionParameters::builder().distance_km(100.0).build();
    let summary = summarize(LARGE_N, params, 500)?;
    assert_close(summary.lost as f64 / LARGE_N as f64, 0.5, 0.03, "100 km loss fraction");
    Ok(())
}

#[test]
fn test_noise_sets_the_error_floor() -> Result<(), Bb84Error> {
    let params = SessionParameters::builder().channel_noise_probability(10.0).build();
    let summary = summarize(LARGE_N, params, 600)?;
    assert_close(summary.qber_percent, 10.0, 2.0, "10% channel noise");
    assert_eq!(summary.intercepted, 0);
    Ok(())
}

#[test]
fn test_random_bases_sift_about_half() -> Result<(), Bb84Error> {
    let summary = summarize(LARGE_N, SessionParameters::default(), 700)?;
    assert_close(summary.sift_ratio(), 0.5, 0.03, "sift ratio");
    assert_eq!(summary.sifted_length + summary.basis_mismatched, LARGE_N);
    Ok(())
}

#[test]
fn test_thousand_photon_attack_is_flagged() -> Result<(), Bb84Error> {
    let params = SessionParameters::builder().eve(100.0, EveBasisPolicy::Random).build();
    let summary = summarize(1_000, params, 800)?;

    assert!(
        (20.0..=30.0).contains(&summary.qber_percent),
        "QBER {} outside [20, 30]",
        summary.qber_percent
    );
    assert_ne!(summary.security_status, SecurityStatus::Safe);
    assert_eq!(summary.security_status, SecurityStatus::from_qber(summary.qber_percent));
    Ok(())
}
