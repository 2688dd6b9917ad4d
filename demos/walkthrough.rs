//! Walks through one small BB84 exchange photon by photon, printing the bit
//! table the way the experiment pages show it, then the key summary.
//!
//! Run with `RUST_LOG=bb84=trace` to see the per-photon log lines.

use bb84::{
    Bb84Error, EveAction, EveBasisPolicy, PhotonEvent, PhotonRecord, SessionParameters, TransmissionSession,
};
use tracing_subscriber::EnvFilter;

fn print_row(record: &PhotonRecord) {
    let eve = match record.eavesdropper {
        None => "   -   ".to_string(),
        Some(EveAction::PassedThrough) => "  pass ".to_string(),
        Some(EveAction::Intercepted(hit)) => format!(" {} -> {} ", hit.eve_basis, hit.resend_bit),
    };
    let bob = record.bob_measured_bit.map_or("lost".to_string(), |b| b.to_string());
    println!(
        "{:>3} | {}  {} | {} | {}  {:>4} | {:^5} | {}",
        record.index,
        record.alice_basis,
        record.alice_bit,
        eve,
        record.bob_basis,
        bob,
        if record.basis_match { "yes" } else { "no" },
        if record.is_error { "ERROR" } else { "" },
    );
}

fn main() -> Result<(), Bb84Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("--- bb84 Walkthrough: 24 photons, Eve on half of them, 20 km of fibre ---");

    let params = SessionParameters::builder()
        .eve(50.0, EveBasisPolicy::Random)
        .distance_km(20.0)
        .build();
    let mut session = TransmissionSession::with_seed(24, params, 2024)?;
    println!("Parameters: {}", session.parameters());

    // Show the individual stages of the first photon
    let first = session.plan()[0];
    let mut rng = bb84::random::seeded(7);
    let mut event = PhotonEvent::new(1, first.alice(), first.bob_basis, session.parameters());
    print!("\nStages of a sample photon {}:", first.alice());
    while !event.is_finished() {
        print!(" -> {}", event.step(&mut rng));
    }
    println!("\n");

    println!("  # | Alice | Eve     | Bob     | match |");
    println!("----+-------+---------+---------+-------+------");

    // Send a few photons one at a time, as with the "send next" button...
    for _ in 0..4 {
        let record = session.advance_one()?;
        print_row(record);
    }
    // ...then burst the remainder, printing each row as it is emitted
    session.advance_all_observed(&mut |record: &PhotonRecord| print_row(record));

    let summary = session.summary();
    println!("\n{}", summary);
    println!("Bob's sifted key:   {}", summary.key_string());
    println!(
        "Alice's sifted key: {}",
        summary.alice_sifted_bits.iter().map(|b| b.to_string()).collect::<String>()
    );
    println!("{}", summary.security_status.verdict());

    Ok(())
}
