use qkd_sim::prelude::*;

fn main() {
    env_logger::init();

    let config = E91Config { pairs: 1000 };
    let mut channel = LocalChannel::new();
    let mut source = RandomSource::new();

    let run = qkd_sim::e91::run_session(&config, &mut channel, &mut source)
        .expect("entangled source failed");

    println!("E91 session, {} entangled pairs", config.pairs);
    println!("CHSH S = {:.4}", run.chsh.s);
    for (k, e) in run.chsh.correlations.iter().enumerate() {
        match e {
            Some(e) => println!("  E{} = {:+.4}", k, e),
            None => println!("  E{} undefined (no rounds)", k),
        }
    }
    println!(
        "Bell-test rounds consumed: {}, key rounds: {}",
        run.chsh.chsh_indices.len(),
        run.raw_key.len()
    );

    match run.result {
        SessionResult::Secure { key, digest } => {
            println!("Entanglement confirmed, key accepted ({} bits)", key.len());
            println!("Amplified digest: {}", digest);
        }
        SessionResult::Insecure { reason, statistic } => {
            println!("Session rejected: {} (S = {:.4})", reason, statistic.value());
        }
    }
}
