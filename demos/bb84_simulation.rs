use qkd_sim::prelude::*;

fn main() {
    env_logger::init();

    let config = Bb84Config::default();
    let mut channel = LocalChannel::new();
    let mut source = RandomSource::new();

    let run = qkd_sim::bb84::run_session(&config, &mut channel, &mut source)
        .expect("channel backend failed");

    println!("BB84 session, n = {}, shots = {}", config.n, config.shots);
    println!("Alice bits:  {}", qkd_sim::basis::format_bits(&run.alice_bits));
    println!("Sifted key:  {}", qkd_sim::basis::format_bits(&run.sifted_key));
    println!("QBER:        {:.4}", run.qber);

    match run.result {
        SessionResult::Secure { key, digest } => {
            println!("Key accepted ({} bits)", key.len());
            println!("Amplified digest: {}", digest);
        }
        SessionResult::Insecure { reason, statistic } => {
            println!("Key rejected: {} (statistic {:.4})", reason, statistic.value());
        }
    }
}
