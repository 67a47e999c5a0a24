//! BB84 under depolarizing noise: sweep the flip rate and find where the
//! session starts rejecting keys.

use qkd_sim::prelude::*;

fn main() {
    env_logger::init();

    println!("BB84 under depolarizing noise, threshold = {}", Bb84Config::default().qber_threshold);
    for &rate in &[0.0, 0.05, 0.1, 0.15, 0.2, 0.3, 0.5] {
        let config = Bb84Config {
            n: 512,
            shots: 32,
            noise: NoiseConfig::depolarizing(rate),
            ..Default::default()
        };
        let mut channel = LocalChannel::new();
        let mut source = RandomSource::new();

        let run = qkd_sim::bb84::run_session(&config, &mut channel, &mut source)
            .expect("channel backend failed");

        let verdict = if run.result.is_secure() { "accepted" } else { "REJECTED" };
        println!("  rate {:.2} -> QBER {:.4}, key {}", rate, run.qber, verdict);
    }
}
