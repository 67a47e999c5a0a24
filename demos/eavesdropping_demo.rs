//! Intercept-resend eavesdropping against BB84: sweep Eve's interception
//! ratio and watch the QBER climb past the acceptance threshold.

use qkd_sim::prelude::*;

fn main() {
    env_logger::init();

    let config = Bb84Config {
        n: 512,
        shots: 32,
        ..Default::default()
    };

    println!("BB84 under intercept-resend, n = {}, threshold = {}", config.n, config.qber_threshold);
    for &ratio in &[0.0, 0.25, 0.5, 0.75, 1.0] {
        let inner = LocalChannel::new();
        let mut tapped = InterceptResend::new(inner, ratio);
        let mut source = RandomSource::new();

        let run = qkd_sim::bb84::run_session(&config, &mut tapped, &mut source)
            .expect("channel backend failed");

        let verdict = if run.result.is_secure() { "accepted" } else { "REJECTED" };
        println!(
            "  eve_ratio {:.2} -> QBER {:.4}, key {}",
            ratio, run.qber, verdict
        );
    }
}
