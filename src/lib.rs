//! # qkd-sim
//!
//! Simulation of two quantum key distribution protocols: BB84
//! (prepare-and-measure) and E91 (entanglement-based).
//!
//! The crate implements the classical side of each protocol: random bit and
//! basis generation, basis reconciliation (sifting), error-rate estimation
//! (QBER for BB84, the CHSH statistic for E91), the accept/reject security
//! decision, and privacy amplification of an accepted key. The quantum
//! preparation-and-measurement step sits behind the [`channel::QuantumChannel`]
//! trait; [`channel::LocalChannel`] is a closed-form probabilistic backend that
//! reproduces the required quantum statistics, and [`channel::ClassicalChannel`]
//! is a local-hidden-variable backend useful as a control.
//!
//! ## Protocol outline
//!
//! Both sessions run the same linear state machine:
//! Generate → Measure → Sift → Estimate → Accept/Reject → (Amplify).
//!
//! - BB84 accepts when the quantum bit error rate stays under a threshold
//!   (0.2 by default).
//! - E91 accepts when the CHSH statistic violates the classical bound,
//!   |S| > 2. A noiseless entangled source reaches |S| = 2√2 ≈ 2.83.
//!
//! A rejected session yields [`session::SessionResult::Insecure`] carrying the
//! offending statistic; the raw key is never amplified in that case.

pub mod basis;
pub mod bb84;
pub mod channel;
pub mod e91;
pub mod errors;
pub mod estimator;
pub mod privacy_amplification;
pub mod random;
pub mod session;
pub mod sifting;


pub mod prelude {
    pub use crate::basis::Basis;
    pub use crate::bb84::{Bb84Config, Bb84Run};
    pub use crate::channel::{
        ClassicalChannel, InterceptResend, LocalChannel, NoiseConfig, QuantumChannel,
    };
    pub use crate::e91::{E91Config, E91Run};
    pub use crate::errors::{ChannelError, SessionError};
    pub use crate::estimator::{ChshOutcome, ErrorStatistic};
    pub use crate::random::RandomSource;
    pub use crate::session::{RejectReason, SessionResult};
}
