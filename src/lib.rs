//! Banditry: epsilon-greedy, UCB and LinUCB multi-armed bandits.
//!
//! Every strategy implements the [`Bandit`] trait. Each round the caller asks
//! the strategy to `play` an arm, observes a reward from its environment, and
//! feeds that reward back through `update`. Arms are 0-based indices in
//! `0..narms`.
//!
//! Randomness is injected through `&mut dyn rand::RngCore`, so a seeded
//! generator gives reproducible selections.
//!
//! # Quick Start
//!
//! ```
//! use banditry::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut bandit = EpsilonGreedy::new(3, 0.1);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! for round in 1..=100 {
//!     let arm = bandit.play(round, (), &mut rng).unwrap();
//!     let reward = if arm == 2 { 1.0 } else { 0.0 };
//!     bandit.update(arm, reward, ()).unwrap();
//! }
//!
//! // Contextual: one block of `ndims` features per arm
//! let mut linucb = LinUcb::new(2, 3, 1.0);
//! let context: &[f64] = &[1.0, 0.0, 0.5, 0.0, 1.0, 0.5];
//! let arm = linucb.play(1, context, &mut rng).unwrap();
//! linucb.update(arm, 1.0, context).unwrap();
//! ```

mod arm;
mod bandit;
mod error;
pub mod policies;
mod regression;

pub use arm::ArmStats;
pub use bandit::Bandit;
pub use error::{BanditError, Result};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use banditry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::policies::{
        EpsilonGreedy, EpsilonGreedyConfig, LinUcb, LinUcbConfig, Ucb, UcbConfig,
    };
    pub use crate::{ArmStats, Bandit, BanditError, Result};
}
