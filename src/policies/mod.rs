//! Bandit strategies.
//!
//! `EpsilonGreedy` and `Ucb` are non-contextual and implement `Bandit<()>`.
//! `LinUcb` is contextual and implements `Bandit<&[f64]>`.

mod epsilon_greedy;
mod linucb;
mod ucb;

use rand::prelude::*;

use crate::error::{BanditError, Result};

pub use epsilon_greedy::{EpsilonGreedy, EpsilonGreedyConfig};
pub use linucb::{LinUcb, LinUcbConfig};
pub use ucb::{Ucb, UcbConfig};

/// Pick uniformly at random among the indices holding the maximum score.
///
/// Scores are compared exactly, so several arms sitting at `f64::INFINITY`
/// tie with each other. NaN scores never win.
pub(crate) fn choose_best(scores: &[f64], rng: &mut dyn rand::RngCore) -> Option<usize> {
    let mut best_arms = Vec::new();
    let mut best_score = f64::NEG_INFINITY;

    for (arm, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best_arms.clear();
            best_arms.push(arm);
        } else if score == best_score {
            best_arms.push(arm);
        }
    }

    best_arms.choose(rng).copied()
}

pub(crate) fn check_arm(arm: usize, narms: usize) -> Result<()> {
    if arm < narms {
        Ok(())
    } else {
        Err(BanditError::ArmOutOfRange { arm, narms })
    }
}
