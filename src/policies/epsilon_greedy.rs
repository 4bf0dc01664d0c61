use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{check_arm, choose_best};
use crate::arm::ArmStats;
use crate::bandit::Bandit;
use crate::error::{BanditError, Result};

/// Configuration for [`EpsilonGreedy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpsilonGreedyConfig {
    /// Number of arms
    pub narms: usize,
    /// Probability of exploring a uniformly random arm
    pub epsilon: f64,
    /// Initial value of every arm's estimate
    #[serde(alias = "Q0")]
    pub q0: f64,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self {
            narms: 10,
            epsilon: 0.1,
            q0: f64::INFINITY,
        }
    }
}

impl EpsilonGreedyConfig {
    /// Checks that the parameters describe a usable policy.
    pub fn validate(&self) -> Result<()> {
        if self.narms == 0 {
            return Err(BanditError::InvalidParameter {
                message: "narms must be positive".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(BanditError::InvalidParameter {
                message: format!("epsilon must be between 0 and 1, got {}", self.epsilon),
            });
        }
        if self.q0.is_nan() {
            return Err(BanditError::InvalidParameter {
                message: "q0 must not be NaN".into(),
            });
        }
        Ok(())
    }
}

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise
///
/// Exploitation picks among the arms with the highest estimate, breaking ties
/// at random. With the default initial value of `f64::INFINITY` every arm that
/// has not been played yet counts as best, so each arm is tried once before
/// finite estimates start to compete.
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    q0: f64,
    arm_stats: Vec<ArmStats>,
}

impl EpsilonGreedy {
    /// Creates a new EpsilonGreedy policy with `narms` arms starting at `f64::INFINITY`
    #[must_use]
    pub fn new(narms: usize, epsilon: f64) -> Self {
        Self::with_initial_value(narms, epsilon, f64::INFINITY)
    }

    /// Creates a new EpsilonGreedy policy whose arms start at `q0`
    #[must_use]
    pub fn with_initial_value(narms: usize, epsilon: f64, q0: f64) -> Self {
        assert!(narms > 0, "narms must be positive");
        assert!(
            (0.0..=1.0).contains(&epsilon),
            "epsilon must be between 0 and 1"
        );
        debug!(narms, epsilon, q0, "created epsilon-greedy policy");
        Self {
            epsilon,
            q0,
            arm_stats: vec![ArmStats::new(q0); narms],
        }
    }

    /// Creates a policy from a validated configuration
    pub fn from_config(config: &EpsilonGreedyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_initial_value(
            config.narms,
            config.epsilon,
            config.q0,
        ))
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Sets the epsilon value
    pub fn set_epsilon(&mut self, epsilon: f64) {
        assert!(
            (0.0..=1.0).contains(&epsilon),
            "epsilon must be between 0 and 1"
        );
        self.epsilon = epsilon;
    }

    /// Gets the initial value of unplayed arms
    pub fn q0(&self) -> f64 {
        self.q0
    }

    /// Gets the statistics for a specific arm
    pub fn arm_stats(&self, arm: usize) -> Option<&ArmStats> {
        self.arm_stats.get(arm)
    }

    /// Pull counts, indexed by arm
    pub fn counts(&self) -> Vec<u64> {
        self.arm_stats.iter().map(ArmStats::pulls).collect()
    }

    /// Current reward estimates, indexed by arm
    pub fn values(&self) -> Vec<f64> {
        self.arm_stats.iter().map(ArmStats::value).collect()
    }
}

impl Bandit<()> for EpsilonGreedy {
    fn narms(&self) -> usize {
        self.arm_stats.len()
    }

    fn play(&self, round: u64, _context: (), rng: &mut dyn rand::RngCore) -> Result<usize> {
        let r: f64 = rng.random();
        let explore = r <= self.epsilon;

        let arm = if explore {
            rng.random_range(0..self.arm_stats.len())
        } else {
            choose_best(&self.values(), rng).ok_or(BanditError::NoArmsAvailable)?
        };

        trace!(round, arm, explore, "epsilon-greedy selected arm");
        Ok(arm)
    }

    fn update(&mut self, arm: usize, reward: f64, _context: ()) -> Result<()> {
        check_arm(arm, self.arm_stats.len())?;
        let stats = &mut self.arm_stats[arm];
        stats.observe(reward);
        trace!(
            arm,
            reward,
            pulls = stats.pulls(),
            value = stats.value(),
            "epsilon-greedy updated arm"
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.arm_stats.fill(ArmStats::new(self.q0));
    }
}
