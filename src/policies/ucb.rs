use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{check_arm, choose_best};
use crate::arm::ArmStats;
use crate::bandit::Bandit;
use crate::error::{BanditError, Result};

/// Configuration for [`Ucb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UcbConfig {
    /// Number of arms
    pub narms: usize,
    /// Exploration rate inside the confidence bonus
    pub rho: f64,
    /// Initial value of every arm's estimate
    #[serde(alias = "Q0")]
    pub q0: f64,
}

impl Default for UcbConfig {
    fn default() -> Self {
        Self {
            narms: 10,
            rho: 2.0,
            q0: f64::INFINITY,
        }
    }
}

impl UcbConfig {
    /// Checks that the parameters describe a usable policy.
    pub fn validate(&self) -> Result<()> {
        if self.narms == 0 {
            return Err(BanditError::InvalidParameter {
                message: "narms must be positive".into(),
            });
        }
        if self.rho.is_nan() || self.rho <= 0.0 {
            return Err(BanditError::InvalidParameter {
                message: format!("rho must be positive, got {}", self.rho),
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

/// Upper Confidence Bound policy
///
/// Every arm is played once first, lowest index first. After that the policy
/// selects the arm with the highest score
///
/// ```text
/// value[arm] + sqrt(rho * ln(total_pulls) / pulls[arm])
/// ```
///
/// so rarely played arms receive a larger bonus. The bonus shrinks as pulls
/// accumulate, unlike the fixed exploration rate of epsilon-greedy.
#[derive(Clone, Debug)]
pub struct Ucb {
    /// Exploration rate (2.0 gives the classic UCB1 bound)
    rho: f64,
    /// Initial value of unplayed arms
    q0: f64,
    /// Statistics for each arm
    arm_stats: Vec<ArmStats>,
}

impl Ucb {
    /// Creates a new UCB policy with `narms` arms starting at `f64::INFINITY`
    ///
    /// # Arguments
    /// * `narms` - Number of arms
    /// * `rho` - Exploration rate, must be positive.
    ///   Higher values encourage more exploration
    #[must_use]
    pub fn new(narms: usize, rho: f64) -> Self {
        Self::with_initial_value(narms, rho, f64::INFINITY)
    }

    /// Creates a new UCB policy whose arms start at `q0`
    #[must_use]
    pub fn with_initial_value(narms: usize, rho: f64, q0: f64) -> Self {
        assert!(narms > 0, "narms must be positive");
        assert!(rho > 0.0, "rho must be positive");
        debug!(narms, rho, q0, "created ucb policy");
        Self {
            rho,
            q0,
            arm_stats: vec![ArmStats::new(q0); narms],
        }
    }

    /// Creates a policy from a validated configuration
    pub fn from_config(config: &UcbConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_initial_value(config.narms, config.rho, config.q0))
    }

    /// Gets the exploration rate
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Sets the exploration rate
    pub fn set_rho(&mut self, rho: f64) {
        assert!(rho > 0.0, "rho must be positive");
        self.rho = rho;
    }

    /// Gets the initial value of unplayed arms
    pub fn q0(&self) -> f64 {
        self.q0
    }

    /// Gets the statistics for a specific arm
    pub fn arm_stats(&self, arm: usize) -> Option<&ArmStats> {
        self.arm_stats.get(arm)
    }

    /// Sum of the pull counts of all arms
    pub fn total_pulls(&self) -> u64 {
        self.arm_stats.iter().map(ArmStats::pulls).sum()
    }

    /// Upper confidence bound of every arm.
    ///
    /// Returns `None` while some arm is unplayed, since the bonus divides by
    /// the pull count.
    pub fn scores(&self) -> Option<Vec<f64>> {
        if self.first_unplayed().is_some() {
            return None;
        }

        // Every arm has been pulled, so total >= 1 and the log is finite
        let log_total = (self.total_pulls() as f64).ln();
        Some(
            self.arm_stats
                .iter()
                .map(|stats| {
                    let bonus = (self.rho * log_total / stats.pulls() as f64).sqrt();
                    stats.value() + bonus
                })
                .collect(),
        )
    }

    fn first_unplayed(&self) -> Option<usize> {
        self.arm_stats.iter().position(ArmStats::is_unplayed)
    }
}

impl Bandit<()> for Ucb {
    fn narms(&self) -> usize {
        self.arm_stats.len()
    }

    fn play(&self, round: u64, _context: (), rng: &mut dyn rand::RngCore) -> Result<usize> {
        if let Some(arm) = self.first_unplayed() {
            trace!(round, arm, "ucb playing unexplored arm");
            return Ok(arm);
        }

        let scores = self.scores().ok_or(BanditError::NoArmsAvailable)?;
        let arm = choose_best(&scores, rng).ok_or(BanditError::NoArmsAvailable)?;
        trace!(round, arm, score = scores[arm], "ucb selected arm");
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
            "ucb updated arm"
        );
        Ok(())
    }

    fn reset(&mut self) {
        self.arm_stats.fill(ArmStats::new(self.q0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use rand::SeedableRng;

    #[test]
    fn test_ucb_explores_unpulled_arms_in_order() {
        let mut policy = Ucb::new(4, 2.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        // Rewards are irrelevant during the cold start
        for (round, expected) in (1..=4).zip(0..4) {
            let arm = policy.play(round, (), &mut rng).unwrap();
            assert_eq!(arm, expected);
            policy.update(arm, 10.0 - arm as f64, ()).unwrap();
        }

        assert_eq!(policy.total_pulls(), 4);
        assert!(policy.scores().is_some());
    }

    #[test]
    fn test_ucb_scores_none_during_cold_start() {
        let mut policy = Ucb::new(2, 1.0);
        assert!(policy.scores().is_none());
        policy.update(0, 1.0, ()).unwrap();
        assert!(policy.scores().is_none());
        policy.update(1, 1.0, ()).unwrap();
        assert!(policy.scores().is_some());
    }

    #[test]
    fn test_ucb_score_formula() {
        let mut policy = Ucb::new(2, 2.0);
        policy.update(0, 1.0, ()).unwrap();
        policy.update(0, 0.0, ()).unwrap();
        policy.update(0, 0.5, ()).unwrap();
        policy.update(1, 0.2, ()).unwrap();

        let scores = policy.scores().unwrap();
        let ln_total = 4f64.ln();
        assert_abs_diff_eq!(scores[0], 0.5 + (2.0 * ln_total / 3.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 0.2 + (2.0 * ln_total).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_ucb_prefers_undersampled_arm() {
        let mut policy = Ucb::new(2, 2.0);

        // Arm 0 has the better mean but many more pulls
        for _ in 0..50 {
            policy.update(0, 0.6, ()).unwrap();
        }
        policy.update(1, 0.5, ()).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        assert_eq!(policy.play(52, (), &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_ucb_selects_by_score_not_value() {
        let mut policy = Ucb::new(2, 1.0);
        for _ in 0..100 {
            policy.update(0, 1.0, ()).unwrap();
        }
        policy.update(1, 0.9, ()).unwrap();

        // Arm 0 has the larger value, arm 1 the larger bound
        let scores = policy.scores().unwrap();
        assert!(scores[1] > scores[0]);

        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        assert_eq!(policy.play(102, (), &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_ucb_deterministic_selection() {
        let mut policy = Ucb::new(3, 2.0);
        policy.update(0, 0.1, ()).unwrap();
        policy.update(1, 0.5, ()).unwrap();
        policy.update(2, 0.9, ()).unwrap();
        policy.update(0, 0.2, ()).unwrap();
        policy.update(1, 0.6, ()).unwrap();
        policy.update(2, 0.8, ()).unwrap();

        let mut rng1 = rand::rngs::StdRng::seed_from_u64(1);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(999);

        // No ties, so the RNG does not matter
        let choice1 = policy.play(7, (), &mut rng1).unwrap();
        let choice2 = policy.play(7, (), &mut rng2).unwrap();
        assert_eq!(choice1, choice2);
        assert_eq!(choice1, 2);
    }

    #[test]
    fn test_ucb_single_arm() {
        let mut policy = Ucb::new(1, 2.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        policy.update(0, 1.0, ()).unwrap();

        // ln(1) = 0 gives a zero bonus rather than NaN
        let scores = policy.scores().unwrap();
        assert!(abs_diff_eq!(scores[0], 1.0));
        assert_eq!(policy.play(2, (), &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_ucb_arm_stats() {
        let mut policy = Ucb::new(3, 1.414);
        policy.update(0, 0.5, ()).unwrap();
        policy.update(0, 0.7, ()).unwrap();
        policy.update(1, 0.3, ()).unwrap();

        let stats = policy.arm_stats(0).unwrap();
        assert_eq!(stats.pulls(), 2);
        assert!(abs_diff_eq!(stats.value(), 0.6));
        assert_eq!(policy.arm_stats(2).unwrap().value(), f64::INFINITY);
        assert_eq!(policy.total_pulls(), 3);
    }

    #[test]
    fn test_ucb_reset() {
        let mut policy = Ucb::with_initial_value(3, 1.0, 0.5);
        policy.update(0, 0.5, ()).unwrap();
        policy.update(1, 0.8, ()).unwrap();
        policy.update(2, 0.3, ()).unwrap();
        assert_eq!(policy.total_pulls(), 3);

        policy.reset();
        assert_eq!(policy.total_pulls(), 0);
        assert_eq!(policy.arm_stats(1).unwrap().value(), 0.5);
    }

    #[test]
    fn test_ucb_rho_getters_setters() {
        let mut policy = Ucb::new(2, 1.0);
        assert_eq!(policy.rho(), 1.0);

        policy.set_rho(2.0);
        assert_eq!(policy.rho(), 2.0);
    }

    #[test]
    #[should_panic(expected = "rho must be positive")]
    fn test_ucb_rejects_non_positive_rho() {
        let _ = Ucb::new(2, 0.0);
    }

    #[test]
    fn test_config() {
        let config: UcbConfig = serde_json::from_str(r#"{"narms": 3, "rho": 0.5}"#).unwrap();
        let policy = Ucb::from_config(&config).unwrap();
        assert_eq!(policy.narms(), 3);
        assert_eq!(policy.rho(), 0.5);
        assert_eq!(policy.q0(), f64::INFINITY);

        let config = UcbConfig {
            rho: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Ucb::from_config(&config),
            Err(BanditError::InvalidParameter { .. })
        ));

        let config = UcbConfig {
            rho: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
