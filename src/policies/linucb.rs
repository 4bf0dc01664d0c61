use faer::Mat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{check_arm, choose_best};
use crate::bandit::Bandit;
use crate::error::{BanditError, Result};
use crate::regression::RidgeModel;

/// Configuration for [`LinUcb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinUcbConfig {
    /// Number of arms
    pub narms: usize,
    /// Number of context features per arm
    pub ndims: usize,
    /// Width multiplier of the confidence bound
    pub alpha: f64,
}

impl Default for LinUcbConfig {
    fn default() -> Self {
        Self {
            narms: 10,
            ndims: 10,
            alpha: 1.0,
        }
    }
}

impl LinUcbConfig {
    /// Checks that the parameters describe a usable policy.
    pub fn validate(&self) -> Result<()> {
        if self.narms == 0 || self.ndims == 0 {
            return Err(BanditError::InvalidParameter {
                message: format!(
                    "narms and ndims must be positive, got narms={} ndims={}",
                    self.narms, self.ndims
                ),
            });
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 {
            return Err(BanditError::InvalidParameter {
                message: format!("alpha must be positive, got {}", self.alpha),
            });
        }
        Ok(())
    }
}

/// Linear Upper Confidence Bound (LinUCB) policy for contextual bandits
///
/// LinUCB keeps a separate ridge regression model for each arm and scores an
/// arm by its predicted reward plus `alpha` times the width of its confidence
/// bound:
///
/// ```text
/// theta^T x + alpha * sqrt(x^T A^-1 x)
/// ```
///
/// The context of a round is a flat slice of `narms * ndims` features. The
/// `k`-th block of `ndims` values is the feature vector of arm `k`.
///
/// `A^-1` is recomputed by LU inversion for every arm on every `play`, which
/// costs `O(narms * ndims^3)` per round.
#[derive(Debug, Clone)]
pub struct LinUcb {
    /// Exploration parameter (controls confidence bound width)
    alpha: f64,
    /// Number of context features per arm
    ndims: usize,
    /// Ridge regression model for each arm
    arm_models: Vec<RidgeModel>,
}

impl LinUcb {
    /// Create a new LinUCB policy
    ///
    /// # Arguments
    /// * `narms` - Number of arms
    /// * `ndims` - Number of context features per arm
    /// * `alpha` - Exploration parameter, must be positive
    #[must_use]
    pub fn new(narms: usize, ndims: usize, alpha: f64) -> Self {
        assert!(narms > 0, "narms must be positive");
        assert!(ndims > 0, "ndims must be positive");
        assert!(alpha > 0.0, "alpha must be positive");
        debug!(narms, ndims, alpha, "created linucb policy");
        Self {
            alpha,
            ndims,
            arm_models: vec![RidgeModel::new(ndims); narms],
        }
    }

    /// Creates a policy from a validated configuration
    pub fn from_config(config: &LinUcbConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.narms, config.ndims, config.alpha))
    }

    /// Gets the exploration parameter
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Gets the number of context features per arm
    pub fn ndims(&self) -> usize {
        self.ndims
    }

    /// The `A` matrix of an arm
    pub fn design_matrix(&self, arm: usize) -> Result<&Mat<f64>> {
        Ok(&self.model(arm)?.a_matrix)
    }

    /// The `b` vector of an arm, as an `ndims x 1` column
    pub fn response(&self, arm: usize) -> Result<&Mat<f64>> {
        Ok(&self.model(arm)?.xty)
    }

    /// Current coefficient estimate `A^-1 b` of an arm
    pub fn theta(&self, arm: usize) -> Result<Vec<f64>> {
        let solution = self.model(arm)?.solve()?;
        Ok((0..self.ndims).map(|i| solution.theta[(i, 0)]).collect())
    }

    /// Upper confidence bound of every arm for the given context
    pub fn scores(&self, context: &[f64]) -> Result<Vec<f64>> {
        self.check_context(context)?;

        self.arm_models
            .iter()
            .zip(context.chunks_exact(self.ndims))
            .map(|(model, x)| -> Result<f64> {
                let solution = model.solve()?;
                let score = solution.predict(x) + self.alpha * solution.uncertainty(x);
                if !score.is_finite() {
                    return Err(BanditError::NumericalError {
                        message: format!("upper confidence bound is {score}"),
                    });
                }
                Ok(score)
            })
            .collect()
    }

    fn model(&self, arm: usize) -> Result<&RidgeModel> {
        check_arm(arm, self.arm_models.len())?;
        Ok(&self.arm_models[arm])
    }

    fn check_context(&self, context: &[f64]) -> Result<()> {
        let expected = self.arm_models.len() * self.ndims;
        if context.len() != expected {
            return Err(BanditError::InvalidContextDimensions {
                expected,
                got: context.len(),
            });
        }
        Ok(())
    }
}

impl<'a> Bandit<&'a [f64]> for LinUcb {
    fn narms(&self) -> usize {
        self.arm_models.len()
    }

    fn play(&self, round: u64, context: &'a [f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        let scores = self.scores(context)?;
        let arm = choose_best(&scores, rng).ok_or(BanditError::NoArmsAvailable)?;
        trace!(round, arm, score = scores[arm], "linucb selected arm");
        Ok(arm)
    }

    fn update(&mut self, arm: usize, reward: f64, context: &'a [f64]) -> Result<()> {
        check_arm(arm, self.arm_models.len())?;
        self.check_context(context)?;

        let start = arm * self.ndims;
        let x = &context[start..start + self.ndims];
        self.arm_models[arm].fit(x, reward);
        trace!(arm, reward, "linucb updated arm");
        Ok(())
    }

    fn reset(&mut self) {
        for model in &mut self.arm_models {
            model.reset();
        }
    }
}
