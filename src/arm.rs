//! Per-arm running statistics for the non-contextual strategies.
//!
//! Arms are plain `usize` indices in `0..narms`. Each arm keeps a pull count
//! and a running mean of the rewards it has produced. A fresh arm holds the
//! strategy's initial value (`Q0`), which defaults to `f64::INFINITY` so that
//! an arm that was never played looks better than any arm that was.

/// Pull count and running mean reward for a single arm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmStats {
    pulls: u64,
    value: f64,
}

impl ArmStats {
    /// Creates statistics for an arm that has never been played.
    #[must_use]
    pub fn new(initial_value: f64) -> Self {
        Self {
            pulls: 0,
            value: initial_value,
        }
    }

    /// Number of times the arm has been updated.
    pub fn pulls(&self) -> u64 {
        self.pulls
    }

    /// Current reward estimate. Equals the initial value until the first update.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns true if the arm has never been updated.
    pub fn is_unplayed(&self) -> bool {
        self.pulls == 0
    }

    /// Folds one observed reward into the running mean.
    ///
    /// The new estimate is `prior * (n - 1) / n + reward / n` where `n` is the
    /// count after the increment. On the first observation the prior is the
    /// initial value, which is read as zero, otherwise an infinite `Q0` times
    /// zero would poison the mean with NaN.
    pub fn observe(&mut self, reward: f64) {
        let prior = if self.pulls == 0 { 0.0 } else { self.value };
        self.pulls += 1;
        let n = self.pulls as f64;
        self.value = prior * ((n - 1.0) / n) + reward / n;
    }
}
