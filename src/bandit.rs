//! The decision interface shared by every strategy.

use crate::error::Result;

/// A bandit strategy that picks one arm per round and learns from rewards.
///
/// Arms are identified by a 0-based index in `0..narms()`.
///
/// The context type defaults to `()` for non-contextual strategies.
/// Contextual strategies take a borrowed feature slice (`&[f64]`).
///
/// `play` takes `&self`: selecting an arm never changes what the strategy has
/// learned. Only `update` and `reset` mutate it, so a strategy that is shared
/// across threads must be wrapped in the caller's own lock.
///
/// The trait uses `dyn rand::RngCore` rather than a generic parameter so that
/// `Box<dyn Bandit>` can be used.
pub trait Bandit<C = ()> {
    /// Number of arms the strategy chooses between.
    fn narms(&self) -> usize;

    /// Choose an arm for the given round.
    ///
    /// # Arguments
    /// - `round`: The caller's 1-based round counter
    /// - `context`: The context observed for this round
    /// - `rng`: Random source used for exploration and tie-breaking
    fn play(&self, round: u64, context: C, rng: &mut dyn rand::RngCore) -> Result<usize>;

    /// Update the strategy with the reward observed for a played arm.
    ///
    /// # Arguments
    /// - `arm`: The arm returned by `play`
    /// - `reward`: The observed reward
    /// - `context`: The same context that was passed to `play`
    fn update(&mut self, arm: usize, reward: f64, context: C) -> Result<()>;

    /// Forget everything learned since construction.
    fn reset(&mut self);
}
