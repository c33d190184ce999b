pub mod bounds;
pub mod config;
pub mod counter;
pub mod maxsat;
pub mod state;

use rand::Rng;

use crate::error::Result;

pub use counter::{Counter, CounterWidth};
pub use maxsat::{MaxSat, MaxSat16, MaxSat32, MaxSat8};
pub use state::SatisfactionState;

/// What a discrete local-search driver needs from a model.
///
/// A configured model is shared read-only between trajectories; each state is
/// owned by one trajectory. Randomness always comes from the caller so runs
/// replay under a fixed seed.
pub trait StateModel: Sync {
    type State: Clone;
    type Transition: Copy;
    type Rendered;

    fn identifier(&self) -> &'static str;
    fn version(&self) -> &'static str;

    fn create_state(&self) -> Result<Self::State>;
    fn create_state_from(&self, assignment: &[bool]) -> Result<Self::State>;
    fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::State>;
    fn random_transition<R: Rng + ?Sized>(
        &self,
        state: &Self::State,
        rng: &mut R,
    ) -> Self::Transition;

    fn cost(&self, state: &Self::State) -> f64;
    /// `cost(after) - cost(before)` for applying `transition`, without
    /// building `after`.
    fn cost_difference(&self, state: &Self::State, transition: &Self::Transition) -> f64;
    fn apply_transition(&self, transition: &Self::Transition, state: &mut Self::State);

    fn render_state(&self, state: &Self::State) -> Result<Self::Rendered>;

    fn is_empty(&self) -> bool;
    fn term_count(&self) -> usize;
    /// Transitions per sweep, so each variable is picked about once.
    fn sweep_size(&self) -> usize {
        1
    }

    fn state_memory_estimate(&self) -> usize;
    fn state_only_memory_estimate(&self) -> usize;

    fn estimate_max_cost_diff(&self) -> f64;
    fn estimate_min_cost_diff(&self) -> f64;
}
