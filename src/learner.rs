//! Tabular Q-learning for the defensive role.
//!
//! The value table is keyed by the agent's own cell and the candidate action
//! only; board-wide context is deliberately not folded into the key. Before
//! every choice the table is refreshed from the simulated outcome of each
//! legal action, so learning happens online without waiting for the chosen
//! move's real consequence.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::config::LearnerConfig;
use crate::engine::GameView;
use crate::features::{DefenseFeatures, RewardWeights};
use crate::successor::resolve;
use crate::team::Policy;
use crate::types::{Action, Position};

/// Value estimates keyed by (position, action). Unseen pairs read as zero;
/// entries persist for the life of the agent and are never reset mid-game.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(Position, Action), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: Position, action: Action) -> f64 {
        self.values.get(&(position, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, position: Position, action: Action, value: f64) {
        self.values.insert((position, action), value);
    }

    /// Maximum estimate over `legal` at `position`; negative infinity when
    /// `legal` is empty, so callers must short-circuit the terminal case.
    pub fn max_q(&self, position: Position, legal: &[Action]) -> f64 {
        legal
            .iter()
            .map(|&action| self.get(position, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Defensive agent learning online by temporal difference.
///
/// Epsilon-greedy over its value table, with a dense shaped reward computed
/// from [`DefenseFeatures`] instead of a sparse terminal signal.
#[derive(Debug)]
pub struct QLearningPolicy {
    index: usize,
    epsilon: f64,
    alpha: f64,
    discount: f64,
    weights: RewardWeights,
    table: QTable,
    rng: StdRng,
}

impl QLearningPolicy {
    pub fn new(index: usize, config: &LearnerConfig) -> Self {
        Self {
            index,
            epsilon: config.epsilon,
            alpha: config.alpha,
            discount: config.discount,
            weights: RewardWeights::default(),
            table: QTable::new(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Fixed RNG sequence, for reproducible matches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// One Bellman-style step for candidate `action` at the current cell:
    /// shaped reward plus a discounted max-Q bootstrap over the successor's
    /// legal actions. A successor with no legal actions is terminal and
    /// contributes the reward alone.
    fn update<G: GameView>(&mut self, state: &G, action: Action) {
        let position = state.agent_position(self.index);
        let reward = DefenseFeatures::extract(state, self.index, action).dot(&self.weights);

        let successor = resolve(state, self.index, action);
        let next_legal = successor.legal_actions(self.index);
        let target = if next_legal.is_empty() {
            reward
        } else {
            let next_position = successor.agent_position(self.index);
            reward + self.discount * self.table.max_q(next_position, &next_legal)
        };

        let current = self.table.get(position, action);
        self.table
            .set(position, action, (1.0 - self.alpha) * current + self.alpha * target);
    }

    /// Random member of the arg-max set of current-position estimates.
    fn greedy<G: GameView>(&mut self, state: &G, legal: &[Action]) -> Option<Action> {
        let position = state.agent_position(self.index);
        let best = self.table.max_q(position, legal);
        let tied: Vec<Action> = legal
            .iter()
            .copied()
            .filter(|&action| self.table.get(position, action) == best)
            .collect();
        tied.choose(&mut self.rng).copied()
    }
}

impl Policy for QLearningPolicy {
    fn register_initial_state<G: GameView>(&mut self, _state: &G) {}

    #[tracing::instrument(level = "trace", skip(self, state), fields(agent = self.index))]
    fn choose_action<G: GameView>(&mut self, state: &G) -> Action {
        let legal = state.legal_actions(self.index);

        // Refresh the table from every candidate's simulated outcome before
        // anything is chosen.
        for &action in &legal {
            self.update(state, action);
        }

        let Some(greedy) = self.greedy(state, &legal) else {
            return Action::Stop;
        };
        if self.rng.random::<f64>() < self.epsilon {
            return legal.choose(&mut self.rng).copied().unwrap_or(Action::Stop);
        }
        tracing::trace!(
            ?greedy,
            q = self.table.get(state.agent_position(self.index), greedy),
            "greedy pick"
        );
        greedy
    }
}
