use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::engine::GameView;
use crate::features::{OffenseFeatures, OffenseWeights};
use crate::successor::resolve;
use crate::team::Policy;
use crate::types::{Action, Position};

/// Food pellets left at which the agent stops hunting and heads home.
const RACE_HOME_THRESHOLD: usize = 2;

/// Offensive reflex agent: scores every legal action as a fixed linear
/// combination of hand-crafted features and takes an arg-max, with no memory
/// across turns beyond its cached starting cell.
#[derive(Debug)]
pub struct ReflexPolicy {
    index: usize,
    start: Option<Position>,
    weights: OffenseWeights,
    rng: StdRng,
}

impl ReflexPolicy {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            start: None,
            weights: OffenseWeights::default(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Fixed RNG sequence, for reproducible matches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn evaluate<G: GameView>(&self, state: &G, action: Action) -> f64 {
        OffenseFeatures::extract(state, self.index, action).dot(&self.weights)
    }
}

impl Policy for ReflexPolicy {
    fn register_initial_state<G: GameView>(&mut self, state: &G) {
        self.start = Some(state.agent_position(self.index));
    }

    #[tracing::instrument(level = "trace", skip(self, state), fields(agent = self.index))]
    fn choose_action<G: GameView>(&mut self, state: &G) -> Action {
        let legal = state.legal_actions(self.index);
        if legal.is_empty() {
            return Action::Stop;
        }

        let scores: Vec<f64> = legal.iter().map(|&action| self.evaluate(state, action)).collect();
        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Almost everything collected: ignore the scores and bank the lead by
        // minimizing the distance back to the starting cell.
        if state.food_for(self.index).len() <= RACE_HOME_THRESHOLD
            && let Some(start) = self.start
        {
            let mut best_action = legal[0];
            let mut best_distance = u32::MAX;
            for &action in &legal {
                let successor = resolve(state, self.index, action);
                let distance =
                    successor.maze_distance(start, successor.agent_position(self.index));
                if distance < best_distance {
                    best_action = action;
                    best_distance = distance;
                }
            }
            tracing::debug!(?best_action, best_distance, "racing home");
            return best_action;
        }

        let tied: Vec<Action> = legal
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score == best)
            .map(|(&action, _)| action)
            .collect();
        tied.choose(&mut self.rng).copied().unwrap_or(Action::Stop)
    }
}
