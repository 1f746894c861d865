//! Hand-crafted feature schemas and their fixed weight tables.
//!
//! Each role has an enumerated schema rather than an open string-keyed map;
//! a term that does not apply stays at its zero default and contributes
//! nothing to the linear score.

use crate::engine::GameView;
use crate::successor::resolve;
use crate::types::{Action, Position};

/// Maze distance at which an opposing defender starts to outweigh food
/// progress for the offensive evaluator.
pub const DEFENDER_RANGE: u32 = 5;

/// Scoring terms for the food-seeking role, extracted from the resolved
/// successor of a candidate action.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffenseFeatures {
    /// Negated count of food left to collect, so fewer remaining scores higher.
    pub food_score: f64,
    /// Maze distance from the successor position to the nearest food.
    pub food_distance: f64,
    /// Scaled threat term: -(distance to the nearest visible defender) times
    /// the remaining food count, active only within [`DEFENDER_RANGE`].
    pub defender_distance: f64,
}

impl OffenseFeatures {
    pub fn extract<G: GameView>(state: &G, agent: usize, action: Action) -> Self {
        let successor = resolve(state, agent, action);
        let food = successor.food_for(agent);
        let my_pos = successor.agent_position(agent);

        let mut features = OffenseFeatures {
            food_score: -(food.len() as f64),
            ..Default::default()
        };

        if let Some(nearest) = food
            .iter()
            .map(|&pellet| successor.maze_distance(my_pos, pellet))
            .min()
        {
            features.food_distance = nearest as f64;
        }

        // Opposing defenders still on their own side, when observable.
        let threat = successor
            .opponents(agent)
            .into_iter()
            .filter_map(|index| {
                let view = successor.agent(index);
                if view.on_offense { None } else { view.position }
            })
            .map(|position| successor.maze_distance(my_pos, position))
            .min();
        if let Some(distance) = threat
            && distance <= DEFENDER_RANGE
        {
            features.defender_distance = -(distance as f64) * food.len() as f64;
        }

        features
    }

    pub fn dot(&self, weights: &OffenseWeights) -> f64 {
        self.food_score * weights.food_score
            + self.food_distance * weights.food_distance
            + self.defender_distance * weights.defender_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffenseWeights {
    pub food_score: f64,
    pub food_distance: f64,
    pub defender_distance: f64,
}

impl Default for OffenseWeights {
    fn default() -> Self {
        Self {
            food_score: 100.0,
            food_distance: -1.0,
            defender_distance: 2000.0,
        }
    }
}

/// Reward terms for the defensive role, extracted from the resolved
/// successor of a candidate action. Used by the learner to shape its
/// per-step reward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DefenseFeatures {
    /// 1 while the agent holds its own side, 0 once it has crossed over.
    pub on_defense: f64,
    /// Count of visible invading opponents.
    pub invaders: f64,
    /// Maze distance to the nearest visible invader, 0 when none are visible.
    pub invader_distance: f64,
    /// 1 iff the candidate action is Stop.
    pub stop: f64,
    /// 1 iff the candidate action reverses the agent's current facing.
    pub reverse: f64,
}

impl DefenseFeatures {
    pub fn extract<G: GameView>(state: &G, agent: usize, action: Action) -> Self {
        let successor = resolve(state, agent, action);
        let me = successor.agent(agent);
        let my_pos = successor.agent_position(agent);

        let mut features = DefenseFeatures {
            on_defense: if me.on_offense { 0.0 } else { 1.0 },
            ..Default::default()
        };

        let invaders: Vec<Position> = successor
            .opponents(agent)
            .into_iter()
            .filter_map(|index| {
                let view = successor.agent(index);
                if view.on_offense { view.position } else { None }
            })
            .collect();
        features.invaders = invaders.len() as f64;
        if let Some(nearest) = invaders
            .iter()
            .map(|&invader| successor.maze_distance(my_pos, invader))
            .min()
        {
            features.invader_distance = nearest as f64;
        }

        if action == Action::Stop {
            features.stop = 1.0;
        }
        // Reversal is judged against the facing in the current state, not the
        // successor's.
        if let Some(facing) = state.agent(agent).facing
            && action == facing.reverse()
        {
            features.reverse = 1.0;
        }

        features
    }

    pub fn dot(&self, weights: &RewardWeights) -> f64 {
        self.on_defense * weights.on_defense
            + self.invaders * weights.invaders
            + self.invader_distance * weights.invader_distance
            + self.stop * weights.stop
            + self.reverse * weights.reverse
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardWeights {
    pub on_defense: f64,
    pub invaders: f64,
    pub invader_distance: f64,
    pub stop: f64,
    pub reverse: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            on_defense: 100.0,
            invaders: -1000.0,
            invader_distance: -500.0,
            stop: -100.0,
            reverse: -200.0,
        }
    }
}
