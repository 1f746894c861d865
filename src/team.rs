use std::str::FromStr;

use crate::config::{ConfigError, TeamConfig};
use crate::engine::GameView;
use crate::learner::QLearningPolicy;
use crate::reflex::ReflexPolicy;
use crate::types::Action;

/// Capability every agent role provides to the engine.
pub trait Policy {
    /// Called once at game start, within the engine's setup allowance. Used
    /// only for one-time caching; no decisions happen here.
    fn register_initial_state<G: GameView>(&mut self, state: &G);

    /// Called once per turn, bound by the engine's per-move time limit.
    fn choose_action<G: GameView>(&mut self, state: &G) -> Action;
}

/// The closed set of agent roles, picked by name at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    OffensiveReflex,
    DefensiveLearner,
}

impl FromStr for AgentKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, ConfigError> {
        match name {
            "offense" | "offensive-reflex" => Ok(AgentKind::OffensiveReflex),
            "defense" | "defensive-learner" => Ok(AgentKind::DefensiveLearner),
            other => Err(ConfigError::UnknownAgent(other.to_string())),
        }
    }
}

/// A constructed agent, dispatching the policy capability per role.
#[derive(Debug)]
pub enum Agent {
    OffensiveReflex(ReflexPolicy),
    DefensiveLearner(QLearningPolicy),
}

impl Agent {
    pub fn build(kind: AgentKind, index: usize, config: &TeamConfig) -> Agent {
        match kind {
            AgentKind::OffensiveReflex => {
                let mut policy = ReflexPolicy::new(index);
                if let Some(seed) = config.seed {
                    policy = policy.with_seed(seed.wrapping_add(index as u64));
                }
                Agent::OffensiveReflex(policy)
            }
            AgentKind::DefensiveLearner => {
                let mut policy = QLearningPolicy::new(index, &config.learner);
                if let Some(seed) = config.seed {
                    policy = policy.with_seed(seed.wrapping_add(index as u64));
                }
                Agent::DefensiveLearner(policy)
            }
        }
    }

    pub fn register_initial_state<G: GameView>(&mut self, state: &G) {
        match self {
            Agent::OffensiveReflex(policy) => policy.register_initial_state(state),
            Agent::DefensiveLearner(policy) => policy.register_initial_state(state),
        }
    }

    pub fn choose_action<G: GameView>(&mut self, state: &G) -> Action {
        match self {
            Agent::OffensiveReflex(policy) => policy.choose_action(state),
            Agent::DefensiveLearner(policy) => policy.choose_action(state),
        }
    }
}

/// Build one side's two agents. `indices` are the engine's agent indices for
/// this team, in turn order.
pub fn create_team(config: &TeamConfig, indices: [usize; 2]) -> [Agent; 2] {
    [
        Agent::build(config.first, indices[0], config),
        Agent::build(config.second, indices[1], config),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_names() {
        assert_eq!("offense".parse::<AgentKind>().unwrap(), AgentKind::OffensiveReflex);
        assert_eq!(
            "defensive-learner".parse::<AgentKind>().unwrap(),
            AgentKind::DefensiveLearner
        );
        assert!(matches!(
            "midfield".parse::<AgentKind>(),
            Err(ConfigError::UnknownAgent(_))
        ));
    }

    #[test]
    fn test_default_team_composition() {
        let config = TeamConfig::default();
        let [first, second] = create_team(&config, [0, 2]);
        assert!(matches!(first, Agent::OffensiveReflex(_)));
        assert!(matches!(second, Agent::DefensiveLearner(_)));
    }
}
