use std::env;

use crate::team::AgentKind;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown agent kind: {0}")]
    UnknownAgent(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Hyper-parameters for the defensive learner, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerConfig {
    /// Exploration rate for epsilon-greedy selection.
    pub epsilon: f64,
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor.
    pub discount: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            alpha: 0.5,
            discount: 0.7,
        }
    }
}

/// Team composition plus learner overrides, read from the environment.
#[derive(Debug, Clone)]
pub struct TeamConfig {
    pub first: AgentKind,
    pub second: AgentKind,
    pub learner: LearnerConfig,
    /// Base RNG seed; each agent derives its own stream from it. None means
    /// seed from entropy.
    pub seed: Option<u64>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            first: AgentKind::OffensiveReflex,
            second: AgentKind::DefensiveLearner,
            learner: LearnerConfig::default(),
            seed: None,
        }
    }
}

impl TeamConfig {
    /// Defaults overridden by any `CAPBOT_*` variables present in the
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = TeamConfig::default();
        if let Some(raw) = read_var("CAPBOT_FIRST") {
            config.first = raw.parse()?;
        }
        if let Some(raw) = read_var("CAPBOT_SECOND") {
            config.second = raw.parse()?;
        }
        if let Some(raw) = read_var("CAPBOT_EPSILON") {
            config.learner.epsilon = parse_f64("CAPBOT_EPSILON", &raw)?;
        }
        if let Some(raw) = read_var("CAPBOT_ALPHA") {
            config.learner.alpha = parse_f64("CAPBOT_ALPHA", &raw)?;
        }
        if let Some(raw) = read_var("CAPBOT_GAMMA") {
            config.learner.discount = parse_f64("CAPBOT_GAMMA", &raw)?;
        }
        if let Some(raw) = read_var("CAPBOT_SEED") {
            config.seed = Some(parse_u64("CAPBOT_SEED", &raw)?);
        }
        Ok(config)
    }
}

fn read_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_f64(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
