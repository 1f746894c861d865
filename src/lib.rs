pub mod config;
pub mod engine;
pub mod features;
pub mod learner;
pub mod maze;
pub mod reflex;
pub mod sim;
pub mod successor;
pub mod team;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{AgentView, GameView};
pub use team::{Agent, AgentKind, Policy, create_team};
pub use types::{Action, Position};
