use crate::types::{Action, Position};

/// Read-only snapshot of a single agent as the engine exposes it.
///
/// `position` is `None` when the agent is outside the observer's visibility
/// range; such agents are excluded from all distance computations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentView {
    pub position: Option<Position>,
    /// True once the agent has crossed onto the opponent's side of the map.
    pub on_offense: bool,
    pub scared_ticks: u32,
    /// Direction of the agent's last move, if it has moved at all.
    pub facing: Option<Action>,
}

/// One turn's immutable view of the game, supplied by the external engine.
///
/// Every method is a read; `successor` produces a fresh snapshot and never
/// mutates the receiver. `legal_actions` is empty only for a cornered agent
/// or a finished game, which callers treat as a terminal state.
pub trait GameView: Sized {
    fn legal_actions(&self, agent: usize) -> Vec<Action>;

    /// One engine transition. Depending on the engine's move granularity this
    /// may advance the agent only half a cell; see [`crate::successor::resolve`].
    fn successor(&self, agent: usize, action: Action) -> Self;

    /// Whether the agent sits exactly on a grid cell.
    fn is_aligned(&self, agent: usize) -> bool;

    fn agent(&self, agent: usize) -> AgentView;

    /// The acting agent's own, always-observable position.
    fn agent_position(&self, agent: usize) -> Position;

    /// Indices of the opposing team's agents, in a stable order.
    fn opponents(&self, agent: usize) -> Vec<usize>;

    /// True shortest-path distance through walkable cells, precomputed by the
    /// engine. Not a straight-line metric.
    fn maze_distance(&self, from: Position, to: Position) -> u32;

    /// Remaining food this agent's team is trying to collect.
    fn food_for(&self, agent: usize) -> Vec<Position>;

    fn score(&self) -> f64;
}
