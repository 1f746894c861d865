//! Minimal in-memory rendition of the engine contract.
//!
//! Backs the demo runner and the test suite; the real game supplies its own
//! implementation of [`GameView`] at this boundary. Mazes are described as
//! ASCII sketches: `#` wall, `.` food (assigned to the side it sits on),
//! digits are agent starting cells. Even-indexed agents defend the left
//! half, odd-indexed agents the right.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::engine::{AgentView, GameView};
use crate::maze::Maze;
use crate::successor::resolve;
use crate::team::Agent;
use crate::types::{Action, Position};

/// Move granularity of the underlying transition: one full cell per step, or
/// two half-cell steps per move as some engines model it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stride {
    Full,
    Half,
}

#[derive(Debug, thiserror::Error)]
pub enum MazeError {
    #[error("maze sketch is empty")]
    Empty,
    #[error("maze line {0} does not match the first line's width")]
    Ragged(usize),
    #[error("unknown maze tile: {0:?}")]
    UnknownTile(char),
    #[error("agent indices must be contiguous from 0, missing {0}")]
    MissingAgent(usize),
}

#[derive(Debug, Clone)]
struct SimAgent {
    position: Position,
    facing: Action,
    aligned: bool,
}

/// One turn's snapshot of a running match.
///
/// Cloning is cheap; the maze and its distance table are shared.
#[derive(Debug, Clone)]
pub struct SimState {
    maze: Arc<Maze>,
    agents: Vec<SimAgent>,
    /// food[side]: pellets sitting on that side, defended by that side's team.
    food: [HashSet<Position>; 2],
    score: f64,
    visibility: u32,
    stride: Stride,
    observer: usize,
    over: bool,
}

impl SimState {
    pub fn parse(sketch: &str, visibility: u32, stride: Stride) -> Result<Self, MazeError> {
        let lines: Vec<&str> = sketch.lines().collect();
        if lines.is_empty() {
            return Err(MazeError::Empty);
        }
        let width = lines[0].chars().count() as i32;
        let height = lines.len() as i32;

        let mut walls = HashSet::new();
        let mut food = [HashSet::new(), HashSet::new()];
        let mut starts: HashMap<usize, Position> = HashMap::new();

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != width {
                return Err(MazeError::Ragged(y));
            }
            for (x, tile) in line.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match tile {
                    '#' => {
                        walls.insert(pos);
                    }
                    '.' => {
                        let side = if pos.x < width / 2 { 0 } else { 1 };
                        food[side].insert(pos);
                    }
                    ' ' => {}
                    digit @ '0'..='9' => {
                        starts.insert(digit as usize - '0' as usize, pos);
                    }
                    other => return Err(MazeError::UnknownTile(other)),
                }
            }
        }

        let mut agents = Vec::new();
        for index in 0..starts.len() {
            let position = *starts.get(&index).ok_or(MazeError::MissingAgent(index))?;
            agents.push(SimAgent {
                position,
                facing: Action::Stop,
                aligned: true,
            });
        }

        Ok(Self {
            maze: Arc::new(Maze::new(width, height, walls)),
            agents,
            food,
            score: 0.0,
            visibility,
            stride,
            observer: 0,
            over: false,
        })
    }

    /// The same snapshot as observed by `agent` (visibility gating applies to
    /// the opposing team only).
    pub fn with_observer(&self, agent: usize) -> SimState {
        let mut view = self.clone();
        view.observer = agent;
        view
    }

    /// Authoritative turn advance; resolves half-step granularity.
    pub fn apply(&self, agent: usize, action: Action) -> SimState {
        resolve(self, agent, action)
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    fn side(&self, pos: Position) -> usize {
        if pos.x < self.maze.width / 2 { 0 } else { 1 }
    }

    fn on_offense(&self, agent: usize) -> bool {
        self.side(self.agents[agent].position) != agent % 2
    }

    fn team_sees(&self, team: usize, target: Position) -> bool {
        self.agents
            .iter()
            .enumerate()
            .any(|(index, agent)| {
                index % 2 == team && agent.position.distance(&target) as u32 <= self.visibility
            })
    }

    /// Food pickup and end-of-match bookkeeping after `agent` lands on a cell.
    fn settle(&mut self, agent: usize) {
        let team = agent % 2;
        let enemy = 1 - team;
        let position = self.agents[agent].position;
        if self.side(position) == enemy && self.food[enemy].remove(&position) {
            self.score += if team == 0 { 1.0 } else { -1.0 };
            if self.food[enemy].is_empty() {
                self.over = true;
            }
        }
    }
}

impl GameView for SimState {
    fn legal_actions(&self, agent: usize) -> Vec<Action> {
        if self.over {
            return Vec::new();
        }
        let position = self.agents[agent].position;
        let mut legal: Vec<Action> = Action::MOVES
            .into_iter()
            .filter(|&action| self.maze.is_open(position.offset(action)))
            .collect();
        legal.push(Action::Stop);
        legal
    }

    fn successor(&self, agent: usize, action: Action) -> SimState {
        let mut next = self.clone();
        if next.over {
            return next;
        }
        match (action, self.stride) {
            (Action::Stop, _) => {
                next.agents[agent].facing = Action::Stop;
            }
            (_, Stride::Full) => {
                next.agents[agent].position = next.agents[agent].position.offset(action);
                next.agents[agent].facing = action;
                next.settle(agent);
            }
            (_, Stride::Half) => {
                if next.agents[agent].aligned {
                    // First half of the move: direction committed, cell not
                    // yet reached.
                    next.agents[agent].facing = action;
                    next.agents[agent].aligned = false;
                } else {
                    next.agents[agent].position = next.agents[agent].position.offset(action);
                    next.agents[agent].aligned = true;
                    next.settle(agent);
                }
            }
        }
        next
    }

    fn is_aligned(&self, agent: usize) -> bool {
        self.agents[agent].aligned
    }

    fn agent(&self, agent: usize) -> AgentView {
        let subject = &self.agents[agent];
        let visible = agent % 2 == self.observer % 2
            || self.team_sees(self.observer % 2, subject.position);
        AgentView {
            position: visible.then_some(subject.position),
            on_offense: self.on_offense(agent),
            scared_ticks: 0,
            facing: Some(subject.facing),
        }
    }

    fn agent_position(&self, agent: usize) -> Position {
        self.agents[agent].position
    }

    fn opponents(&self, agent: usize) -> Vec<usize> {
        (0..self.agents.len())
            .filter(|index| index % 2 != agent % 2)
            .collect()
    }

    fn maze_distance(&self, from: Position, to: Position) -> u32 {
        self.maze.distance(from, to)
    }

    fn food_for(&self, agent: usize) -> Vec<Position> {
        self.food[1 - agent % 2].iter().copied().collect()
    }

    fn score(&self) -> f64 {
        self.score
    }
}

/// Drive a match to completion or `max_turns`, whichever comes first.
///
/// `agents` must be in engine index order; each is registered once before
/// the first turn. An illegal choice is downgraded to Stop with a warning.
pub fn run_match(mut state: SimState, agents: &mut [Agent], max_turns: usize) -> SimState {
    for (index, agent) in agents.iter_mut().enumerate() {
        agent.register_initial_state(&state.with_observer(index));
    }

    for turn in 0..max_turns {
        if state.is_over() {
            break;
        }
        let index = turn % agents.len();
        let view = state.with_observer(index);
        let mut action = agents[index].choose_action(&view);
        if !state.legal_actions(index).contains(&action) {
            tracing::warn!(agent = index, ?action, "illegal action downgraded to Stop");
            action = Action::Stop;
        }
        state = state.apply(index, action);
        tracing::debug!(turn, agent = index, ?action, score = state.score(), "turn resolved");
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: &str = "\
########
#0 . .1#
#  .   #
########";

    #[test]
    fn test_parse_assigns_food_to_sides() {
        let state = SimState::parse(ARENA, 5, Stride::Full).expect("maze");
        // Left-side pellets belong to team 0's larder, i.e. team 1 eats them.
        assert_eq!(state.food_for(1).len(), 2);
        assert_eq!(state.food_for(0).len(), 1);
        assert!(!state.is_over());
    }

    #[test]
    fn test_parse_rejects_bad_sketches() {
        assert!(matches!(
            SimState::parse("", 5, Stride::Full),
            Err(MazeError::Empty)
        ));
        assert!(matches!(
            SimState::parse("###\n##", 5, Stride::Full),
            Err(MazeError::Ragged(1))
        ));
        assert!(matches!(
            SimState::parse("#x#", 5, Stride::Full),
            Err(MazeError::UnknownTile('x'))
        ));
        assert!(matches!(
            SimState::parse("#1#", 5, Stride::Full),
            Err(MazeError::MissingAgent(0))
        ));
    }

    #[test]
    fn test_legal_actions_exclude_walls() {
        let state = SimState::parse(ARENA, 5, Stride::Full).expect("maze");
        let legal = state.legal_actions(0);
        // Agent 0 sits in the corner: only South, East and Stop.
        assert_eq!(legal, vec![Action::South, Action::East, Action::Stop]);
    }

    #[test]
    fn test_eating_the_last_pellet_ends_the_match() {
        let state = SimState::parse(
            "\
######
#0 ..#
######",
            5,
            Stride::Full,
        )
        .expect("maze");
        // Both pellets sit on the right: agent 0 is the attacker here.
        let state = state.apply(0, Action::East).apply(0, Action::East);
        assert_eq!(state.score(), 1.0);
        assert!(!state.is_over());

        let state = state.apply(0, Action::East);
        assert_eq!(state.score(), 2.0);
        assert!(state.is_over());
        assert!(state.legal_actions(0).is_empty());
    }

    #[test]
    fn test_visibility_gates_opponent_positions() {
        let state = SimState::parse(
            "\
##########
#0      1#
##########",
            3,
            Stride::Full,
        )
        .expect("maze");
        let view = state.with_observer(0);
        assert_eq!(view.agent(1).position, None);

        let closer = SimState::parse(
            "\
##########
#0  1    #
##########",
            3,
            Stride::Full,
        )
        .expect("maze");
        let view = closer.with_observer(0);
        assert_eq!(view.agent(1).position, Some(Position::new(4, 1)));
    }

    #[test]
    fn test_own_team_is_always_visible() {
        let state = SimState::parse(
            "\
##########
#0 1    2#
##########",
            1,
            Stride::Full,
        )
        .expect("maze");
        let view = state.with_observer(0);
        assert!(view.agent(2).position.is_some());
        assert_eq!(view.agent(1).position, None);
    }

    #[test]
    fn test_facing_follows_moves() {
        let state = SimState::parse(ARENA, 5, Stride::Full).expect("maze");
        let moved = state.apply(0, Action::East);
        assert_eq!(moved.agent(0).facing, Some(Action::East));
        let stopped = moved.apply(0, Action::Stop);
        assert_eq!(stopped.agent(0).facing, Some(Action::Stop));
    }
}
