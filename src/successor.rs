use crate::engine::GameView;
use crate::types::Action;

/// Fully grid-aligned successor of `state` after `agent` takes `action`.
///
/// The engine may model a move as two half-cell steps; when a single
/// transition leaves the agent between cells, the same action is applied once
/// more to reach alignment. Idempotent once aligned: a Stop on an aligned
/// state comes back aligned and unmoved. Assumes `action` was drawn from the
/// engine's legal-action listing.
pub fn resolve<G: GameView>(state: &G, agent: usize, action: Action) -> G {
    let next = state.successor(agent, action);
    if next.is_aligned(agent) {
        next
    } else {
        next.successor(agent, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimState, Stride};
    use crate::types::Position;

    const CORRIDOR: &str = "\
######
#0. .#
######";

    #[test]
    fn test_full_stride_resolves_in_one_step() {
        let state = SimState::parse(CORRIDOR, 5, Stride::Full).expect("maze");
        let next = resolve(&state, 0, Action::East);
        assert_eq!(next.agent_position(0), Position::new(2, 1));
        assert!(next.is_aligned(0));
    }

    #[test]
    fn test_half_stride_is_compensated() {
        let state = SimState::parse(CORRIDOR, 5, Stride::Half).expect("maze");
        // A single engine transition leaves the agent between cells.
        let half = state.successor(0, Action::East);
        assert!(!half.is_aligned(0));

        let next = resolve(&state, 0, Action::East);
        assert!(next.is_aligned(0));
        assert_eq!(next.agent_position(0), Position::new(2, 1));
    }

    #[test]
    fn test_stop_on_aligned_state_is_a_fixed_point() {
        let state = SimState::parse(CORRIDOR, 5, Stride::Half).expect("maze");
        let next = resolve(&state, 0, Action::Stop);
        assert!(next.is_aligned(0));
        assert_eq!(next.agent_position(0), state.agent_position(0));

        let again = resolve(&next, 0, Action::Stop);
        assert_eq!(again.agent_position(0), next.agent_position(0));
    }
}
