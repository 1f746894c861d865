use capbot::GameView;
use capbot::config::TeamConfig;
use capbot::sim::{SimState, Stride, run_match};
use capbot::team::{Agent, create_team};
use capbot::types::Action;

const ARENA: &str = "\
###########
#0.     .1#
#.#     #.#
#         #
#.#     #.#
#2.     .3#
###########";

fn seeded_agents(seed: u64) -> Vec<Agent> {
    let config = TeamConfig {
        seed: Some(seed),
        ..Default::default()
    };
    let [first_a, second_a] = create_team(&config, [0, 2]);
    let [first_b, second_b] = create_team(&config, [1, 3]);
    vec![first_a, first_b, second_a, second_b]
}

#[test]
fn every_choice_in_a_full_match_is_legal() {
    let mut state = SimState::parse(ARENA, 5, Stride::Full).expect("maze");
    let mut agents = seeded_agents(11);

    for (index, agent) in agents.iter_mut().enumerate() {
        agent.register_initial_state(&state.with_observer(index));
    }

    for turn in 0..200 {
        if state.is_over() {
            break;
        }
        let index = turn % agents.len();
        let view = state.with_observer(index);
        let action = agents[index].choose_action(&view);
        assert!(
            state.legal_actions(index).contains(&action),
            "turn {turn}: agent {index} chose illegal {action:?}"
        );
        state = state.apply(index, action);
    }

    assert!(state.score().is_finite());
}

#[test]
fn learners_accumulate_state_over_a_match() {
    let state = SimState::parse(ARENA, 5, Stride::Full).expect("maze");
    let mut agents = seeded_agents(23);

    let final_state = run_match(state, &mut agents, 200);

    assert!(final_state.score().is_finite());
    for agent in &agents {
        if let Agent::DefensiveLearner(policy) = agent {
            assert!(
                !policy.table().is_empty(),
                "a learner that took turns must have table entries"
            );
        }
    }
}

#[test]
fn matches_with_the_same_seed_replay_identically() {
    let state = SimState::parse(ARENA, 5, Stride::Full).expect("maze");

    let mut first_run = Vec::new();
    let mut second_run = Vec::new();
    for log in [&mut first_run, &mut second_run] {
        let mut state = state.clone();
        let mut agents = seeded_agents(7);
        for (index, agent) in agents.iter_mut().enumerate() {
            agent.register_initial_state(&state.with_observer(index));
        }
        for turn in 0..120 {
            if state.is_over() {
                break;
            }
            let index = turn % agents.len();
            let action = agents[index].choose_action(&state.with_observer(index));
            let action = if state.legal_actions(index).contains(&action) {
                action
            } else {
                Action::Stop
            };
            log.push(action);
            state = state.apply(index, action);
        }
    }

    assert_eq!(first_run, second_run);
}
