use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use capbot::GameView;
use capbot::config::TeamConfig;
use capbot::sim::{SimState, Stride, run_match};
use capbot::team::{Agent, create_team};

const DEMO_MAZE: &str = "\
###########
#0.     .1#
#.#     #.#
#         #
#.#     #.#
#2.     .3#
###########";

const VISIBILITY: u32 = 5;
const MAX_TURNS: usize = 400;

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("capbot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = TeamConfig::from_env()?;
    tracing::info!(?config, "team configuration");

    let state = SimState::parse(DEMO_MAZE, VISIBILITY, Stride::Full)?;
    let [first_a, second_a] = create_team(&config, [0, 2]);
    let [first_b, second_b] = create_team(&config, [1, 3]);
    let mut agents: Vec<Agent> = vec![first_a, first_b, second_a, second_b];

    let final_state = run_match(state, &mut agents, MAX_TURNS);
    tracing::info!(
        score = final_state.score(),
        over = final_state.is_over(),
        "match finished"
    );

    Ok(())
}
