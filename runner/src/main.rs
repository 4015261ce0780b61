mod bot_controller;
mod canvas;
mod game_loop;

use clap::Parser;
use snake_common::config::ConfigManager;
use snake_common::games::SessionRng;
use snake_common::games::snake::{BoundaryMode, GameSession, SimulationConfig};
use snake_common::logger::{self, LogLevel};
use snake_common::log;

use bot_controller::BotController;
use canvas::Canvas;
use game_loop::{run_game_loop, LoopOptions};

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    /// YAML simulation config; a missing file means defaults.
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    players: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    boundary_death: bool,

    #[arg(long, default_value_t = 2000)]
    max_ticks: u64,

    #[arg(long)]
    realtime: bool,

    #[arg(long)]
    use_log_prefix: bool,

    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(players) = self.players {
            config.player_count = players;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.boundary_death {
            config.boundary_mode = BoundaryMode::Death;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    let min_level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    logger::init_logger(prefix, min_level);

    let mut config = match &args.config {
        Some(path) => {
            let manager: ConfigManager<_, SimulationConfig, _> = ConfigManager::from_yaml_file(path);
            manager.get_config()?
        }
        None => SimulationConfig::default(),
    };
    args.apply_overrides(&mut config);

    let rows = config.grid_rows;
    let cols = config.grid_cols;
    let mut session = GameSession::new(config)?;
    log!("Running with seed {}", session.seed());

    let mut bots: Vec<BotController> = session
        .state()
        .players
        .iter()
        .map(|p| {
            let seed = session.seed().wrapping_add(p.id().index() as u64 + 1);
            BotController::new(p.id(), SessionRng::new(seed))
        })
        .collect();

    let mut canvas = Canvas::new(rows, cols);
    canvas.apply_all(&session.initial_deltas());
    canvas.set_status(&session.status_labels());

    let options = LoopOptions {
        max_ticks: args.max_ticks,
        realtime: args.realtime,
    };
    let final_scores = run_game_loop(&mut session, &mut bots, &mut canvas, options).await;

    println!("{}", canvas.render());
    println!();
    print!("{}", final_scores);

    Ok(())
}
