mod driver;
mod engine;
mod food;
mod grid;
mod render;
mod session;
mod settings;
mod snake;
mod state;
mod types;

pub use driver::{initial_deltas, run_tick, TickReport};
pub use engine::{step, DeltaBuckets, Intents, StepContext, StepOutcome, TickEvent};
pub use food::{food_score, place_food, Food};
pub use grid::{Grid, WrapResult};
pub use render::{status_labels, tick_delay_ms, ColorClass, Glyph, RenderDelta, StatusLabel, EMPTY_CHAR, PLAYER_COLORS};
pub use session::{Control, FinalScores, GameSession, ScoreEntry, SessionStatus};
pub use settings::{Rules, SimulationConfig, MAX_PLAYERS};
pub use snake::{Snake, INITIAL_SNAKE_LENGTH};
pub use state::{PlayerState, WorldState};
pub use types::{BoundaryMode, Coordinate, DeathReason, Direction};
