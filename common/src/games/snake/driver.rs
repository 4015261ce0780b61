use crate::error::SnakeResult;
use super::engine::{step, Intents, StepContext, TickEvent};
use super::render::RenderDelta;
use super::state::WorldState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub state: WorldState,
    /// Food spawns, then clears, then head draws.
    pub deltas: Vec<RenderDelta>,
    pub events: Vec<TickEvent>,
    pub should_end: bool,
}

/// Runs a single tick and flattens the engine's deltas into emission order,
/// so a head drawn over a freshly vacated tail is not wiped by the clear.
pub fn run_tick(state: &WorldState, intents: &Intents, ctx: &mut StepContext<'_>) -> SnakeResult<TickReport> {
    if state.game_over {
        return Ok(TickReport {
            state: state.clone(),
            deltas: Vec::new(),
            events: Vec::new(),
            should_end: true,
        });
    }

    let outcome = step(state, intents, ctx)?;
    let buckets = outcome.deltas;

    let mut deltas =
        Vec::with_capacity(buckets.food_spawns.len() + buckets.clears.len() + buckets.head_draws.len());
    deltas.extend(buckets.food_spawns);
    deltas.extend(buckets.clears);
    deltas.extend(buckets.head_draws);

    Ok(TickReport {
        should_end: outcome.state.game_over,
        state: outcome.state,
        deltas,
        events: outcome.events,
    })
}

/// Deltas that paint a freshly spawned world: all foods, then all snakes.
pub fn initial_deltas(state: &WorldState) -> Vec<RenderDelta> {
    let foods = state
        .players
        .iter()
        .filter_map(|p| p.food.map(|food| RenderDelta::draw_food(food.position, p.id())));
    let bodies = state
        .players
        .iter()
        .filter(|p| p.is_alive())
        .flat_map(|p| p.snake.body.iter().map(move |cell| RenderDelta::draw_snake(*cell, p.id())));

    foods.chain(bodies).collect()
}
