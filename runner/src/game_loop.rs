use std::time::Duration;

use snake_common::games::Clock;
use snake_common::games::snake::{Control, FinalScores, GameSession, Intents, SessionStatus};
use snake_common::{log, log_debug, log_warn};

use crate::bot_controller::BotController;
use crate::canvas::Canvas;

#[derive(Clone, Copy, Debug)]
pub struct LoopOptions {
    /// Quit after this many ticks. Zero runs until every snake is dead.
    pub max_ticks: u64,
    /// Sleep the tick delay between ticks and print each frame.
    pub realtime: bool,
}

/// Drives a session to completion: bots pick intents, the session ticks,
/// and the resulting deltas land on the canvas. Ctrl+C quits the session.
/// A failing tick ends the session, which still reports its scores.
pub async fn run_game_loop<C: Clock>(
    session: &mut GameSession<C>,
    bots: &mut [BotController],
    canvas: &mut Canvas,
    options: LoopOptions,
) -> FinalScores {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while !session.is_ended() {
        if options.max_ticks > 0 && session.tick_count() >= options.max_ticks {
            log!("Tick limit {} reached", options.max_ticks);
            session.apply_control(Control::Quit);
            break;
        }

        let delay = if options.realtime {
            Duration::from_millis(session.tick_delay_ms())
        } else {
            Duration::ZERO
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                let intents = collect_intents(session, bots);
                let (deltas, status) = match session.tick(&intents) {
                    Ok(result) => result,
                    Err(err) => {
                        log_warn!("Session stopped: {}", err);
                        return session.final_scores();
                    }
                };

                canvas.apply_all(&deltas);
                canvas.set_status(&session.status_labels());
                log_debug!("Tick {}: {} deltas", session.tick_count(), deltas.len());

                if options.realtime {
                    println!("\x1b[2J\x1b[H{}", canvas.render());
                }
                if let SessionStatus::Ended { final_scores } = status {
                    return final_scores;
                }
            }
            _ = &mut shutdown => {
                log!("Interrupted, quitting session");
                session.apply_control(Control::Quit);
            }
        }
    }

    session.final_scores()
}

fn collect_intents<C: Clock>(session: &GameSession<C>, bots: &mut [BotController]) -> Intents {
    bots.iter_mut()
        .map(|bot| (bot.player_id(), bot.calculate_move(session.state(), session.rules())))
        .collect()
}
