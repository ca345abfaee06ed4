//! Retry flow across attempts
//!
//! Every attempt reloads the level from scratch and drops the surviving
//! player in at the spawn point. A death costs a life and triggers another
//! attempt while lives remain; any other ending finishes the session.

use std::time::Duration;

use crate::error::SimError;
use crate::level::Level;
use crate::platform::InputSource;
use crate::renderer::{Color, RenderSink};
use crate::settings::Settings;
use crate::sim::{Outcome, Player, World, tick};

/// Backdrop of full-screen messages
const MESSAGE_BACKGROUND: Color = Color::rgba(0, 0, 0, 255);
/// Glyph width of the sink's font
const GLYPH_WIDTH: i32 = 8;

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub attempts: u32,
    /// Lives left after the last restart
    pub lives: u32,
    pub coins: u32,
    /// Frames played over all attempts
    pub ticks: u64,
}

pub struct Session {
    level: String,
    seed: u64,
    max_ticks: Option<u64>,
    frame_delay: Option<Duration>,
    message_delay: Option<Duration>,
}

impl Session {
    /// `level` is the level text, parsed again for every attempt
    pub fn new(level: impl Into<String>, settings: &Settings) -> Self {
        let (frame_delay, message_delay) = if settings.realtime {
            (
                Some(Duration::from_millis(settings.frame_ms)),
                Some(Duration::from_millis(settings.message_ms)),
            )
        } else {
            (None, None)
        };
        Self {
            level: level.into(),
            seed: settings.seed,
            max_ticks: settings.max_ticks,
            frame_delay,
            message_delay,
        }
    }

    /// Play attempts until the game is over
    pub fn run(
        &self,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> Result<SessionReport, SimError> {
        let mut carried: Option<Player> = None;
        let mut attempts = 0;
        let mut ticks = 0;

        loop {
            attempts += 1;
            let mut world = Level::parse(&self.level)?.into_world(self.seed);
            if let Some(player) = carried.take() {
                world.substitute_player(player);
            }
            log::info!(
                "attempt {} starting with {} lives",
                attempts,
                world.player.lives()
            );

            let outcome = self.play(&mut world, input, sink)?;
            ticks += world.time_ticks;

            let mut player = world.into_player();
            let lives_left = player.restart();
            if outcome != Outcome::Dead || !lives_left {
                return Ok(SessionReport {
                    outcome,
                    attempts,
                    lives: player.lives(),
                    coins: player.coins(),
                    ticks,
                });
            }

            log::info!("{} lives left", player.lives());
            self.show_message(sink, &format!("{} lives left", player.lives()));
            carried = Some(player);
        }
    }

    /// Tick one world until it ends or runs out of frames
    fn play(
        &self,
        world: &mut World,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> Result<Outcome, SimError> {
        loop {
            let outcome = tick(world, input, sink)?;
            if outcome.is_terminal() {
                return Ok(outcome);
            }
            if self.max_ticks.is_some_and(|max| world.time_ticks >= max) {
                log::warn!("attempt cut short after {} frames", world.time_ticks);
                return Ok(Outcome::KeepOn);
            }
            if let Some(delay) = self.frame_delay {
                std::thread::sleep(delay);
            }
        }
    }

    /// Full-screen centred message
    pub fn show_message(&self, sink: &mut dyn RenderSink, text: &str) {
        show_message(sink, text);
        if let Some(delay) = self.message_delay {
            std::thread::sleep(delay);
        }
    }
}

/// Draw `text` centred on a black screen and present it
pub fn show_message(sink: &mut dyn RenderSink, text: &str) {
    sink.fill(MESSAGE_BACKGROUND);
    let x = sink.width() / 2 - text.len() as i32 * GLYPH_WIDTH / 2;
    sink.draw_text(x, sink.height() / 2 - 4, text);
    sink.present();
}
