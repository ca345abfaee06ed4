//! Scroll Runner entry point
//!
//! Headless native driver: loads settings and the level, lets the autopilot
//! play a session into a recording sink and logs how it went.
//!
//! Usage: `scroll-runner [settings.json]`

use std::process::ExitCode;

use scroll_runner::platform::Autopilot;
use scroll_runner::renderer::RecordingSink;
use scroll_runner::session::{Session, SessionReport};
use scroll_runner::{Settings, SimError};

const DEFAULT_SETTINGS: &str = "settings.json";

fn run(settings: &Settings) -> Result<SessionReport, SimError> {
    let level = std::fs::read_to_string(&settings.level)?;
    let session = Session::new(level, settings);
    let mut input = Autopilot::new(settings.autopilot_period);
    let mut sink = RecordingSink::new(settings.width, settings.height);

    let report = session.run(&mut input, &mut sink)?;
    session.show_message(&mut sink, report.outcome.message());

    log::debug!("frames presented: {}", sink.frames);
    for (sheet, uses) in &sink.sheet_uses {
        log::debug!("{} drawn {} times", sheet.file_name(), uses);
    }
    Ok(report)
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Scroll Runner (native, headless) starting...");

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SETTINGS.to_string());
    let settings = Settings::load(&path);

    match run(&settings) {
        Ok(report) => {
            log::info!(
                "{}: {} attempts, {} lives left, {} coins, {} frames",
                report.outcome.message(),
                report.attempts,
                report.lives,
                report.coins,
                report.ticks
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
