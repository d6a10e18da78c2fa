//! Headless host for the Focus Founder progression engine.
//!
//! Drives a [`Game`] from a fixed-rate frame loop and turns stdin lines into
//! focus signals and player commands. Real time between frames is handed to
//! the game, which only lets it through while the player is focused.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `founder-config.yaml` (or the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Load the content catalog
//! 4. Restore the save file, or start a new company
//! 5. Run the frame loop until `quit` or Ctrl-C
//! 6. Close the focus session and write the save file

mod command;
mod error;
mod journal;
mod save;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use founder_core::catalog::load_catalog;
use founder_core::config::LoggingConfig;
use founder_core::{CommandError, FounderConfig, Game, LogFormat, SystemTimeSource};
use founder_types::OfficeId;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::{HostCommand, ParseError};
use crate::error::EngineError;

/// Config file read when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "founder-config.yaml";

/// Whether the frame loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the catalog, or the save file cannot
/// be loaded, or if a frame fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) =
        load_config(&config_path).with_context(|| format!("loading {}", config_path.display()))?;

    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        from_file,
        frame_interval_ms = config.engine.frame_interval_ms,
        debounce_secs = config.focus.debounce_secs,
        min_session_secs = config.focus.min_session_secs,
        "founder-engine starting"
    );

    let catalog = load_catalog(&config.engine.catalog_path).map_err(EngineError::from)?;
    let mut game = Game::new(config, catalog, Arc::new(SystemTimeSource));
    let _journal = journal::attach(game.bus());

    restore_or_start(&mut game)?;
    info!("entering frame loop; type `focus` to start working");
    run(&mut game).await?;

    game.focus_lost();
    if let Some(path) = game.config().engine.save_path.clone() {
        save::write_snapshot(&path, &game.capture_state())?;
    }
    info!(
        ticks = game.clock().tick(),
        simulated_secs = game.clock().simulated_secs(),
        focus_today_secs = game.focus().total_focus_today_secs(),
        "founder-engine shutdown complete"
    );
    Ok(())
}

/// Load the configuration, falling back to defaults when the file is
/// missing. The flag reports whether the file was found.
fn load_config(path: &Path) -> Result<(FounderConfig, bool), EngineError> {
    if path.exists() {
        Ok((FounderConfig::from_file(path)?, true))
    } else {
        Ok((FounderConfig::parse("")?, false))
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Apply the save file if there is one, otherwise set up a new company.
fn restore_or_start(game: &mut Game) -> Result<(), EngineError> {
    if let Some(path) = game.config().engine.save_path.clone()
        && let Some(snapshot) = save::load_snapshot(&path)?
    {
        let report = game.restore_state(&snapshot)?;
        for skipped in &report.skipped {
            warn!(
                kind = skipped.kind,
                id = %skipped.id,
                reason = %skipped.reason,
                "save entry skipped"
            );
        }
        return Ok(());
    }

    if game.start_new_company()?.is_none() {
        warn!("starter office unavailable; the company starts empty");
    }
    Ok(())
}

/// Run frames until `quit`, Ctrl-C, or a frame error.
async fn run(game: &mut Game) -> Result<(), EngineError> {
    let frame = Duration::from_millis(game.config().engine.frame_interval_ms);
    let mut interval = tokio::time::interval(frame);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last = Instant::now();

    loop {
        tokio::select! {
            now = interval.tick() => {
                let raw = now.saturating_duration_since(last).as_secs_f64();
                last = now;
                game.tick(raw)?;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if handle_line(game, &line) == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed; running until interrupted");
                    stdin_open = false;
                }
                Err(err) => {
                    warn!(error = %err, "stdin read failed; running until interrupted");
                    stdin_open = false;
                }
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "ctrl-c handler failed");
                }
                info!("interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn handle_line(game: &mut Game, line: &str) -> Flow {
    let command = match HostCommand::parse(line) {
        Ok(command) => command,
        Err(ParseError::Empty) => return Flow::Continue,
        Err(err) => {
            warn!(error = %err, "ignoring input");
            return Flow::Continue;
        }
    };
    debug!(?command, "host command");

    match command {
        HostCommand::Focus => {
            game.focus_gained();
        }
        HostCommand::Blur => game.focus_lost(),
        HostCommand::Pause => game.pause(),
        HostCommand::Resume => {
            game.resume();
        }
        HostCommand::Run(running) => game.set_running(running),
        HostCommand::Hire { archetype, office } => {
            let office = office.or_else(|| first_office(game));
            report("hire", game.hire(&archetype, office));
        }
        HostCommand::Unlock { office } => report("unlock", game.unlock_office(&office)),
        HostCommand::Queue { task, office } => match office.or_else(|| first_office(game)) {
            Some(office) => report("queue", game.queue_task(&task, office)),
            None => warn!(%task, "no office to queue into"),
        },
        HostCommand::Upgrade { upgrade, office } => {
            report("upgrade", game.purchase_upgrade(&upgrade, office));
        }
        HostCommand::Assign { employee, office } => {
            if !game.assign(employee, office) {
                warn!(%employee, %office, "assignment refused");
            }
        }
        HostCommand::Status => log_status(game),
        HostCommand::Save => save_now(game),
        HostCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn first_office(game: &Game) -> Option<OfficeId> {
    game.offices().offices().next().map(|office| office.id())
}

fn report<T: core::fmt::Debug>(command: &str, result: Result<T, CommandError>) {
    match result {
        Ok(outcome) => info!(command, ?outcome, "command applied"),
        Err(err) => warn!(command, error = %err, "command failed"),
    }
}

fn log_status(game: &Game) {
    let balance = game.economy().balance();
    info!(
        tick = game.clock().tick(),
        simulated_secs = game.clock().simulated_secs(),
        focused = game.focus().focused(),
        paused = game.focus().is_paused(),
        focus_today_secs = game.focus().total_focus_today_secs(),
        cash = balance.cash,
        research = balance.research,
        reputation = balance.reputation,
        offices = game.offices().len(),
        employees = game.employees().len(),
        queued_tasks = game.tasks().total_queued(),
        "status"
    );
}

fn save_now(game: &Game) {
    match &game.config().engine.save_path {
        Some(path) => {
            if let Err(err) = save::write_snapshot(path, &game.capture_state()) {
                warn!(error = %err, "save failed");
            }
        }
        None => warn!("engine.save_path is not configured"),
    }
}
