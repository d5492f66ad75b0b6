pub mod api;
pub mod core;
pub mod shared;
mod logger;

use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::commands::{self, Command};
use crate::api::render;
use crate::core::session::SessionRuntime;
use crate::core::storage::PersistenceStore;
use crate::shared::settings::AppSettings;
use crate::shared::AppResult;

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_repl()) {
        tracing::error!("[UnitFlip] {}", e);
        std::process::exit(1);
    }
}

async fn run_repl() -> AppResult<()> {
    // Settings decide the log level, so a load failure is reported after the logger is up
    let (settings, settings_error) = match AppSettings::load().await {
        Ok(settings) => (settings, None),
        Err(e) => (AppSettings::default(), Some(e)),
    };

    if let Err(e) = logger::init(settings.tracing_level()) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    if let Some(e) = settings_error {
        tracing::warn!("[UnitFlip] Failed to load settings: {}, using defaults", e);
    }

    let store = match settings.data_dir() {
        Ok(dir) => PersistenceStore::open_or_in_memory(&dir),
        Err(e) => {
            tracing::warn!("[UnitFlip] No data directory ({}), history and favorites will not be saved", e);
            PersistenceStore::in_memory()
        }
    };

    let mut runtime = SessionRuntime::open(Arc::new(store), &settings);
    println!("{}", render::render_view(&runtime.view()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_line(&mut runtime, &line) {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(()) = runtime.process_settled() => {
                println!("{}", render::render_view(&runtime.view()));
            }
        }
    }

    tracing::info!("[UnitFlip] Exiting");
    Ok(())
}

/// Returns false when the user asked to quit
fn handle_line(runtime: &mut SessionRuntime, line: &str) -> bool {
    let view = runtime.view();

    match commands::parse_command(line, &view) {
        Ok(Command::Quit) => return false,
        Ok(Command::Help) => println!("{}", commands::HELP),
        Ok(Command::ShowHistory) => println!("{}", render::render_history(&view, Utc::now())),
        Ok(Command::ShowFavorites) => println!("{}", render::render_favorites(&view)),
        Ok(Command::ShowUnits) => println!("{}", render::render_units(view.category)),
        Ok(Command::Events(events)) => {
            if events.is_empty() {
                return true;
            }
            for event in events {
                runtime.dispatch(event);
            }
            if runtime.has_pending_edit() {
                // Result follows once the edit settles
                println!("  {} …", runtime.session().input());
            } else {
                println!("{}", render::render_view(&runtime.view()));
            }
        }
        Err(e) => println!("{}", e),
    }

    true
}
