//! gmscreen - A gamemaster screen for tabletop sessions.
//!
//! This is the main binary that launches the TUI application.
//!
//! ```text
//! gmscreen [EXPORTED_SCREEN.json]
//! ```
//!
//! With a file argument the exported screen is imported and saved as a new
//! screen. Otherwise the most recently saved screen is reopened, or an empty
//! one is created from the configured defaults.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use gmscreen_config::store::{generate_screen_id, import_screen};
use gmscreen_config::{Config, ScreenStore};
use gmscreen_tui::{App, terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const ENV_LOG: &str = "GMSCREEN_LOG";

/// Installs a file logger under `data_dir`.
///
/// Stdout belongs to the TUI, so nothing is ever logged there.
fn init_logging(data_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    let log_path = data_dir.join("gmscreen.log");
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))
}

/// Builds the app for this launch: an imported file, the latest saved
/// screen, or a fresh one.
fn open_screen(config: &Config, store: ScreenStore) -> anyhow::Result<App> {
    if let Some(path) = std::env::args_os().nth(1) {
        let document = import_screen(&path)?;
        let id = generate_screen_id();
        store.save_screen(&id, &document)?;
        info!(path = %Path::new(&path).display(), %id, "imported screen");
        return Ok(App::from_document(&document)?.with_store(store, id));
    }

    if let Some(latest) = store.list_screens()?.into_iter().next() {
        let document = store.load_screen(&latest.id)?;
        info!(id = %latest.id, name = %latest.name, "reopening screen");
        return Ok(App::from_document(&document)?.with_store(store, latest.id));
    }

    let id = generate_screen_id();
    Ok(App::new(config.screen_settings())?.with_store(store, id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().await?;
    let data_dir = config.resolve_data_dir()?;
    init_logging(&data_dir)?;
    let store = ScreenStore::open(&data_dir)?;
    let mut app = open_screen(&config, store)?;

    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();

    let mut terminal = terminal::setup_terminal()?;

    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}
