//! tvdeck - Discover TV shows from the terminal
//!
//! A terminal UI application for browsing trending, top rated and popular TV
//! shows from TMDB, searching, and keeping a short-lived favorites list.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use tvdeck::app::App;
use tvdeck::cache::{FileStore, KeyValueStore, MemoryStore, TieredCache};
use tvdeck::catalog::Catalog;
use tvdeck::cli::{Cli, StartupConfig};
use tvdeck::clock::{Clock, SystemClock};
use tvdeck::config::{Config, CACHE_DIR_VAR};
use tvdeck::data::{ImageUrls, TmdbClient, TV_GENRES};
use tvdeck::events::ChangeBus;
use tvdeck::favorites::FavoritesStore;
use tvdeck::fetch::FetchHandle;
use tvdeck::logging;
use tvdeck::sync::{StorageWatcher, SyncConfig};
use tvdeck::ui;

/// How long to wait for a key before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Prints `message` to stderr and exits with a failure status
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Opens the durable store: `cache_dir` if given, else the XDG cache directory
fn durable_store(cache_dir: Option<PathBuf>) -> Option<FileStore> {
    match cache_dir {
        Some(dir) => Some(FileStore::with_dir(dir)),
        None => FileStore::new(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.list_genres {
        for (id, name) in TV_GENRES {
            println!("{:>6}  {}", id, name);
        }
        return Ok(());
    }

    let startup = StartupConfig::from_cli(&cli).unwrap_or_else(|e| fail(e));

    if cli.clear_cache {
        dotenvy::dotenv().ok();
        let cache_dir = std::env::var(CACHE_DIR_VAR).ok().map(PathBuf::from);
        let store = durable_store(cache_dir)
            .unwrap_or_else(|| fail("Could not determine a cache directory"));
        store.clear()?;
        println!("Cleared {}", store.dir().display());
        return Ok(());
    }

    // A missing API key is fatal before the terminal is taken over
    let config = Config::from_env().unwrap_or_else(|e| fail(e));

    let store = durable_store(config.cache_dir.clone())
        .unwrap_or_else(|| fail("Could not determine a cache directory"));
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| logging::default_log_path(store.dir()));
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: logging disabled ({}): {}", log_path.display(), e);
    }
    tracing::info!(
        base_url = %config.base_url,
        cache_dir = %store.dir().display(),
        "Starting tvdeck"
    );

    // Shared state, built once and passed in
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let durable: Arc<dyn KeyValueStore> = Arc::new(store);
    let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let cache = Arc::new(TieredCache::new(session, durable.clone(), clock.clone()));
    let client = TmdbClient::new(config.api_key.clone(), config.base_url.clone());
    let catalog = Catalog::new(Arc::new(client), cache);

    let bus = ChangeBus::new();
    let mut changes = bus.subscribe();
    let favorites = FavoritesStore::new(durable.clone(), bus.clone(), clock);
    let watcher = StorageWatcher::spawn(SyncConfig::default(), durable, bus);
    let mut fetcher = FetchHandle::new(catalog);

    let mut app = App::new(favorites, ImageUrls::new(config.image_base_url.clone()), startup);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        let now = Instant::now();
        app.tick(now);
        fetcher.dispatch_all(app.take_requests());
        while let Some(outcome) = fetcher.try_recv() {
            app.apply(outcome);
        }
        while let Some(change) = changes.try_next() {
            app.handle_change(&change);
        }

        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    watcher.shutdown().await;
    tracing::info!("Exiting tvdeck");

    Ok(())
}
