// ABOUTME: Watch module for monitoring deck changes and re-rendering slides
// ABOUTME: Provides file watching and auto-regeneration of slide images

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;

use crate::compose::{ComposeConfig, DeckReport, SlideComposer};
use crate::errors::{Result, SlideError};
use crate::slides;
use crate::utils;

/// Configuration for watch mode
pub struct WatchConfig {
    /// Path to the slide deck JSON to watch
    pub deck_path: PathBuf,

    /// How slides are composed on every regeneration
    pub compose: ComposeConfig,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,
}

impl WatchConfig {
    pub fn new(deck_path: PathBuf, compose: ComposeConfig) -> Self {
        Self {
            deck_path,
            compose,
            debounce_ms: 500,
        }
    }
}

/// Starts watching a deck file and re-renders its slides when it changes.
///
/// The background hue is fixed on the first render so every regeneration
/// produces the same colours. Template images changing also trigger a render.
pub fn watch_deck(mut config: WatchConfig) -> Result<()> {
    // Validate input file exists
    utils::validate_file_exists(&config.deck_path)?;
    utils::ensure_directory_exists(&config.compose.output_dir)?;

    // Initial generation, pinning the hue for later runs
    let hue = regenerate(&config)?;
    config.compose.hue = Some(hue);

    // Create a channel to receive file system events
    let (tx, rx) = mpsc::channel();

    // Create debouncer for file system events
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| SlideError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    // Get the directory containing the deck file
    let watch_path = match config.deck_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."), // A bare file name lives in the current directory
    };
    let abs_watch_path = utils::get_absolute_path(watch_path)?;
    debug!("Watching absolute path: {:?}", abs_watch_path);

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::NonRecursive)?;
    if config.compose.template_dir.is_dir() {
        debouncer
            .watcher()
            .watch(&config.compose.template_dir, RecursiveMode::NonRecursive)?;
    }

    info!("Watching for changes to {:?}", config.deck_path);
    println!(
        "Watching for changes to {:?} (Press Ctrl+C to stop)",
        config.deck_path
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let is_relevant = is_relevant_path(path, &config);
                        if is_relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        is_relevant
                    })
                });

                let now = Instant::now();
                if relevant
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate(&config) {
                        Ok(_) => last_processed = now,
                        Err(e) => error!("Failed to re-render deck: {}", e),
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// Checks if a changed path should trigger a re-render (the deck or a template image)
fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    let same_file = |a: &Path, b: &Path| match (utils::get_absolute_path(a), utils::get_absolute_path(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    };

    if same_file(path, &config.deck_path) {
        return true;
    }

    let in_template_dir = path
        .parent()
        .map(|parent| same_file(parent, &config.compose.template_dir))
        .unwrap_or(false);
    let is_png = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    in_template_dir && is_png
}

/// Render the whole deck once, returning the hue that was used
fn regenerate(config: &WatchConfig) -> Result<u16> {
    info!("Rendering deck {:?}...", config.deck_path);

    let slides = slides::load_deck(&config.deck_path)?;
    let mut composer = SlideComposer::new(config.compose.clone());
    let report: DeckReport = composer.render_deck(&slides);

    println!(
        "Rendered {}/{} slide(s) into {:?}",
        report.rendered, report.attempted, config.compose.output_dir
    );
    Ok(composer.hue())
}
