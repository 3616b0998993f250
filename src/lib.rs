// ABOUTME: Library module for the slidecraft program.
// ABOUTME: Contains text layout, highlight rendering and slide composition.

// Reexport modules
pub mod background;
pub mod compose;
pub mod config;
pub mod emoji;
pub mod errors;
pub mod fonts;
pub mod highlight;
pub mod layout;
pub mod markdown;
pub mod metrics;
pub mod slides;
pub mod templates;
pub mod utils;
pub mod watch;
pub mod wrap;

// Reexport common types and functions
pub use background::{apply_background, colorize_templates, hsl_to_rgb};
pub use compose::{ComposeConfig, DeckReport, NamingScheme, PlacedField, SlideComposer, render_deck_file};
pub use config::Config;
pub use emoji::{emoji_filename, paste_emoji};
pub use errors::{Result, SlideError};
pub use fonts::{Font, FontLibrary, TextSize};
pub use highlight::{Rect, draw_highlight};
pub use layout::{Anchor, LineSpacing, Placement, TextBlock, TextStyle, layout_text, render_text};
pub use markdown::{Run, parse_markdown};
pub use metrics::{FontPair, MetricsCache};
pub use slides::{Slide, SlideContent, TemplateKind, load_deck, parse_deck};
pub use watch::{WatchConfig, watch_deck};
pub use wrap::{RunGroup, break_lines, wrap_plain};

#[cfg(test)]
mod tests;
