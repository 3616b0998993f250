// ABOUTME: Main entry point for the slidecraft program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use slidecraft::config::parse_hue;
use slidecraft::{Config, NamingScheme};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render slide images from a JSON deck
    Render(RenderArgs),

    /// Put every template image on one shared background colour
    Colorize(ColorizeArgs),

    /// Re-render a deck whenever it changes
    Watch(WatchArgs),
}

#[derive(Args)]
struct ComposeArgs {
    /// Output directory for slide images
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding template images
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Directory holding font files
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Directory holding emoji images named by code point
    #[arg(long)]
    emojis: Option<PathBuf>,

    /// Background hue (0-360); random when omitted
    #[arg(long, value_parser = hue_arg)]
    hue: Option<u16>,

    /// Output naming: 'indexed' or 'sequential'
    #[arg(long)]
    naming: Option<NamingScheme>,
}

#[derive(Args)]
struct RenderArgs {
    /// Path to the slide deck JSON
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    compose: ComposeArgs,
}

#[derive(Args)]
struct ColorizeArgs {
    /// Directory holding template images
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Output directory (defaults to output_uniform_hue_<hue>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Background hue (0-360); random when omitted
    #[arg(long, value_parser = hue_arg)]
    hue: Option<u16>,
}

#[derive(Args)]
struct WatchArgs {
    /// Path to the slide deck JSON
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    compose: ComposeArgs,

    /// Debounce time in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

fn hue_arg(value: &str) -> Result<u16, String> {
    parse_hue(value).map_err(|e| e.to_string())
}

fn compose_config(app_config: &Config, args: &ComposeArgs) -> slidecraft::ComposeConfig {
    app_config.get_compose_config(
        args.templates.clone(),
        args.fonts.clone(),
        args.emojis.clone(),
        args.output.clone(),
        args.hue,
        args.naming,
    )
}

fn run(cli: &Cli, app_config: &Config) -> slidecraft::Result<()> {
    match &cli.command {
        Some(Commands::Render(args)) => {
            println!("Executing render command...");
            let report = slidecraft::render_deck_file(&args.input, compose_config(app_config, &args.compose))?;

            for (index, reason) in &report.failures {
                eprintln!("Slide {} failed: {}", index, reason);
            }
            println!("Rendered {}/{} slide(s)", report.rendered, report.attempted);
            Ok(())
        }
        Some(Commands::Colorize(args)) => {
            println!("Executing colorize command...");
            let hue = args
                .hue
                .or(app_config.hue)
                .unwrap_or_else(slidecraft::background::random_hue);
            let template_dir = args
                .templates
                .clone()
                .unwrap_or_else(|| app_config.template_dir.clone());
            let output_dir = args
                .output
                .clone()
                .unwrap_or_else(|| slidecraft::background::default_colorize_dir(hue));

            let written = slidecraft::colorize_templates(&template_dir, &output_dir, hue)?;
            println!(
                "Colorized {} template(s) with hue {} into {:?}",
                written.len(),
                hue,
                output_dir
            );
            Ok(())
        }
        Some(Commands::Watch(args)) => {
            println!("Executing watch command...");
            let mut watch_config =
                slidecraft::WatchConfig::new(args.input.clone(), compose_config(app_config, &args.compose));
            watch_config.debounce_ms = args.debounce_ms;
            slidecraft::watch_deck(watch_config)
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = Config::from_env().and_then(|app_config| run(&cli, &app_config));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
