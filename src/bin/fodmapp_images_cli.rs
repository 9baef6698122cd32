//! FODMAPP Images CLI - Bridge interface for the landing page build
//!
//! Commands: slots, resolve, render
//! Outputs JSON (or HTML for render) to stdout, logs to stderr
//! Returns non-zero on configuration errors

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fodmapp_images::{
    ConfigError, EnvConvention, GlobalImages, ResolutionManifest, Resolver, Slot, SmartImage,
};

#[derive(Parser)]
#[command(name = "fodmapp-images")]
#[command(about = "FODMAPP Images - slot resolution with placeholder fallback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the global image object (JSON keyed by slot name)
    #[arg(short, long, global = true)]
    images: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List slots with their configuration keys and defaults
    Slots,

    /// Resolve one slot, or every slot into a manifest
    Resolve {
        /// Slot name (front, chat, camera)
        #[arg(short, long)]
        slot: Option<Slot>,
    },

    /// Render a slot as an HTML fragment
    Render {
        /// Slot name (front, chat, camera)
        #[arg(short, long)]
        slot: Slot,

        /// Alt text; defaults to the slot's label
        #[arg(short, long)]
        label: Option<String>,

        /// Simulate one load failure before rendering
        #[arg(long)]
        failed: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let global = match load_global(cli.images.as_deref()) {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "failed to load image config");
            print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let resolver = Resolver::from_process(global);

    match cli.command {
        Commands::Slots => {
            let slots: Vec<_> = Slot::ALL
                .iter()
                .map(|slot| serde_json::json!({
                    "slot": slot,
                    "env": EnvConvention::ALL
                        .iter()
                        .map(|c| c.key_for(*slot))
                        .collect::<Vec<_>>(),
                    "default": slot.default_reference(),
                    "label": slot.default_label(),
                }))
                .collect();
            print_json(&slots)
        }

        Commands::Resolve { slot: Some(slot) } => print_json(&resolver.resolve_traced(slot)),

        Commands::Resolve { slot: None } => match ResolutionManifest::build(&resolver) {
            Ok(manifest) => print_json(&manifest),
            Err(e) => {
                print_error(&format!("Failed to build manifest: {}", e));
                ExitCode::FAILURE
            }
        },

        Commands::Render { slot, label, failed } => {
            let label = label.unwrap_or_else(|| slot.default_label().to_string());
            let mut image = SmartImage::mount(Some(resolver.resolve(slot)), label);
            let mut output = image.render();
            if failed {
                if let Some(detector) = image.load_failure() {
                    detector.fire();
                }
                if image.needs_render() {
                    output = image.render();
                }
            }
            println!("{}", output.to_html());
            ExitCode::SUCCESS
        }
    }
}

fn load_global(path: Option<&Path>) -> Result<Option<GlobalImages>, ConfigError> {
    path.map(GlobalImages::load_from_file).transpose()
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn print_error(message: &str) {
    println!("{}", error_json(message));
}

fn error_json(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}
