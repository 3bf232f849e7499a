//! Photobooth CLI: timed capture and photostrip compositing.
//!
//! Usage:
//!   photobooth shoot [OPTIONS]        Run a capture session and save the strip
//!   photobooth compose <IMAGES>...    Compose existing images into a strip
//!   photobooth preview <IMAGE>        Render the viewfinder look of an image
//!   photobooth check                  Show config, font, and defaults

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use photobooth_model::{FilterKind, LayoutCount, StripTheme, ViewportClass};

mod commands;

#[derive(Parser)]
#[command(
    name = "photobooth",
    about = "Countdown photo booth with photostrip compositing",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Look selections shared by every rendering command.
#[derive(clap::Args, Debug, Clone)]
struct LookArgs {
    /// Photo filter: none|grayscale|sepia|soft|vintage
    #[arg(short, long)]
    filter: Option<FilterKind>,

    /// Strip theme: white|black|gray
    #[arg(short, long)]
    theme: Option<StripTheme>,

    /// Viewport class: narrow|medium|wide
    #[arg(long, default_value = "wide")]
    viewport: ViewportClass,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a capture session and save the photostrip
    Shoot {
        /// Photos per strip (2, 3, or 4)
        #[arg(short, long)]
        layout: Option<LayoutCount>,

        /// Directory of still images to use as the camera
        #[arg(long)]
        stills: Option<PathBuf>,

        #[command(flatten)]
        look: LookArgs,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip countdown pauses
        #[arg(long)]
        fast: bool,

        /// Simulate an unavailable camera on these shots
        #[arg(long, value_delimiter = ',')]
        drop_shots: Vec<u32>,

        /// Print sequencer events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Compose existing images into a photostrip
    Compose {
        /// Images in strip order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Photos per strip (defaults to the number of images)
        #[arg(short, long)]
        layout: Option<LayoutCount>,

        #[command(flatten)]
        look: LookArgs,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the viewfinder look of an image
    Preview {
        /// Image to preview
        image: PathBuf,

        #[command(flatten)]
        look: LookArgs,

        /// Photos per strip, for the info tags
        #[arg(short, long)]
        layout: Option<LayoutCount>,

        /// Output file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Show config path, font availability, and defaults
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = photobooth_common::config::BoothConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    photobooth_common::logging::init_logging(&config.logging);
    tracing::debug!(
        path = %photobooth_common::config::BoothConfig::path().display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Shoot {
            layout,
            stills,
            look,
            output,
            fast,
            drop_shots,
            json,
        } => {
            commands::shoot::run(
                &config,
                commands::shoot::ShootArgs {
                    layout,
                    stills,
                    filter: look.filter,
                    theme: look.theme,
                    viewport: look.viewport,
                    output,
                    fast,
                    drop_shots,
                    json,
                },
            )
            .await
        }
        Commands::Compose {
            images,
            layout,
            look,
            output,
        } => {
            commands::compose::run(
                &config,
                images,
                layout,
                look.filter,
                look.theme,
                look.viewport,
                output,
            )
            .await
        }
        Commands::Preview {
            image,
            look,
            layout,
            output,
        } => commands::preview::run(
            &config,
            image,
            layout,
            look.filter,
            look.theme,
            look.viewport,
            output,
        ),
        Commands::Check => commands::check::run(&config),
    }
}
