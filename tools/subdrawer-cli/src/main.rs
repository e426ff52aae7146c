//! Subdrawer CLI: inspect and export skeleton annotations without the editor window.
//!
//! Usage:
//!   subdrawer list <FOLDER>       List the images the editor would show
//!   subdrawer info <FOLDER>       Summarize the pose data of a folder
//!   subdrawer validate <FOLDER>   Check the pose file and report unannotated images
//!   subdrawer export <FOLDER>     Write skeleton images and the pose file
//!                                 (--width, --height, --background original|black)

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use subdrawer_common::config::{AppConfig, LoggingConfig};
use subdrawer_editor::BackgroundMode;

mod commands;

#[derive(Parser)]
#[command(
    name = "subdrawer",
    about = "Skeleton annotation data for pose-conditioned image generation",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the bundled initial_pose.json (overrides config)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the images of a working folder in editor order
    List {
        /// Working folder
        folder: PathBuf,
    },

    /// Show pose data information
    Info {
        /// Working folder
        folder: PathBuf,
    },

    /// Validate the pose data of a working folder
    Validate {
        /// Working folder
        folder: PathBuf,
    },

    /// Export skeleton images and the pose file
    Export {
        /// Working folder
        folder: PathBuf,

        /// Canvas width (defaults to the editor's initial canvas)
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height (defaults to keeping the aspect ratio)
        #[arg(long)]
        height: Option<u32>,

        /// Background used to size the canvas: "original" or "black"
        /// (defaults to black when a size is given)
        #[arg(long)]
        background: Option<BackgroundMode>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(home) = cli.home {
        config.home_dir = home;
    }

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    subdrawer_common::logging::init_logging(&LoggingConfig {
        level,
        ..config.logging.clone()
    });

    match cli.command {
        Commands::List { folder } => commands::list::run(config, folder),
        Commands::Info { folder } => commands::info::run(config, folder),
        Commands::Validate { folder } => commands::validate::run(config, folder),
        Commands::Export {
            folder,
            width,
            height,
            background,
        } => commands::export::run(config, folder, width, height, background),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_background_option() {
        let cli = Cli::try_parse_from(["subdrawer", "export", "shots", "--background", "black"]).unwrap();
        match cli.command {
            Commands::Export { background, .. } => assert_eq!(background, Some(BackgroundMode::BlackBg)),
            _ => panic!("expected export"),
        }

        let cli = Cli::try_parse_from(["subdrawer", "export", "shots", "--background", "Original Image"]).unwrap();
        match cli.command {
            Commands::Export { background, .. } => {
                assert_eq!(background, Some(BackgroundMode::OriginalImage))
            }
            _ => panic!("expected export"),
        }

        assert!(Cli::try_parse_from(["subdrawer", "export", "shots", "--background", "sepia"]).is_err());
    }
}
