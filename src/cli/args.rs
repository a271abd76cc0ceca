//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Turn documents into Minto pyramid argument trees, edit them, and export slide decks
#[derive(Parser, Debug)]
#[command(name = "pyramid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .pyramid.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a document into a pyramid
    Analyze {
        /// Document to analyse (.pdf, .txt, .md, ...)
        #[arg(value_hint = ValueHint::FilePath, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Treat the file's content as pasted text
        #[arg(long, value_hint = ValueHint::FilePath)]
        text: Option<PathBuf>,
        /// Title for pasted text
        #[arg(long, requires = "text")]
        title: Option<String>,
        /// Output pyramid document
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Analyse the bundled sample document
    Demo {
        /// Output pyramid document
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the pyramid as a tree
    Show {
        /// Pyramid document
        #[arg(value_hint = ValueHint::FilePath)]
        doc: PathBuf,
    },

    /// Edit the pyramid with gestures read from stdin
    Edit {
        /// Pyramid document
        #[arg(value_hint = ValueHint::FilePath)]
        doc: PathBuf,
        /// Save to this file instead of the input document
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Render the pyramid diagram as SVG
    Render {
        /// Pyramid document
        #[arg(value_hint = ValueHint::FilePath)]
        doc: PathBuf,
        /// Output SVG file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the slide outline
    Slides {
        /// Pyramid document
        #[arg(value_hint = ValueHint::FilePath)]
        doc: PathBuf,
    },

    /// Export the slide deck as HTML
    Export {
        /// Pyramid document
        #[arg(value_hint = ValueHint::FilePath)]
        doc: PathBuf,
        /// Output directory (default: configured output_dir)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Check whether the analysis backend is configured
    Health,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings (API key masked)
    Show,
    /// Show config file locations
    Path,
}
