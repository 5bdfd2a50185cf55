//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookmeta")]
#[command(about = "Look up book metadata and covers on ISFDB", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// What is known about the book being looked up.
#[derive(Args, Clone)]
pub(crate) struct BookArgs {
    /// Book title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Author name (repeat for multiple authors)
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// ISBN-10 or ISBN-13
    #[arg(long)]
    pub isbn: Option<String>,

    /// ISFDB publication record number
    #[arg(long)]
    pub isfdb: Option<String>,

    /// Extra identifier as namespace:value (e.g., isbn:9780345470638)
    #[arg(long = "identifier", value_name = "NS:VALUE")]
    pub identifiers: Vec<String>,
}

/// Per-run overrides for the ISFDB options.
#[derive(Args, Clone)]
pub(crate) struct SourceArgs {
    /// Number of publication pages to download (1-5)
    #[arg(long)]
    pub max_downloads: Option<usize>,

    /// Append the table of contents to the comments
    #[arg(long)]
    pub append_contents: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// ISFDB base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Identify a book and print the matching ISFDB publications
    Identify {
        #[command(flatten)]
        book: BookArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download the best cover for a book
    Cover {
        #[command(flatten)]
        book: BookArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// File to write the image to
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show ISFDB source settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the config file path
    Path,
}
