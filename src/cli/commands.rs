//! CLI commands and argument parsing

use crate::model::MovieId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse popular movies, search and movie details from the terminal
#[derive(Parser, Debug)]
#[command(name = "cinenook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List popular movies
    Popular {
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },

    /// Search movies by title
    Search {
        /// Free-text query
        query: String,

        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },

    /// Show the full record of one movie
    Detail {
        /// Movie id
        id: MovieId,
    },

    /// List recommendations for one movie
    Recommendations {
        /// Movie id
        id: MovieId,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
