//! CLI module
//!
//! Command-line front-end over the view models.
//!
//! # Commands
//!
//! - `popular` - List popular movies, page by page
//! - `search` - Search movies by title
//! - `detail` - Show one movie
//! - `recommendations` - List recommendations for one movie

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
