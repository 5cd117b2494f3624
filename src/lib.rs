//! Genre playlist refresher for Spotify.
//!
//! This library searches the Spotify catalog for a set of genre queries,
//! shuffles the hits and keeps a named playlist filled with them, either once
//! or on a daily schedule.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Settings from environment variables and `.env`
//! - `error` - The crate-wide error type
//! - `management` - Token cache, track collector and playlist upserter
//! - `scheduler` - One-shot and interval runs of collect + upsert
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Catalog service trait and Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use genrelist::{config, scheduler::{Job, Scheduler, DEFAULT_INTERVAL}, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> genrelist::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let session = Arc::new(SpotifyClient::connect(&settings).await?);
//!     Scheduler::new(session, Job::default(), DEFAULT_INTERVAL).run_once().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod scheduler;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub use colored;

/// Result alias used throughout the crate.
///
/// # Example
///
/// ```
/// use genrelist::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, error::Error>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`.
///
/// ```
/// info!("Fetching {} tracks...", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use $crate::colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// ```
/// success!("Playlist '{}' updated", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use $crate::colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with code 1.
///
/// Only for fatal errors at the command boundary; library code returns
/// [`error::Error`] instead.
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use $crate::colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// ```
/// warning!("Catalog supplied only {} tracks", count);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use $crate::colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
