//! # CLI Module
//!
//! User-facing commands of genrelist. Each command loads the settings,
//! builds the Spotify session and hands over to the scheduler or the
//! collector, printing progress on the way. Fatal errors end the process
//! through the `error!` macro.
//!
//! - [`auth`] - authorize against Spotify and cache the token
//! - [`preview`] - collect tracks and print them, no playlist writes
//! - [`update`] - collect tracks and upsert the playlist once
//! - [`daemon`] - run [`update`] on a fixed interval until Ctrl-C
//!
//! ```bash
//! genrelist auth
//! genrelist preview --query genre:edm --target 30
//! genrelist update --target 30 --name "Hottest 30 EDM Songs"
//! genrelist daemon --interval-hours 24
//! ```

mod auth;
mod update;

pub use auth::auth;
pub use update::daemon;
pub use update::preview;
pub use update::update;
