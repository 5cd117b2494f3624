mod auth;
mod collector;
mod playlist;

pub use auth::TokenManager;
pub use collector::Collector;
pub use collector::CollectorOptions;
pub use collector::shuffle_and_truncate;
pub use playlist::PlaylistUpserter;
pub use playlist::UpsertOutcome;
