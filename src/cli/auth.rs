use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Settings, error, spotify, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = spotify::auth::auth(&settings, shared_state).await {
        error!("Authentication failed: {}", e);
    }
}
