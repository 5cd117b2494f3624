use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    config::Settings,
    error, info,
    management::Collector,
    management::CollectorOptions,
    scheduler::{DEFAULT_INTERVAL, Job, Scheduler},
    spotify::SpotifyClient,
    success, utils, warning,
};

async fn session() -> Arc<SpotifyClient> {
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("{}", e),
    };

    match SpotifyClient::connect(&settings).await {
        Ok(client) => Arc::new(client),
        Err(e) => error!("{}", e),
    }
}

/// Collects tracks and prints them without touching any playlist.
pub async fn preview(job: Job) {
    let collector = Collector::with_options(
        session().await,
        CollectorOptions {
            unique: job.unique,
            ..CollectorOptions::default()
        },
    );

    let pb = utils::spinner("Searching tracks...");
    let collected = collector.collect(&job.queries, job.target).await;
    pb.finish_and_clear();

    match collected {
        Ok(tracks) => {
            success!("Collected {} tracks", tracks.len());
            if job.show > 0 && !tracks.is_empty() {
                println!("{}", utils::track_table(&tracks, job.show));
            }
        }
        Err(e) => error!("Failed to collect tracks: {}", e),
    }
}

/// One collect + upsert run.
pub async fn update(job: Job) {
    let scheduler = Scheduler::new(session().await, job, DEFAULT_INTERVAL);
    if let Err(e) = scheduler.run_once().await {
        error!("An error occurred: {}", e);
    }
}

/// Repeats [`update`] every `interval` until Ctrl-C.
pub async fn daemon(job: Job, interval: Duration) {
    let scheduler = Scheduler::new(session().await, job, interval);
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warning!("Interrupted, stopping...");
                signal_cancel.cancel();
            }
            Err(e) => warning!("Cannot listen for Ctrl-C: {}", e),
        }
    });

    info!(
        "Updating '{}' every {}",
        scheduler.job().playlist_name,
        utils::format_interval(interval)
    );
    let runs = scheduler.run(cancel).await;
    success!("Stopped after {} runs.", runs);
}
