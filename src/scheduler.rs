//! Runs the collect-then-upsert pipeline once or on a fixed interval.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    Res, info,
    management::{Collector, CollectorOptions, PlaylistUpserter, UpsertOutcome},
    spotify::CatalogService,
    success,
    types::Track,
    utils, warning,
};

pub const DEFAULT_QUERIES: [&str; 4] = [
    "genre:edm",
    "genre:electronic",
    "genre:house",
    "genre:techno",
];
pub const DEFAULT_TARGET: usize = 10_000;
pub const DEFAULT_PLAYLIST_NAME: &str = "Random 10,000 EDM Songs";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// What a single run collects and where it writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub queries: Vec<String>,
    pub target: usize,
    pub playlist_name: String,
    /// How many of the collected tracks to print.
    pub show: usize,
    pub unique: bool,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
            target: DEFAULT_TARGET,
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            show: 10,
            unique: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub tracks: Vec<Track>,
    pub outcome: UpsertOutcome,
}

/// Owns the catalog session and drives [`Collector`] and [`PlaylistUpserter`].
pub struct Scheduler<C> {
    catalog: Arc<C>,
    collector: Collector<C>,
    upserter: PlaylistUpserter<C>,
    job: Job,
    interval: Duration,
}

impl<C: CatalogService> Scheduler<C> {
    pub fn new(catalog: Arc<C>, job: Job, interval: Duration) -> Self {
        let options = CollectorOptions {
            unique: job.unique,
            ..CollectorOptions::default()
        };

        Self {
            collector: Collector::with_options(Arc::clone(&catalog), options),
            upserter: PlaylistUpserter::new(Arc::clone(&catalog)),
            catalog,
            job,
            interval,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Collects tracks for the job and writes them to its playlist.
    pub async fn run_once(&self) -> Res<RunReport> {
        let user = self.catalog.current_user().await?;

        info!(
            "Fetching {} tracks from {} queries ({} per query)...",
            self.job.target,
            self.job.queries.len(),
            self.collector
                .per_query_budget(self.job.queries.len(), self.job.target)
        );
        let pb = utils::spinner("Searching tracks...");
        let collected = self.collector.collect(&self.job.queries, self.job.target).await;
        pb.finish_and_clear();
        let tracks = collected?;

        if tracks.len() < self.job.target {
            warning!(
                "Catalog supplied only {} of {} requested tracks",
                tracks.len(),
                self.job.target
            );
        }

        if self.job.show > 0 && !tracks.is_empty() {
            info!("First {} of {} tracks:", self.job.show.min(tracks.len()), tracks.len());
            for track in tracks.iter().take(self.job.show) {
                println!("{}", track);
            }
        }

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        let pb = utils::spinner(format!("Writing playlist '{}'...", self.job.playlist_name));
        let upserted = self
            .upserter
            .upsert(&user.id, &self.job.playlist_name, &uris)
            .await;
        pb.finish_and_clear();
        let outcome = upserted?;

        if outcome.created {
            info!("Playlist '{}' created.", self.job.playlist_name);
        } else {
            info!("Playlist '{}' cleared.", self.job.playlist_name);
        }
        success!(
            "Playlist '{}' updated with {} tracks in {} batches.",
            self.job.playlist_name,
            outcome.tracks,
            outcome.batches
        );

        Ok(RunReport { tracks, outcome })
    }

    /// Repeats [`Scheduler::run_once`] every interval until `cancel` fires.
    ///
    /// A failed run is reported and left to the next interval. Cancelling
    /// aborts an in-flight run as well as the sleep between runs; an aborted
    /// run may leave the playlist partially written.
    ///
    /// # Returns
    ///
    /// The number of runs started, including an aborted one.
    pub async fn run(&self, cancel: CancellationToken) -> usize {
        let mut runs = 0;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            runs += 1;
            tokio::select! {
                _ = cancel.cancelled() => {
                    warning!("Update interrupted.");
                    break;
                }
                result = self.run_once() => {
                    if let Err(e) = result {
                        warning!("Update failed: {}. Retrying at the next interval.", e);
                    }
                }
            }

            info!(
                "Waiting {} before the next update...",
                utils::format_interval(self.interval)
            );
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        runs
    }
}
