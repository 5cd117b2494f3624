mod common;

use std::{sync::Arc, time::Duration};

use common::{Call, FakeCatalog};
use genrelist::scheduler::{Job, Scheduler};
use tokio_util::sync::CancellationToken;

fn job(queries: &[&str], target: usize, name: &str) -> Job {
    Job {
        queries: queries.iter().map(|q| q.to_string()).collect(),
        target,
        playlist_name: name.to_string(),
        show: 0,
        unique: false,
    }
}

#[test]
fn test_default_job() {
    let job = Job::default();
    assert_eq!(
        job.queries,
        vec!["genre:edm", "genre:electronic", "genre:house", "genre:techno"]
    );
    assert_eq!(job.target, 10_000);
    assert_eq!(job.playlist_name, "Random 10,000 EDM Songs");
    assert!(!job.unique);
}

#[tokio::test]
async fn test_run_once_end_to_end() {
    let catalog = Arc::new(FakeCatalog::new("me").with_query("genre:edm", 5));
    let scheduler = Scheduler::new(
        Arc::clone(&catalog),
        job(&["genre:edm"], 5, "Hottest EDM"),
        Duration::from_secs(60),
    );

    let report = scheduler.run_once().await.unwrap();

    assert_eq!(report.tracks.len(), 5);
    assert!(report.outcome.created);
    let playlist = catalog.playlist(&report.outcome.playlist_id).unwrap();
    assert_eq!(playlist.owner_id, "me");
    // the playlist receives exactly the shuffled order of the report
    let expected: Vec<String> = report.tracks.iter().map(|t| t.uri.clone()).collect();
    assert_eq!(playlist.items, expected);
    let mut sorted = playlist.items.clone();
    sorted.sort();
    let fetched: Vec<String> = (0..5).map(|n| format!("spotify:track:genre:edm-{n}")).collect();
    assert_eq!(sorted, fetched);
}

#[tokio::test]
async fn test_run_once_reports_search_failure_without_writing() {
    let catalog = Arc::new(FakeCatalog::new("me").with_query("q", 5).fail_search());
    let scheduler = Scheduler::new(Arc::clone(&catalog), job(&["q"], 5, "Mix"), Duration::from_secs(60));

    assert!(scheduler.run_once().await.is_err());
    assert!(catalog.playlists().is_empty());
    assert!(
        !catalog
            .calls()
            .iter()
            .any(|c| matches!(c, Call::ListPlaylists { .. }))
    );
}

#[tokio::test]
async fn test_cancelled_before_start_never_runs() {
    let catalog = Arc::new(FakeCatalog::new("me").with_query("q", 5));
    let scheduler = Scheduler::new(Arc::clone(&catalog), job(&["q"], 5, "Mix"), Duration::from_secs(3600));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let runs = scheduler.run(cancel).await;

    assert_eq!(runs, 0);
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_cancel_interrupts_sleep() {
    let catalog = Arc::new(FakeCatalog::new("me").with_query("q", 5));
    let scheduler = Scheduler::new(Arc::clone(&catalog), job(&["q"], 5, "Mix"), Duration::from_secs(3600));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let runs = tokio::time::timeout(Duration::from_secs(10), scheduler.run(cancel))
        .await
        .expect("sleep was not interrupted");

    assert_eq!(runs, 1);
    assert_eq!(catalog.playlists().len(), 1);
}

#[tokio::test]
async fn test_cancel_interrupts_running_update() {
    let catalog = Arc::new(
        FakeCatalog::new("me")
            .with_query("q", 5)
            .with_search_delay(Duration::from_secs(3600)),
    );
    let scheduler = Scheduler::new(Arc::clone(&catalog), job(&["q"], 5, "Mix"), Duration::from_secs(3600));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let runs = tokio::time::timeout(Duration::from_secs(10), scheduler.run(cancel))
        .await
        .expect("running update was not interrupted");

    assert_eq!(runs, 1);
    assert_eq!(catalog.search_calls().len(), 1);
    assert!(catalog.playlists().is_empty());
}

#[tokio::test]
async fn test_failed_run_is_retried_next_interval() {
    let catalog = Arc::new(FakeCatalog::new("me").with_query("q", 5).fail_search());
    let scheduler = Scheduler::new(Arc::clone(&catalog), job(&["q"], 5, "Mix"), Duration::from_millis(10));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let runs = scheduler.run(cancel).await;

    assert!(runs >= 2, "only {runs} runs");
    assert!(catalog.playlists().is_empty());
    let user_lookups = catalog
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::CurrentUser))
        .count();
    assert_eq!(user_lookups, runs);
}

#[tokio::test]
async fn test_repeated_runs_reuse_playlist() {
    let catalog = Arc::new(FakeCatalog::new("me").with_query("q", 30));
    let scheduler = Scheduler::new(Arc::clone(&catalog), job(&["q"], 20, "Mix"), Duration::from_secs(60));

    let first = scheduler.run_once().await.unwrap();
    let second = scheduler.run_once().await.unwrap();

    assert!(first.outcome.created);
    assert!(!second.outcome.created);
    assert_eq!(first.outcome.playlist_id, second.outcome.playlist_id);
    assert_eq!(catalog.playlists().len(), 1);
    assert_eq!(catalog.playlists()[0].items.len(), 20);
}
