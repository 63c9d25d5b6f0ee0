//! Tests for the coordinator's per-episode pipeline and counters

use std::path::Path;
use std::time::{Duration, Instant};

use id3::{Tag, TagLike};
use reqwest::Client;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::app::feed::Enclosure;

fn episode(server: &MockServer, number: usize, length: &str) -> FeedItem {
    FeedItem {
        title: format!("Episode {number}. Topic {number}"),
        published: "Sat, 18 Jun 2016 10:00:00 +0300".to_string(),
        author: "Jane Doe".to_string(),
        enclosure: Some(Enclosure {
            url: format!("{}/media/{number}.mp3", server.uri()),
            length: length.to_string(),
        }),
    }
}

fn feed_with(server: &MockServer, items: Vec<FeedItem>, with_cover: bool) -> Feed {
    Feed {
        title: "Test Show".to_string(),
        cover_url: with_cover.then(|| format!("{}/cover.png", server.uri())),
        items,
    }
}

async fn mount_media(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/media/\d+\.mp3$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"plain audio bytes".to_vec()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cover.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
        .mount(server)
        .await;
}

async fn coordinator(batch_size: usize) -> (Coordinator, TempDir) {
    let temp = TempDir::new().unwrap();
    let directory = DownloadDirectory::ensure(temp.path()).await.unwrap();
    let config = CoordinatorConfig::default()
        .with_batch_size(batch_size)
        .with_progress(false);
    let coordinator = Coordinator::new(config, directory, Client::new()).unwrap();
    (coordinator, temp)
}

fn read_tag(path: &Path) -> Tag {
    Tag::read_from_path(path).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_processes_feed_and_cover() {
    let server = MockServer::start().await;
    mount_media(&server).await;

    let items = vec![
        episode(&server, 1, "100"),
        episode(&server, 2, "100"),
        episode(&server, 3, ""),
        episode(&server, 4, "100"),
    ];
    let feed = feed_with(&server, items, true);
    let (coordinator, temp) = coordinator(2).await;

    let report = coordinator.process(&feed).await;

    // Three episodes plus the cover
    assert_eq!(report.processed, 4);
    assert_eq!(report.failed, 0);
    assert_eq!(report.downloaded, 4);
    assert!(report.downloaded <= report.processed);

    assert!(temp.path().join("cover.png").exists());
    assert!(!temp.path().join("3 - Topic 3.mp3").exists());

    let tag = read_tag(&temp.path().join("1 - Topic 1.mp3"));
    assert_eq!(tag.title(), Some("[1] Topic 1"));
    assert_eq!(tag.artist(), Some("Jane Doe"));
    assert_eq!(tag.album(), Some("GolangShow"));
    assert_eq!(tag.genre(), Some("Technology"));
    assert_eq!(tag.year(), Some(2016));

    let summary = coordinator.last_summary().unwrap();
    assert_eq!(summary.dispatched, 3);
    assert_eq!(summary.batches, 2);
}

#[tokio::test]
async fn test_counts_without_cover_match_dispatched_items() {
    let server = MockServer::start().await;
    mount_media(&server).await;

    let mut items: Vec<FeedItem> = (1..=7).map(|n| episode(&server, n, "10")).collect();
    items[2].enclosure.as_mut().unwrap().length.clear();
    items[5].enclosure = None;
    let feed = feed_with(&server, items, false);
    let (coordinator, temp) = coordinator(3).await;

    let report = coordinator.process(&feed).await;

    assert_eq!(report.total_finished(), 7 - 2);
    assert_eq!(report.downloaded, 5);
    assert!(!temp.path().join("cover.png").exists());
}

#[tokio::test]
async fn test_download_failure_is_counted_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/2.mp3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_media(&server).await;

    let items = (1..=3).map(|n| episode(&server, n, "10")).collect();
    let feed = feed_with(&server, items, false);
    let (coordinator, _temp) = coordinator(4).await;

    let report = coordinator.process(&feed).await;

    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.downloaded, 2);
}

#[tokio::test]
async fn test_existing_file_is_retagged_without_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/1.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let feed = feed_with(&server, vec![episode(&server, 1, "10")], false);
    let (coordinator, temp) = coordinator(1).await;
    let existing = temp.path().join("1 - Topic 1.mp3");
    std::fs::write(&existing, b"already here").unwrap();

    let report = coordinator.process(&feed).await;

    assert_eq!(report.processed, 1);
    assert_eq!(report.downloaded, 0);
    assert_eq!(read_tag(&existing).title(), Some("[1] Topic 1"));
}

#[tokio::test]
async fn test_tag_failure_is_counted() {
    let server = MockServer::start().await;
    mount_media(&server).await;

    let feed = feed_with(&server, vec![episode(&server, 1, "10")], false);
    let (coordinator, temp) = coordinator(1).await;
    // A directory at the episode path passes the presence check but cannot be tagged
    std::fs::create_dir(temp.path().join("1 - Topic 1.mp3")).unwrap();

    let report = coordinator.process(&feed).await;

    assert_eq!(report.processed, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.downloaded, 0);
}

#[tokio::test]
async fn test_cover_failure_still_counts_as_processed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let feed = feed_with(&server, Vec::new(), true);
    let (coordinator, _temp) = coordinator(4).await;

    let report = coordinator.process(&feed).await;

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.downloaded, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_full_parallelism_loses_no_updates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/media/\d*[05]\.mp3$"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_media(&server).await;

    let count = 60;
    let items = (1..=count).map(|n| episode(&server, n, "10")).collect();
    let feed = feed_with(&server, items, false);
    let (coordinator, _temp) = coordinator(count).await;

    let report = coordinator.process(&feed).await;

    assert_eq!(report.total_finished(), count);
    assert_eq!(report.failed, count / 5);
    assert_eq!(report.downloaded, report.processed);
    assert_eq!(coordinator.last_summary().unwrap().batches, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cover_runs_alongside_batches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"png".to_vec())
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/media/\d+\.mp3$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"plain audio bytes".to_vec())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let items = (1..=2).map(|n| episode(&server, n, "10")).collect();
    let feed = feed_with(&server, items, true);
    let (coordinator, _temp) = coordinator(1).await;

    let start = Instant::now();
    let report = coordinator.process(&feed).await;
    let took = start.elapsed();

    // Two one-item batches of 300ms overlap the 600ms cover; run in
    // sequence they would take at least 1200ms
    assert!(took < Duration::from_millis(1100), "took {:?}", took);
    assert_eq!(report.downloaded, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(coordinator.last_summary().unwrap().batches, 2);
    assert_eq!(coordinator.last_summary().unwrap().dispatched, 2);
}

#[tokio::test]
async fn test_prepare_carries_enclosure_url() {
    let server = MockServer::start().await;
    let (coordinator, temp) = coordinator(1).await;

    let job = coordinator
        .worker
        .prepare(episode(&server, 7, "10"))
        .unwrap();
    assert_eq!(job.media_url, format!("{}/media/7.mp3", server.uri()));
    assert_eq!(job.destination, temp.path().join("7 - Topic 7.mp3"));

    let mut without_enclosure = episode(&server, 8, "10");
    without_enclosure.enclosure = None;
    assert!(coordinator.worker.prepare(without_enclosure).is_none());

    assert!(coordinator.worker.prepare(episode(&server, 9, "")).is_none());
}

#[test]
fn test_progress_lines() {
    let title = ParsedTitle {
        prefix: "12".to_string(),
        title: "Something Great".to_string(),
    };

    assert_eq!(
        EpisodeOutcome::Downloaded.progress_line(&title).as_deref(),
        Some("* [12] Something Great [dl+id3]")
    );
    assert_eq!(
        EpisodeOutcome::AlreadyPresent.progress_line(&title).as_deref(),
        Some("* [12] Something Great [id3]")
    );
    assert_eq!(
        EpisodeOutcome::TagFailed(TagError::TaskFailed {
            reason: "cancelled".to_string()
        })
        .progress_line(&title),
        None
    );
    assert_eq!(PROGRESS_HEADER, "Progress:");
    assert_eq!(COVER_PROGRESS_LINE, "* cover file");
}

#[test]
fn test_outcome_steps() {
    assert_eq!(EpisodeOutcome::Downloaded.steps(), "dl+id3");
    assert_eq!(EpisodeOutcome::AlreadyPresent.steps(), "id3");
    assert!(EpisodeOutcome::AlreadyPresent.is_success());
    assert!(!EpisodeOutcome::TagFailed(TagError::TaskFailed {
        reason: "cancelled".to_string()
    })
    .is_success());
}

#[tokio::test]
async fn test_invalid_batch_size_rejected() {
    let temp = TempDir::new().unwrap();
    let directory = DownloadDirectory::ensure(temp.path()).await.unwrap();
    let config = CoordinatorConfig::default().with_batch_size(0);
    assert!(Coordinator::new(config, directory, Client::new()).is_err());
}
