//! Download orchestration for a parsed feed
//!
//! The coordinator runs one feed through the pipeline:
//!
//! 1. The cover image is downloaded by its own task, started first and not
//!    counted against the batch size.
//! 2. Entries whose enclosure has a non-empty length are handed to the
//!    [`BatchScheduler`]. Each task parses the title, downloads the episode
//!    unless the file is already present, and rewrites its ID3 tag.
//! 3. Processing is complete once the cover task and every batch finished.
//!
//! Per-item failures never leave their task: they are logged, counted and
//! the task returns.
//!
//! # Examples
//!
//! ```rust,no_run
//! use podcast_fetcher::app::{ClientConfig, Coordinator, CoordinatorConfig, DownloadDirectory, FeedSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientConfig::default().build_http_client()?;
//! let feed = FeedSource::new(client.clone(), "https://golangshow.com/index.xml")?
//!     .fetch()
//!     .await?;
//! let directory = DownloadDirectory::ensure("/tmp/GolangShow").await?;
//!
//! let coordinator = Coordinator::new(CoordinatorConfig::default(), directory, client)?;
//! let report = coordinator.process(&feed).await;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod stats;

#[cfg(test)]
pub mod tests;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::app::client::MediaFetcher;
use crate::app::feed::{Feed, FeedItem};
use crate::app::scheduler::{BatchScheduler, BatchSummary};
use crate::app::storage::DownloadDirectory;
use crate::app::tagger::{EpisodeTags, TagWriter};
use crate::app::title::{ParsedTitle, TitleParser};
use crate::errors::{AppError, DownloadError, Result, TagError};

pub use config::CoordinatorConfig;
pub use stats::{RunReport, RunStatistics};

/// Header printed before the per-item progress lines
pub const PROGRESS_HEADER: &str = "Progress:";

/// Progress line printed once the cover task finished
pub const COVER_PROGRESS_LINE: &str = "* cover file";

/// An episode ready for download, built inside its task
#[derive(Debug, Clone)]
pub struct EpisodeJob {
    pub item: FeedItem,
    pub title: ParsedTitle,
    /// Enclosure URL the episode is downloaded from
    pub media_url: String,
    pub destination: PathBuf,
}

/// Terminal state of one episode task
#[derive(Debug)]
pub enum EpisodeOutcome {
    /// File was already on disk; it was re-tagged without downloading
    AlreadyPresent,
    /// File was downloaded and tagged
    Downloaded,
    DownloadFailed(DownloadError),
    TagFailed(TagError),
}

impl EpisodeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadyPresent | Self::Downloaded)
    }

    /// Steps performed, as shown in progress lines
    pub fn steps(&self) -> &'static str {
        match self {
            Self::AlreadyPresent => "id3",
            Self::Downloaded => "dl+id3",
            Self::DownloadFailed(_) => "dl",
            Self::TagFailed(_) => "id3",
        }
    }

    /// Stdout line for a finished episode, e.g. `* [12] Title [dl+id3]`
    ///
    /// Failures have no progress line; they are logged instead.
    pub fn progress_line(&self, title: &ParsedTitle) -> Option<String> {
        self.is_success()
            .then(|| format!("* {} [{}]", title.display(), self.steps()))
    }
}

/// State shared by every task of a run
#[derive(Debug)]
struct EpisodeWorker {
    fetcher: MediaFetcher,
    tagger: TagWriter,
    titles: TitleParser,
    directory: DownloadDirectory,
    stats: Arc<RunStatistics>,
    album: String,
    genre: String,
    show_progress: bool,
}

impl EpisodeWorker {
    /// Build the job for an entry, or `None` when it has no downloadable enclosure
    fn prepare(&self, item: FeedItem) -> Option<EpisodeJob> {
        if !item.is_downloadable() {
            debug!("Skipping '{}': no downloadable enclosure", item.title);
            return None;
        }
        let media_url = item.enclosure.as_ref()?.url.clone();
        let title = self.titles.parse(&item.title, &item.author);
        let destination = self.directory.episode_path(&title.file_name());
        Some(EpisodeJob {
            item,
            title,
            media_url,
            destination,
        })
    }

    async fn run(&self, job: &EpisodeJob) -> EpisodeOutcome {
        let present = matches!(tokio::fs::try_exists(&job.destination).await, Ok(true));

        let outcome = if present {
            debug!("Already present: {}", job.destination.display());
            EpisodeOutcome::AlreadyPresent
        } else {
            if let Err(e) = self.fetcher.fetch(&job.media_url, &job.destination).await {
                return EpisodeOutcome::DownloadFailed(e);
            }
            EpisodeOutcome::Downloaded
        };

        let tags = EpisodeTags {
            title: job.title.display(),
            artist: job.item.author.clone(),
            album: self.album.clone(),
            genre: self.genre.clone(),
            year: EpisodeTags::year_from_published(&job.item.published),
        };
        match self
            .tagger
            .write_async(job.destination.clone(), tags)
            .await
        {
            Ok(()) => outcome,
            Err(e) => EpisodeOutcome::TagFailed(e),
        }
    }

    fn record(&self, job: &EpisodeJob, outcome: &EpisodeOutcome) {
        match outcome {
            EpisodeOutcome::AlreadyPresent | EpisodeOutcome::Downloaded => {
                self.stats.record_processed();
                if self.show_progress {
                    if let Some(line) = outcome.progress_line(&job.title) {
                        println!("{}", line);
                    }
                }
            }
            EpisodeOutcome::DownloadFailed(e) => {
                warn!("Failed to download '{}': {}", job.item.title, e);
                self.stats.record_failure();
            }
            EpisodeOutcome::TagFailed(e) => {
                warn!("Failed to tag '{}': {}", job.item.title, e);
                self.stats.record_failure();
            }
        }
    }

    async fn handle(&self, item: FeedItem) {
        let Some(job) = self.prepare(item) else {
            return;
        };
        let outcome = self.run(&job).await;
        self.record(&job, &outcome);
    }

    async fn download_cover(&self, url: &str) {
        let path = self.directory.cover_path();
        if let Err(e) = self.fetcher.fetch(url, &path).await {
            warn!("Failed to download cover: {}", e);
        }
        if self.show_progress {
            println!("{}", COVER_PROGRESS_LINE);
        }
        // Counted as processed whatever the transfer result
        self.stats.record_processed();
    }
}

/// Runs a feed through the download pipeline
pub struct Coordinator {
    scheduler: BatchScheduler,
    worker: Arc<EpisodeWorker>,
    last_summary: std::sync::Mutex<Option<BatchSummary>>,
}

impl Coordinator {
    /// Create a coordinator writing into `directory`
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the configuration is invalid
    pub fn new(config: CoordinatorConfig, directory: DownloadDirectory, client: Client) -> Result<Self> {
        config.validate().map_err(AppError::generic)?;
        let scheduler = BatchScheduler::new(config.batch_size)?;
        let stats = Arc::new(RunStatistics::new());

        let worker = EpisodeWorker {
            fetcher: MediaFetcher::new(client, stats.clone()),
            tagger: TagWriter::new(),
            titles: TitleParser::new(),
            directory,
            stats,
            album: config.album,
            genre: config.genre,
            show_progress: config.show_progress,
        };

        Ok(Self {
            scheduler,
            worker: Arc::new(worker),
            last_summary: std::sync::Mutex::new(None),
        })
    }

    /// Shared run statistics
    pub fn stats(&self) -> Arc<RunStatistics> {
        self.worker.stats.clone()
    }

    /// Scheduler summary of the most recent [`Coordinator::process`] call
    pub fn last_summary(&self) -> Option<BatchSummary> {
        self.last_summary.lock().ok().and_then(|summary| *summary)
    }

    /// Download, tag and count every entry of `feed`
    ///
    /// Never fails: per-item errors end up in the report's failure count.
    pub async fn process(&self, feed: &Feed) -> RunReport {
        let start = Instant::now();
        if self.worker.show_progress {
            println!("{}", PROGRESS_HEADER);
        }

        let cover = self.spawn_cover(feed);

        let (items, skipped): (Vec<FeedItem>, Vec<FeedItem>) = feed
            .items
            .iter()
            .cloned()
            .partition(FeedItem::is_downloadable);
        for item in &skipped {
            debug!("Skipping '{}': no downloadable enclosure", item.title);
        }
        info!(
            "Processing {} episodes in batches of {} ({} skipped)",
            items.len(),
            self.scheduler.batch_size(),
            skipped.len()
        );

        let worker = self.worker.clone();
        let summary = self
            .scheduler
            .run(items, move |item| {
                let worker = worker.clone();
                async move { worker.handle(item).await }
            })
            .await;

        if let Some(cover) = cover {
            if let Err(e) = cover.await {
                error!("Cover task terminated abnormally: {}", e);
            }
        }

        if let Ok(mut last) = self.last_summary.lock() {
            *last = Some(summary);
        }

        self.worker.stats.set_elapsed(start.elapsed());
        let report = self.worker.stats.report();
        info!(
            "Finished {} batches: {} processed, {} failed",
            summary.batches, report.processed, report.failed
        );
        report
    }

    fn spawn_cover(&self, feed: &Feed) -> Option<JoinHandle<()>> {
        let Some(url) = feed.cover_url.clone() else {
            debug!("Feed declares no cover image");
            return None;
        };
        let worker = self.worker.clone();
        Some(tokio::spawn(async move { worker.download_cover(&url).await }))
    }
}
