//! Podcast feed retrieval and parsing
//!
//! The feed is fetched once per run and parsed as RSS 2.0. Only the fields
//! the download pipeline needs are kept: the cover image and, per entry,
//! title, publish date, author and the first enclosure.

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::errors::{FeedError, FeedResult};

/// Downloadable media attached to a feed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    /// Declared length, kept verbatim; an empty value marks the entry as not downloadable
    pub length: String,
}

/// A single feed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Raw entry title
    pub title: String,
    /// Publish timestamp as it appears in the feed (RFC 1123Z)
    pub published: String,
    /// Author display name
    pub author: String,
    pub enclosure: Option<Enclosure>,
}

impl FeedItem {
    /// Whether the entry carries an enclosure with a non-empty length
    pub fn is_downloadable(&self) -> bool {
        self.enclosure
            .as_ref()
            .is_some_and(|enclosure| !enclosure.length.is_empty())
    }
}

/// Parsed feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    /// Cover art URL, if the feed declares one
    pub cover_url: Option<String>,
    /// Entries in feed order
    pub items: Vec<FeedItem>,
}

impl Feed {
    /// Parse an RSS document
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Parse` if the content is not valid RSS
    pub fn parse(content: &[u8]) -> FeedResult<Self> {
        let channel = rss::Channel::read_from(content).map_err(|e| FeedError::Parse {
            reason: e.to_string(),
        })?;

        let channel_author = channel
            .itunes_ext()
            .and_then(|ext| ext.author())
            .or_else(|| channel.managing_editor())
            .map(display_name)
            .unwrap_or_default();

        let cover_url = channel
            .image()
            .map(|image| image.url().to_string())
            .or_else(|| {
                channel
                    .itunes_ext()
                    .and_then(|ext| ext.image())
                    .map(str::to_string)
            })
            .filter(|url| !url.trim().is_empty());

        let items = channel
            .items()
            .iter()
            .map(|item| {
                let author = item
                    .itunes_ext()
                    .and_then(|ext| ext.author())
                    .or_else(|| item.author())
                    .or_else(|| {
                        item.dublin_core_ext()
                            .and_then(|dc| dc.creators().first())
                            .map(String::as_str)
                    })
                    .map(display_name)
                    .unwrap_or_else(|| channel_author.clone());

                FeedItem {
                    title: item.title().unwrap_or("").trim().to_string(),
                    published: item.pub_date().unwrap_or("").to_string(),
                    author,
                    enclosure: item.enclosure().map(|enclosure| Enclosure {
                        url: enclosure.url().to_string(),
                        length: enclosure.length().trim().to_string(),
                    }),
                }
            })
            .collect();

        Ok(Self {
            title: channel.title().to_string(),
            cover_url,
            items,
        })
    }
}

/// Extract the display name from `email (Name)` or `Name <email>` forms
fn display_name(raw: &str) -> String {
    let raw = raw.trim();

    if let (Some(open), true) = (raw.find('('), raw.ends_with(')')) {
        let name = raw[open + 1..raw.len() - 1].trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    if let (Some(open), true) = (raw.find('<'), raw.ends_with('>')) {
        let name = raw[..open].trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    raw.to_string()
}

/// Fetches and parses the feed from a fixed URL
#[derive(Debug, Clone)]
pub struct FeedSource {
    client: Client,
    url: Url,
}

impl FeedSource {
    /// Create a feed source for the given URL
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidUrl` if the URL does not parse
    pub fn new(client: Client, url: &str) -> FeedResult<Self> {
        let url = Url::parse(url).map_err(|e| FeedError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Download and parse the feed
    ///
    /// # Errors
    ///
    /// Returns `FeedError` if the request fails, the server answers with a
    /// non-success status, or the body is not valid RSS
    pub async fn fetch(&self) -> FeedResult<Feed> {
        debug!("Fetching feed: {}", self.url);
        let response = self.client.get(self.url.as_str()).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        let feed = Feed::parse(&body)?;
        info!(
            "Parsed feed '{}' with {} entries from {}",
            feed.title,
            feed.items.len(),
            self.url
        );
        Ok(feed)
    }
}
