//! RSS feed source: one fetch cycle pulls the feed and parses every item.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mihari_core::parser::EpisodeParser;
use mihari_core::types::{Episode, SourceRef};
use quick_xml::Reader;
use quick_xml::events::Event;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::SourceConfig;
use crate::sources::{Source, SourceContext, SourceError, source_ref_from};

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client suitable for feed polling. Identifies the service and
/// bounds every request.
pub fn feed_client() -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("mihari/", env!("CARGO_PKG_VERSION")))
        .timeout(FEED_TIMEOUT)
        .build()?)
}

/// Title and link of one feed `<item>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
}

impl ItemBuilder {
    fn assign(&mut self, tag: &str, value: String) {
        match tag {
            "title" => self.title = Some(value),
            "link" => self.link = Some(value),
            _ => {}
        }
    }

    fn finish(self) -> Option<FeedItem> {
        match (self.title, self.link) {
            (Some(title), Some(link)) => Some(FeedItem { title, link }),
            _ => None,
        }
    }
}

/// Extracts `<item>` titles and links from feed XML.
///
/// Tolerates CDATA in either field. Items missing a title or link are
/// skipped. A malformed document yields the items parsed up to the error.
pub fn parse_feed(content: &str) -> Vec<FeedItem> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current_item: Option<ItemBuilder> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                current_tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if current_tag == "item" {
                    current_item = Some(ItemBuilder::default());
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(builder) = current_item.take() {
                        match builder.finish() {
                            Some(item) => items.push(item),
                            None => debug!("skipping feed item missing title or link"),
                        }
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut builder) = current_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    builder.assign(&current_tag, text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(ref mut builder) = current_item {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    builder.assign(&current_tag, text);
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => {
                debug!(%error, "stopping feed parse on malformed XML");
                break;
            }
            _ => {}
        }
    }

    items
}

/// Source that polls an RSS feed of release names.
pub struct RssSource {
    url: String,
    source_ref: SourceRef,
    parser: Arc<EpisodeParser>,
    http: reqwest::Client,
    episodes: mpsc::Sender<Episode>,
}

impl RssSource {
    pub(crate) fn build(
        ctx: &SourceContext,
        config: &SourceConfig,
    ) -> Result<Arc<dyn Source>, SourceError> {
        let url = config.url.clone().ok_or_else(|| SourceError::MissingField {
            group: config.group.key.clone(),
            field: "url",
        })?;
        Ok(Arc::new(Self {
            url,
            source_ref: source_ref_from(config, Arc::clone(&ctx.shows)),
            parser: Arc::clone(&ctx.parser),
            http: ctx.http.clone(),
            episodes: ctx.episodes.clone(),
        }))
    }

    async fn ingest(&self, items: Vec<FeedItem>) -> Result<(), SourceError> {
        for FeedItem { title, link } in items {
            let options = self.source_ref.fetch_kind.options_for(link);
            if let Some(episode) =
                self.parser
                    .parse_wanted_episode(&title, options, &self.source_ref)?
            {
                self.episodes
                    .send(episode)
                    .await
                    .map_err(|_| SourceError::SinkClosed)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Source for RssSource {
    fn source_type(&self) -> &str {
        "rss"
    }

    fn group_key(&self) -> &str {
        &self.source_ref.group.key
    }

    async fn fetch(&self) -> Result<(), SourceError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::FeedStatus(status));
        }
        let body = response.text().await?;
        let items = parse_feed(&body);
        debug!(url = %self.url, items = items.len(), "fetched feed");
        self.ingest(items).await
    }

    async fn close(&self) -> Result<(), SourceError> {
        Ok(())
    }
}
