//! Release sources: where announce lines and feed items come from.

pub mod irc;
pub mod rss;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mihari_core::MihariError;
use mihari_core::parser::EpisodeParser;
use mihari_core::types::{Episode, GroupRef, ShowLookup, SourceRef};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::SourceConfig;
use crate::irc::{ConnectionManager, ManagerError};

pub use irc::IrcSource;
pub use rss::{FeedItem, RssSource, feed_client, parse_feed};

/// Errors raised while building or running a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No builder is registered for the config's type tag.
    #[error("source type {0} does not exist")]
    UnknownType(String),

    /// The config omits a field this source type requires.
    #[error("source for group {group} is missing required field `{field}`")]
    MissingField { group: String, field: &'static str },

    /// The announce pattern does not compile.
    #[error("invalid announce pattern: {0}")]
    Announce(#[from] regex::Error),

    /// The announce pattern compiles but lacks the required captures.
    #[error("announce pattern must define named captures `file` and `link`")]
    AnnounceCaptures,

    /// The feed request itself failed.
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("feed returned status {0}")]
    FeedStatus(reqwest::StatusCode),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error(transparent)]
    Parse(#[from] MihariError),

    /// The episode receiver went away.
    #[error("episode sink closed")]
    SinkClosed,
}

/// One ingestion endpoint for a release group.
///
/// `fetch` performs a single cycle; whatever schedules the cycles lives
/// outside this crate.
#[async_trait]
pub trait Source: Send + Sync {
    /// Type tag this source was built from.
    fn source_type(&self) -> &str;

    /// Key of the group this source announces for.
    fn group_key(&self) -> &str;

    /// Runs one ingestion cycle, sending matched episodes to the sink.
    async fn fetch(&self) -> Result<(), SourceError>;

    /// Releases anything the source holds.
    async fn close(&self) -> Result<(), SourceError>;
}

/// Shared collaborators handed to every source builder.
#[derive(Clone)]
pub struct SourceContext {
    pub parser: Arc<EpisodeParser>,
    pub shows: Arc<dyn ShowLookup>,
    pub manager: Arc<ConnectionManager>,
    pub http: reqwest::Client,
    pub episodes: mpsc::Sender<Episode>,
}

impl SourceContext {
    /// Assembles the collaborators handed to source builders. The HTTP
    /// client comes from [`feed_client`], so every fetch carries the
    /// service user agent and request timeout.
    pub fn new(
        parser: Arc<EpisodeParser>,
        shows: Arc<dyn ShowLookup>,
        manager: Arc<ConnectionManager>,
        episodes: mpsc::Sender<Episode>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            parser,
            shows,
            manager,
            http: rss::feed_client()?,
            episodes,
        })
    }
}

/// Builds a source from its config entry.
pub type SourceBuilder = Box<
    dyn Fn(&SourceContext, &SourceConfig) -> Result<Arc<dyn Source>, SourceError> + Send + Sync,
>;

/// Holds the known source builders and every source built through it.
pub struct SourceRegistry {
    builders: RwLock<HashMap<String, SourceBuilder>>,
    active: Mutex<Vec<Arc<dyn Source>>>,
}

impl SourceRegistry {
    /// A registry with the built-in `rss` and `irc` builders.
    #[must_use]
    pub fn new() -> Self {
        let registry = Self {
            builders: RwLock::new(HashMap::new()),
            active: Mutex::new(Vec::new()),
        };
        registry.register("rss", Box::new(RssSource::build));
        registry.register("irc", Box::new(IrcSource::build));
        registry
    }

    /// Registers a builder under `tag`, replacing any existing one.
    pub fn register(&self, tag: &str, builder: SourceBuilder) {
        self.builders.write().insert(tag.to_string(), builder);
    }

    /// Builds the source `config` describes and tracks it as active.
    pub fn create(
        &self,
        ctx: &SourceContext,
        config: &SourceConfig,
    ) -> Result<Arc<dyn Source>, SourceError> {
        let builders = self.builders.read();
        let builder = builders
            .get(&config.source_type)
            .ok_or_else(|| SourceError::UnknownType(config.source_type.clone()))?;
        let source = builder(ctx, config)?;
        self.active.lock().push(Arc::clone(&source));
        Ok(source)
    }

    /// Number of sources currently tracked.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Closes every tracked source, logging failures. The active list is
    /// empty afterwards.
    pub async fn close_all(&self) {
        let sources: Vec<Arc<dyn Source>> = std::mem::take(&mut *self.active.lock());
        for source in sources {
            if let Err(error) = source.close().await {
                warn!(
                    source_type = %source.source_type(),
                    group = %source.group_key(),
                    %error,
                    "failed to close source"
                );
            }
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Static per-source parse context assembled from the config entry.
pub(crate) fn source_ref_from(config: &SourceConfig, shows: Arc<dyn ShowLookup>) -> SourceRef {
    SourceRef {
        fetch_kind: config.fetch,
        defaults: config.defaults.clone(),
        group: GroupRef {
            key: config.group.key.clone(),
            name: config.group.name.clone(),
            shows,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use mihari_core::types::FetchKind;

    use super::*;
    use crate::config::GroupConfig;
    use crate::shows::ShowIndex;

    fn context() -> (SourceContext, mpsc::Receiver<Episode>) {
        let (episodes, rx) = mpsc::channel(16);
        let ctx = SourceContext::new(
            Arc::new(EpisodeParser::new().unwrap()),
            Arc::new(ShowIndex::new([])),
            Arc::new(ConnectionManager::new()),
            episodes,
        )
        .unwrap();
        (ctx, rx)
    }

    fn rss_config() -> SourceConfig {
        SourceConfig {
            source_type: "rss".to_string(),
            group: GroupConfig {
                key: "subs".to_string(),
                name: "Subs United".to_string(),
            },
            fetch: FetchKind::Torrent,
            defaults: Default::default(),
            url: Some("https://example.test/feed.xml".to_string()),
            network: None,
            channel: None,
            announce: None,
        }
    }

    struct StubSource {
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Source for StubSource {
        fn source_type(&self) -> &str {
            "stub"
        }

        fn group_key(&self) -> &str {
            "stub-group"
        }

        async fn fetch(&self) -> Result<(), SourceError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), SourceError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn builtin_builders_are_registered() {
        let (ctx, _rx) = context();
        let registry = SourceRegistry::new();
        let source = registry.create(&ctx, &rss_config()).unwrap();
        assert_eq!(source.source_type(), "rss");
        assert_eq!(source.group_key(), "subs");
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let (ctx, _rx) = context();
        let registry = SourceRegistry::new();
        let mut config = rss_config();
        config.source_type = "nzb".to_string();

        let Err(error) = registry.create(&ctx, &config) else {
            panic!("expected an unknown type to fail");
        };
        assert_eq!(error.to_string(), "source type nzb does not exist");
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn custom_builders_can_be_registered() {
        let (ctx, _rx) = context();
        let registry = SourceRegistry::new();
        registry.register(
            "stub",
            Box::new(|_, _| {
                Ok(Arc::new(StubSource {
                    closed: Arc::new(AtomicBool::new(false)),
                }) as Arc<dyn Source>)
            }),
        );

        let mut config = rss_config();
        config.source_type = "stub".to_string();
        let source = registry.create(&ctx, &config).unwrap();
        assert_eq!(source.source_type(), "stub");
    }

    #[tokio::test]
    async fn close_all_drains_the_active_list() {
        let (ctx, _rx) = context();
        let registry = SourceRegistry::new();
        let closed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&closed);
        registry.register(
            "stub",
            Box::new(move |_, _| {
                Ok(Arc::new(StubSource {
                    closed: Arc::clone(&flag),
                }) as Arc<dyn Source>)
            }),
        );
        let mut config = rss_config();
        config.source_type = "stub".to_string();
        registry.create(&ctx, &config).unwrap();
        assert_eq!(registry.active_count(), 1);

        registry.close_all().await;

        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(registry.active_count(), 0);
    }
}
