//! IRC announce source: watches a channel and parses announce lines.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mihari_core::parser::EpisodeParser;
use mihari_core::types::{Episode, SourceRef};
use parking_lot::Mutex;
use regex::Regex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::SourceConfig;
use crate::irc::{ChannelWatcher, ConnectionManager};
use crate::sources::{Source, SourceContext, SourceError, source_ref_from};

/// Source fed by announce lines in an IRC channel.
///
/// The first `fetch` joins the channel; the watcher buffers every line it
/// sees and each later `fetch` drains and parses the buffer.
pub struct IrcSource {
    network: String,
    channel: String,
    announce: Regex,
    source_ref: SourceRef,
    parser: Arc<EpisodeParser>,
    manager: Arc<ConnectionManager>,
    episodes: mpsc::Sender<Episode>,
    buffer: Arc<Mutex<Vec<String>>>,
    watching: AtomicBool,
}

impl IrcSource {
    pub(crate) fn build(
        ctx: &SourceContext,
        config: &SourceConfig,
    ) -> Result<Arc<dyn Source>, SourceError> {
        let missing = |field| SourceError::MissingField {
            group: config.group.key.clone(),
            field,
        };
        let network = config.network.clone().ok_or_else(|| missing("network"))?;
        let channel = config.channel.clone().ok_or_else(|| missing("channel"))?;
        let pattern = config.announce.as_deref().ok_or_else(|| missing("announce"))?;

        let announce = Regex::new(pattern)?;
        let names: Vec<&str> = announce.capture_names().flatten().collect();
        if !names.contains(&"file") || !names.contains(&"link") {
            return Err(SourceError::AnnounceCaptures);
        }

        Ok(Arc::new(Self {
            network,
            channel,
            announce,
            source_ref: source_ref_from(config, Arc::clone(&ctx.shows)),
            parser: Arc::clone(&ctx.parser),
            manager: Arc::clone(&ctx.manager),
            episodes: ctx.episodes.clone(),
            buffer: Arc::new(Mutex::new(Vec::new())),
            watching: AtomicBool::new(false),
        }))
    }

    /// Applies the announce pattern to each buffered line and forwards the
    /// wanted episodes.
    async fn ingest(&self, lines: Vec<String>) -> Result<(), SourceError> {
        for line in lines {
            let Some(caps) = self.announce.captures(&line) else {
                debug!(channel = %self.channel, %line, "announce line did not match pattern");
                continue;
            };
            let (Some(file), Some(link)) = (caps.name("file"), caps.name("link")) else {
                debug!(channel = %self.channel, %line, "announce match missing captures");
                continue;
            };
            let options = self.source_ref.fetch_kind.options_for(link.as_str());
            if let Some(episode) =
                self.parser
                    .parse_wanted_episode(file.as_str(), options, &self.source_ref)?
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
impl Source for IrcSource {
    fn source_type(&self) -> &str {
        "irc"
    }

    fn group_key(&self) -> &str {
        &self.source_ref.group.key
    }

    async fn fetch(&self) -> Result<(), SourceError> {
        if !self.watching.swap(true, Ordering::SeqCst) {
            let buffer = Arc::clone(&self.buffer);
            let watcher: ChannelWatcher = Arc::new(move |_nick, line| {
                buffer.lock().push(line.to_string());
            });
            if let Err(error) = self
                .manager
                .add_channel_watcher(&self.network, &self.channel, watcher)
                .await
            {
                self.watching.store(false, Ordering::SeqCst);
                return Err(error.into());
            }
            debug!(network = %self.network, channel = %self.channel, "watching announce channel");
        }

        let lines: Vec<String> = std::mem::take(&mut *self.buffer.lock());
        self.ingest(lines).await
    }

    async fn close(&self) -> Result<(), SourceError> {
        self.buffer.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mihari_core::types::{FetchKind, FetchOptions, Releaser, Resolution, Show};

    use super::*;
    use crate::config::GroupConfig;
    use crate::irc::ManagerError;
    use crate::shows::ShowIndex;

    const ANNOUNCE: &str = r"^New release: (?P<file>.+?) :: (?P<link>\S+)$";

    fn source_config() -> SourceConfig {
        SourceConfig {
            source_type: "irc".to_string(),
            group: GroupConfig {
                key: "fast".to_string(),
                name: "Fast Announce".to_string(),
            },
            fetch: FetchKind::Http,
            defaults: Default::default(),
            url: None,
            network: Some("main".to_string()),
            channel: Some("#announce".to_string()),
            announce: Some(ANNOUNCE.to_string()),
        }
    }

    fn tracked_show() -> Show {
        Show {
            name: "Some Anime".to_string(),
            group_id: "show-1".to_string(),
            wanted_resolutions: [Resolution::HD720].into(),
            releasers: HashMap::from([(
                "fast".to_string(),
                Releaser {
                    media: "TV".to_string(),
                    subbing: "hardsub".to_string(),
                },
            )]),
        }
    }

    fn test_context(index: ShowIndex) -> (SourceContext, mpsc::Receiver<Episode>) {
        let (episodes, rx) = mpsc::channel(16);
        let ctx = SourceContext::new(
            Arc::new(EpisodeParser::new().unwrap()),
            Arc::new(index),
            Arc::new(ConnectionManager::new()),
            episodes,
        )
        .unwrap();
        (ctx, rx)
    }

    fn source_under_test(ctx: &SourceContext) -> IrcSource {
        IrcSource {
            network: "main".to_string(),
            channel: "#announce".to_string(),
            announce: Regex::new(ANNOUNCE).unwrap(),
            source_ref: source_ref_from(&source_config(), Arc::clone(&ctx.shows)),
            parser: Arc::clone(&ctx.parser),
            manager: Arc::clone(&ctx.manager),
            episodes: ctx.episodes.clone(),
            buffer: Arc::new(Mutex::new(Vec::new())),
            watching: AtomicBool::new(false),
        }
    }

    #[test]
    fn build_requires_network_channel_and_announce() {
        let (ctx, _rx) = test_context(ShowIndex::new([]));
        for field in ["network", "channel", "announce"] {
            let mut config = source_config();
            match field {
                "network" => config.network = None,
                "channel" => config.channel = None,
                _ => config.announce = None,
            }
            let Err(error) = IrcSource::build(&ctx, &config) else {
                panic!("expected missing `{field}` to fail the build");
            };
            assert!(
                matches!(error, SourceError::MissingField { field: f, .. } if f == field),
                "expected missing `{field}`, got {error}"
            );
        }
    }

    #[test]
    fn build_rejects_invalid_patterns() {
        let (ctx, _rx) = test_context(ShowIndex::new([]));
        let mut config = source_config();
        config.announce = Some("(((".to_string());
        assert!(matches!(
            IrcSource::build(&ctx, &config),
            Err(SourceError::Announce(_))
        ));
    }

    #[test]
    fn build_rejects_patterns_without_named_captures() {
        let (ctx, _rx) = test_context(ShowIndex::new([]));
        for pattern in [
            r"^New release: (.+) :: (\S+)$",
            r"^New release: (?P<file>.+) :: (\S+)$",
            r"^New release: (.+) :: (?P<link>\S+)$",
        ] {
            let mut config = source_config();
            config.announce = Some(pattern.to_string());
            assert!(matches!(
                IrcSource::build(&ctx, &config),
                Err(SourceError::AnnounceCaptures)
            ));
        }
    }

    #[tokio::test]
    async fn ingest_parses_matching_announce_lines() {
        let (ctx, mut rx) = test_context(ShowIndex::new([tracked_show()]));
        let source = source_under_test(&ctx);

        source
            .ingest(vec![
                "New release: [Fast] Some Anime - 07 [720p].mkv :: https://example.test/7"
                    .to_string(),
                "unrelated chatter".to_string(),
            ])
            .await
            .unwrap();
        drop(source);
        drop(ctx);

        let episode = rx.recv().await.unwrap();
        assert_eq!(episode.episode, 7);
        assert_eq!(episode.subbing, "hardsub");
        assert_eq!(
            episode.fetch_options,
            FetchOptions::Http {
                url: "https://example.test/7".to_string()
            }
        );
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn fetch_fails_without_the_network() {
        let (ctx, _rx) = test_context(ShowIndex::new([tracked_show()]));
        let source = source_under_test(&ctx);

        let error = source.fetch().await.unwrap_err();
        assert!(matches!(
            error,
            SourceError::Manager(ManagerError::UnknownNetwork(_))
        ));
        // a failed join retries instead of pretending to watch
        let error = source.fetch().await.unwrap_err();
        assert!(matches!(error, SourceError::Manager(_)));
    }

    #[tokio::test]
    async fn close_clears_the_buffer() {
        let (ctx, _rx) = test_context(ShowIndex::new([]));
        let source = source_under_test(&ctx);
        source.buffer.lock().push("queued".to_string());

        source.close().await.unwrap();

        assert!(source.buffer.lock().is_empty());
    }
}
