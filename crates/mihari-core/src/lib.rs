//! # Mihari Core
//!
//! Heuristic extraction of wanted episodes from anime release filenames.
//! Tokenizes the bracket-heavy, multilingual names fansub groups produce,
//! pulls out episode number, version, resolution, container and checksum,
//! fills gaps from per-source defaults, and filters the result against the
//! matched show's accepted resolutions. Names that fail land in a bounded
//! cache so repeated announcements cost nothing.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mihari_core::parser::EpisodeParser;
//! use mihari_core::types::{
//!     FetchKind, GroupRef, Resolution, Show, ShowLookup, SourceDefaults, SourceRef,
//! };
//!
//! struct OneShow(Arc<Show>);
//!
//! impl ShowLookup for OneShow {
//!     fn find_show(
//!         &self,
//!         _file_name: &str,
//!     ) -> Result<Option<Arc<Show>>, mihari_core::BoxError> {
//!         Ok(Some(self.0.clone()))
//!     }
//! }
//!
//! # fn main() -> mihari_core::Result<()> {
//! let show = Arc::new(Show {
//!     name: "Some Anime".to_owned(),
//!     group_id: "show-1".to_owned(),
//!     wanted_resolutions: [Resolution::HD720].into(),
//!     releasers: Default::default(),
//! });
//! let source = SourceRef {
//!     fetch_kind: FetchKind::Torrent,
//!     defaults: SourceDefaults::default(),
//!     group: GroupRef {
//!         key: "subs".to_owned(),
//!         name: "Subs United".to_owned(),
//!         shows: Arc::new(OneShow(show)),
//!     },
//! };
//!
//! let parser = EpisodeParser::new()?;
//! let episode = parser
//!     .parse_wanted_episode(
//!         "[Subs] Some Anime - 01 [720p][123A4BC5].mkv",
//!         FetchKind::Torrent.options_for("magnet:?xt=demo"),
//!         &source,
//!     )?
//!     .expect("wanted");
//!
//! assert_eq!(episode.episode, 1);
//! assert_eq!(episode.resolution, Resolution::HD720);
//! assert_eq!(episode.crc.as_deref(), Some("123A4BC5"));
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod parser;
pub mod types;

// Re-export primary API
pub use error::{BoxError, MihariError, Result};
pub use parser::{EpisodeParser, RawTokens, Token, TokenExtractor, Tokenizer, UnparseableCache};
pub use types::{
    Episode, FetchKind, FetchOptions, GroupRef, Releaser, Resolution, Show, ShowLookup,
    SourceDefaults, SourceRef,
};
