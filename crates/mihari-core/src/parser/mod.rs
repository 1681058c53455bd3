pub mod cache;
pub mod defaults;
pub mod extractor;
pub mod tokenizer;
pub mod wanted;

pub use cache::{DEFAULT_CACHE_CAPACITY, UnparseableCache};
pub use defaults::{DefaultsError, ResolvedDefaults};
pub use extractor::{RawTokens, TokenExtractor};
pub use tokenizer::{Token, Tokenizer};
pub use wanted::EpisodeParser;
