pub mod episode;
pub mod resolution;
pub mod show;
pub mod source;

pub use episode::Episode;
pub use resolution::{ParseResolutionError, Resolution};
pub use show::{Releaser, Show, ShowLookup};
pub use source::{FetchKind, FetchOptions, GroupRef, SourceDefaults, SourceRef};
