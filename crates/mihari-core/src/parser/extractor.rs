use regex::{Captures, Regex};

use crate::error::Result;
use crate::parser::tokenizer::{Token, Tokenizer};
use crate::types::Resolution;

/// Raw fields pulled out of a tokenized filename, before defaults are
/// applied and before any show-level filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTokens {
    /// Episode number, always at least 1.
    pub episode: u32,
    /// Release version, 1 unless a valid `v` suffix was attached.
    pub version: u8,
    /// Normalized resolution when a token named one.
    pub resolution: Option<Resolution>,
    /// Container extension when the name ends in one, case as found.
    pub container: Option<String>,
    /// Uppercase checksum when a consistent-case 8-hex token was found.
    pub crc: Option<String>,
}

/// Token-level extractor for release filenames.
///
/// Each heuristic works on the token sequence rather than the raw string,
/// so bracket dialect and separator choice never change the outcome. The
/// container is the one exception: an extension is only meaningful at the
/// very end of the filename, so it is matched against the whole string.
pub struct TokenExtractor {
    tokenizer: Tokenizer,
    re_season_episode: Regex,
    re_marked_episode: Regex,
    re_ideographic_episode: Regex,
    re_bare_episode: Regex,
    re_marker_word: Regex,
    re_checksum: Regex,
    re_container: Regex,
}

impl TokenExtractor {
    /// Constructs a new `TokenExtractor` with pre-compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MihariError::RegexError`] if any pattern fails to
    /// compile (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new(),
            re_season_episode: Regex::new(r"(?i)^s\d{1,2}ep?(\d{1,4})(?:v(\d+))?$")?,
            re_marked_episode: Regex::new(r"(?i)^(?:episode|ep?)(\d{1,4})(?:v(\d+))?$")?,
            re_ideographic_episode: Regex::new(r"^第(\d{1,4})話?$")?,
            re_bare_episode: Regex::new(r"(?i)^(\d{1,4})(?:v(\d+))?$")?,
            re_marker_word: Regex::new(r"(?i)^(?:episode|ep?|第)$")?,
            re_checksum: Regex::new(r"^(?:[0-9A-F]{8}|[0-9a-f]{8})$")?,
            re_container: Regex::new(r"\.([A-Za-z0-9]+)$")?,
        })
    }

    /// Extracts raw episode fields from a suffix-stripped filename.
    ///
    /// Returns `None` when no episode number can be found; every other
    /// field is optional on its own.
    #[must_use]
    pub fn extract(&self, file_name: &str) -> Option<RawTokens> {
        let tokens = self.tokenizer.tokenize(file_name);
        let (episode, version) = self.find_episode(&tokens)?;
        Some(RawTokens {
            episode,
            version,
            resolution: self.find_resolution(&tokens),
            container: self.find_container(file_name),
            crc: self.find_crc(&tokens),
        })
    }

    /// Picks the winning episode candidate.
    ///
    /// Marked forms (`S02E01`, `EP01`, `第01話`, a marker word followed by a
    /// number) always beat bare digit tokens; within the same class the
    /// rightmost occurrence wins, so numeric show titles resolve by
    /// position. Zero is never a valid episode number.
    fn find_episode(&self, tokens: &[Token]) -> Option<(u32, u8)> {
        let mut marked: Option<(u32, u8)> = None;
        let mut bare: Option<(u32, u8)> = None;

        for (i, token) in tokens.iter().enumerate() {
            let text = token.text.as_str();

            if let Some(caps) = self.re_season_episode.captures(text) {
                if let Some(found) = parse_candidate(&caps) {
                    marked = Some(found);
                }
                continue;
            }
            if let Some(caps) = self.re_marked_episode.captures(text) {
                if let Some(found) = parse_candidate(&caps) {
                    marked = Some(found);
                }
                continue;
            }
            if let Some(caps) = self.re_ideographic_episode.captures(text) {
                if let Some(found) = parse_candidate(&caps) {
                    marked = Some(found);
                }
                continue;
            }
            if self.re_marker_word.is_match(text) {
                let next = tokens
                    .get(i + 1)
                    .and_then(|next| self.re_bare_episode.captures(&next.text));
                if let Some(caps) = next {
                    if let Some(found) = parse_candidate(&caps) {
                        marked = Some(found);
                    }
                }
                continue;
            }
            if let Some(caps) = self.re_bare_episode.captures(text) {
                if let Some(found) = parse_candidate(&caps) {
                    bare = Some(found);
                }
            }
        }

        marked.or(bare)
    }

    fn find_resolution(&self, tokens: &[Token]) -> Option<Resolution> {
        tokens
            .iter()
            .rev()
            .find_map(|token| Resolution::from_token(&token.text))
    }

    /// The container must sit at the very end of the filename; trailing
    /// garbage after the extension (`"….mkv v2"`) means there is none.
    fn find_container(&self, file_name: &str) -> Option<String> {
        self.re_container
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
    }

    /// Checksums are 8 hex digits in consistent case. The first token is
    /// exempt because some titles open with an 8-hex disambiguator; among
    /// the rest the last candidate wins.
    fn find_crc(&self, tokens: &[Token]) -> Option<String> {
        tokens
            .iter()
            .skip(1)
            .rev()
            .find(|token| self.re_checksum.is_match(&token.text))
            .map(|token| token.text.to_ascii_uppercase())
    }
}

/// Reads episode number and version out of a candidate match. Episode 0 is
/// discarded; a version outside 1..=19 falls back to 1.
fn parse_candidate(caps: &Captures<'_>) -> Option<(u32, u8)> {
    let episode: u32 = caps.get(1)?.as_str().parse().ok()?;
    if episode == 0 {
        return None;
    }
    let version = caps
        .get(2)
        .and_then(|v| v.as_str().parse::<u8>().ok())
        .filter(|v| (1..=19).contains(v))
        .unwrap_or(1);
    Some((episode, version))
}
