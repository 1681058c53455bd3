//! Tokenizer for release filenames.
//!
//! Splits a filename on the bracket, punctuation and whitespace characters
//! fansub groups use as field separators, keeping the original text and
//! position of every token. Later heuristics depend on token order and on
//! case being preserved, so no normalization happens here.

/// A token extracted from a filename with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text, exactly as it appears in the filename.
    pub text: String,
    /// Start byte offset in the original string.
    pub start: usize,
    /// End byte offset in the original string.
    pub end: usize,
    /// Token index in the sequence.
    pub index: usize,
}

/// Delimiter characters used for tokenization. Covers ASCII brackets and
/// separators plus the full-width brackets and ideographic space common in
/// Japanese release names.
const DELIMITERS: &[char] = &[
    '[', ']', '(', ')', '{', '}', '【', '】', '（', '）', '「', '」', '_', '.', '-', ' ', '\u{3000}',
];

/// Tokenizer for release filenames.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Tokenizes a filename into a sequence of tokens.
    ///
    /// Empty runs between adjacent delimiters produce no token, so
    /// `"a  -  b"` and `"a-b"` tokenize identically apart from positions.
    ///
    /// # Examples
    /// ```
    /// use mihari_core::parser::tokenizer::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("[Subs] Some Anime - 24 (1080p)");
    /// assert_eq!(tokens[0].text, "Subs");
    /// assert_eq!(tokens.last().unwrap().text, "1080p");
    /// ```
    #[must_use]
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current_start = 0;

        for (idx, c) in input.char_indices() {
            if DELIMITERS.contains(&c) {
                if idx > current_start {
                    tokens.push(Token {
                        text: input[current_start..idx].to_owned(),
                        start: current_start,
                        end: idx,
                        index: tokens.len(),
                    });
                }
                current_start = idx + c.len_utf8();
            }
        }

        if current_start < input.len() {
            tokens.push(Token {
                text: input[current_start..].to_owned(),
                start: current_start,
                end: input.len(),
                index: tokens.len(),
            });
        }

        tokens
    }
}
