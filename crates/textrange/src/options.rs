use regex::Regex;

use crate::range::TextRange;
use crate::words::TokenizerFn;

/// Controls which synthesized whitespace is included in resolved text.
#[derive(Clone, Copy, Debug)]
pub struct CharacterOptions {
    /// Emit a collapsible space whose next rendered character is a block
    /// boundary line break.
    pub include_block_content_trailing_space: bool,
    /// Emit a collapsible space immediately before a `<br>` line break.
    pub include_space_before_br: bool,
    /// Emit a collapsible space immediately before a preserved `pre-line`
    /// line break.
    pub include_pre_line_trailing_space: bool,
}

impl Default for CharacterOptions {
    fn default() -> Self {
        CharacterOptions {
            include_block_content_trailing_space: true,
            include_space_before_br: true,
            include_pre_line_trailing_space: true,
        }
    }
}

/// Controls word tokenization.
#[derive(Clone, Debug)]
pub struct WordOptions {
    pub language: String,
    /// Must match runs of word characters against a concatenated string view
    /// of a character run.
    pub word_regex: Regex,
    /// Extend each word token forward through its trailing spaces.
    pub include_trailing_space: bool,
    pub tokenizer: TokenizerFn,
}

impl WordOptions {
    pub fn for_language(language: &str) -> Self {
        WordOptions {
            language: language.to_string(),
            ..WordOptions::default()
        }
    }
}

impl Default for WordOptions {
    fn default() -> Self {
        WordOptions {
            language: "en".to_string(),
            // Alphanumerics plus internal apostrophes.
            word_regex: Regex::new(r"(?i)[a-z0-9]+(?:['\u{2019}][a-z0-9]+)*")
                .expect("default word pattern compiles"),
            include_trailing_space: false,
            tokenizer: crate::words::default_tokenizer,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Options for `find_text`.
#[derive(Clone, Debug, Default)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub whole_words_only: bool,
    /// Re-run the search once over the complementary portion of the scope
    /// when the scope boundary is reached with no match.
    pub wrap: bool,
    pub direction: Direction,
    /// Scope range for the search; the whole document when absent.
    pub within_range: Option<TextRange>,
    pub character_options: CharacterOptions,
    pub word_options: WordOptions,
}

/// Options for `expand`.
#[derive(Clone, Debug, Default)]
pub struct ExpandOptions {
    pub character_options: CharacterOptions,
    pub word_options: WordOptions,
    /// Trim leading and trailing whitespace from the expanded range.
    pub trim: bool,
    pub trim_start: bool,
    pub trim_end: bool,
}

/// Options for boundary movement.
#[derive(Clone, Debug, Default)]
pub struct MoveOptions {
    pub character_options: CharacterOptions,
    pub word_options: WordOptions,
}
