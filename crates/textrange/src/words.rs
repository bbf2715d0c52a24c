use std::collections::VecDeque;

use crate::context::TextContext;
use crate::iter::{CharacterIterator, TextCharacter};
use crate::options::WordOptions;
use crate::position::Position;

/// A maximal word or non-word run over a character sequence. Tokens
/// partition their run: no gaps, no overlaps.
#[derive(Clone, Debug)]
pub struct Token {
    pub is_word: bool,
    pub chars: Vec<TextCharacter>,
}

pub type TokenizerFn = fn(&[TextCharacter], &WordOptions) -> Vec<Token>;

/// Split a character run into word and non-word tokens by running the word
/// regex over the concatenated text. Total: every input character lands in
/// exactly one token.
pub fn default_tokenizer(chars: &[TextCharacter], options: &WordOptions) -> Vec<Token> {
    let text: String = chars.iter().map(|c| c.ch).collect();
    let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let byte_to_char = |byte: usize| char_starts.partition_point(|&start| start < byte);

    let mut tokens = Vec::new();
    let mut last_end = 0usize;
    for m in options.word_regex.find_iter(&text) {
        let mut start = byte_to_char(m.start());
        let mut end = byte_to_char(m.end());
        // Never stall on a zero-width match and never re-consume characters.
        if end <= last_end || start == end {
            continue;
        }
        if start < last_end {
            start = last_end;
        }
        if options.include_trailing_space {
            while end < chars.len() && matches!(chars[end].ch, ' ' | '\t') {
                end += 1;
            }
        }
        if start > last_end {
            tokens.push(Token {
                is_word: false,
                chars: chars[last_end..start].to_vec(),
            });
        }
        tokens.push(Token {
            is_word: true,
            chars: chars[start..end].to_vec(),
        });
        last_end = end;
    }
    if last_end < chars.len() {
        tokens.push(Token {
            is_word: false,
            chars: chars[last_end..].to_vec(),
        });
    }
    tokens
}

const CHARS_PER_FETCH: usize = 32;

/// Incrementally extends a token buffer outward from a start position in
/// either direction.
///
/// Both buffers are seeded by consuming the word surrounding the start
/// position; a token is only handed out once at least one complete token
/// follows it in the buffer (or the stream is dry), so a word is never
/// finished prematurely just because the lookahead ran out.
pub struct TokenizedTextProvider<'c, 'd> {
    forward_iter: CharacterIterator<'c, 'd>,
    backward_iter: CharacterIterator<'c, 'd>,
    forward_buf: VecDeque<Token>,
    backward_buf: VecDeque<Token>,
    options: WordOptions,
}

impl<'c, 'd> TokenizedTextProvider<'c, 'd> {
    pub fn new(ctx: &'c TextContext<'d>, pos: Position, options: WordOptions) -> Self {
        let mut forward_iter = CharacterIterator::new(ctx, pos, false, None);
        let mut backward_iter = CharacterIterator::new(ctx, pos, true, None);

        let forward_chars = consume_word(&mut forward_iter);
        let mut backward_chars = consume_word(&mut backward_iter);
        backward_chars.reverse();

        let split = backward_chars.len();
        let mut seed = backward_chars;
        seed.extend(forward_chars);
        let tokens = (options.tokenizer)(&seed, &options);

        // A token overlapping the split point belongs to both buffers: it is
        // the word surrounding the start position.
        let mut forward_buf = VecDeque::new();
        let mut backward_buf = VecDeque::new();
        let mut index = 0;
        for token in tokens {
            let start = index;
            let end = index + token.chars.len();
            index = end;
            if start < split {
                backward_buf.push_back(token.clone());
            }
            if end > split {
                forward_buf.push_back(token);
            }
        }

        TokenizedTextProvider {
            forward_iter,
            backward_iter,
            forward_buf,
            backward_buf,
            options,
        }
    }

    /// Pop the next token going forward from the start position.
    pub fn next_end_token(&mut self) -> Option<Token> {
        loop {
            if self.forward_buf.len() >= 2 {
                return self.forward_buf.pop_front();
            }
            let leftover: Vec<TextCharacter> = self
                .forward_buf
                .pop_front()
                .map(|t| t.chars)
                .unwrap_or_default();
            let mut fresh = Vec::new();
            for _ in 0..CHARS_PER_FETCH {
                match self.forward_iter.next() {
                    Some(tc) => fresh.push(tc),
                    None => break,
                }
            }
            if fresh.is_empty() {
                if leftover.is_empty() {
                    return None;
                }
                self.forward_buf = (self.options.tokenizer)(&leftover, &self.options).into();
                return self.forward_buf.pop_front();
            }
            let mut merged = leftover;
            merged.extend(fresh);
            self.forward_buf = (self.options.tokenizer)(&merged, &self.options).into();
        }
    }

    /// Pop the next token going backward from the start position.
    pub fn previous_start_token(&mut self) -> Option<Token> {
        loop {
            if self.backward_buf.len() >= 2 {
                return self.backward_buf.pop_back();
            }
            let leftover: Vec<TextCharacter> = self
                .backward_buf
                .pop_front()
                .map(|t| t.chars)
                .unwrap_or_default();
            let mut fresh = Vec::new();
            for _ in 0..CHARS_PER_FETCH {
                match self.backward_iter.next() {
                    Some(tc) => fresh.push(tc),
                    None => break,
                }
            }
            if fresh.is_empty() {
                if leftover.is_empty() {
                    return None;
                }
                self.backward_buf = (self.options.tokenizer)(&leftover, &self.options).into();
                return self.backward_buf.pop_back();
            }
            fresh.reverse();
            let mut merged = fresh;
            merged.extend(leftover);
            self.backward_buf = (self.options.tokenizer)(&merged, &self.options).into();
        }
    }
}

/// Consume characters through the word surrounding the iterator's start:
/// stop (rewinding one step) at the first word character after a word
/// boundary has been passed.
fn consume_word(iter: &mut CharacterIterator<'_, '_>) -> Vec<TextCharacter> {
    let mut chars = Vec::new();
    let mut inside_word = false;
    let mut passed_boundary = false;
    while let Some(tc) = iter.next() {
        if tc.ch.is_whitespace() {
            if inside_word {
                inside_word = false;
                passed_boundary = true;
            }
        } else {
            if passed_boundary {
                // Just returned by next(); rewinding cannot fail.
                let _ = iter.rewind();
                break;
            }
            inside_word = true;
        }
        chars.push(tc);
    }
    chars
}
