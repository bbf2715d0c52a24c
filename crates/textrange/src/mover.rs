use std::str::FromStr;

use crate::chars::{CharSource, possible_char_before, resolved_char_before};
use crate::context::TextContext;
use crate::error::TextError;
use crate::iter::CharacterIterator;
use crate::options::{ExpandOptions, WordOptions};
use crate::position::{Position, compare_positions};
use crate::walker;
use crate::words::{Token, TokenizedTextProvider};

/// Movement units. The string forms accepted by the range facade are
/// `"character"` and `"word"`; anything else is an unsupported unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextUnit {
    Character,
    Word,
}

impl FromStr for TextUnit {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "character" => Ok(TextUnit::Character),
            "word" => Ok(TextUnit::Word),
            _ => Err(TextError::UnsupportedUnit(s.to_string())),
        }
    }
}

/// Move a position by `count` units. Returns the new position and the
/// number of units actually moved, signed by direction; movement past the
/// end of content stops early rather than erroring.
pub fn move_position_by(
    ctx: &TextContext<'_>,
    pos: Position,
    unit: TextUnit,
    count: i64,
    word_options: &WordOptions,
) -> (Position, i64) {
    if count == 0 {
        return (pos, 0);
    }
    let backward = count < 0;
    let target = count.unsigned_abs();
    let (landing, moved) = match unit {
        TextUnit::Character => move_by_characters(ctx, pos, backward, target),
        TextUnit::Word => move_by_words(ctx, pos, backward, target, word_options),
    };
    let moved = moved as i64;
    (landing, if backward { -moved } else { moved })
}

fn move_by_characters(
    ctx: &TextContext<'_>,
    pos: Position,
    backward: bool,
    target: u64,
) -> (Position, u64) {
    let mut iter = CharacterIterator::new(ctx, pos, backward, None);
    let mut moved = 0u64;
    let mut landing = pos;
    while moved < target {
        match iter.next() {
            Some(tc) => {
                moved += 1;
                landing = tc.pos;
            }
            None => break,
        }
    }
    if backward && moved > 0 {
        landing = adjust_backward_landing(ctx, landing);
    }
    (landing, moved)
}

fn move_by_words(
    ctx: &TextContext<'_>,
    pos: Position,
    backward: bool,
    target: u64,
    word_options: &WordOptions,
) -> (Position, u64) {
    let mut provider = TokenizedTextProvider::new(ctx, pos, word_options.clone());
    let mut moved = 0u64;
    let mut landing = pos;
    while moved < target {
        let token = if backward {
            provider.previous_start_token()
        } else {
            provider.next_end_token()
        };
        match token {
            Some(token) if token.is_word => {
                moved += 1;
                landing = if backward {
                    word_start_boundary(&token)
                } else {
                    word_end_boundary(&token)
                };
            }
            Some(_) => {}
            None => break,
        }
    }
    if backward && moved > 0 {
        landing = adjust_backward_landing(ctx, landing);
    }
    (landing, moved)
}

fn word_start_boundary(token: &Token) -> Position {
    token
        .chars
        .first()
        .expect("tokens are never empty")
        .pos
}

fn word_end_boundary(token: &Token) -> Position {
    token.chars.last().expect("tokens are never empty").pos
}

/// Character iteration in reverse lands one position past where a forward
/// walk would; step back once, then skip a synthesized leading break so the
/// boundary lands inside the block rather than before it.
fn adjust_backward_landing(ctx: &TextContext<'_>, landing: Position) -> Position {
    let mut pos = walker::previous_position(ctx, landing).unwrap_or(landing);
    let leading_break = pos.offset == 0
        && possible_char_before(ctx, pos).is_some_and(|p| p.source == CharSource::SynthBlock);
    if leading_break {
        while let Some(next) = walker::next_position(ctx, pos) {
            if resolved_char_before(ctx, next).is_none() {
                pos = next;
            } else {
                break;
            }
        }
    }
    pos
}

/// Expand `[start, end]` to whole-token boundaries: the token at/after the
/// start boundary and the token at/before the end boundary (one token for a
/// collapsed range). Returns the new boundaries, or `None` when no token
/// exists on either side.
pub(crate) fn word_boundaries(
    ctx: &TextContext<'_>,
    start: Position,
    end: Position,
    word_options: &WordOptions,
) -> Option<(Position, Position)> {
    let collapsed = compare_positions(ctx.doc(), start, end) == std::cmp::Ordering::Equal;
    let mut start_provider = TokenizedTextProvider::new(ctx, start, word_options.clone());
    let start_token = start_provider.next_end_token()?;
    // A collapsed range takes both boundaries from the one token at its
    // position.
    let end_token = if collapsed {
        start_token.clone()
    } else {
        let mut end_provider = TokenizedTextProvider::new(ctx, end, word_options.clone());
        end_provider.previous_start_token()?
    };
    let new_start = walker::previous_position(ctx, word_start_boundary(&start_token))
        .unwrap_or(start);
    let new_end = word_end_boundary(&end_token);
    if compare_positions(ctx.doc(), new_start, new_end) == std::cmp::Ordering::Greater {
        return None;
    }
    Some((new_start, new_end))
}

/// Expand a range to whole-word boundaries, optionally trimming whitespace
/// afterwards. Returns the boundaries and whether either one moved.
pub(crate) fn expand_to_word(
    ctx: &TextContext<'_>,
    start: Position,
    end: Position,
    options: &ExpandOptions,
) -> (Position, Position, bool) {
    let Some((mut new_start, mut new_end)) = word_boundaries(ctx, start, end, &options.word_options)
    else {
        return (start, end, false);
    };
    if options.trim || options.trim_start {
        new_start = trim_start(ctx, new_start, new_end);
    }
    if options.trim || options.trim_end {
        new_end = trim_end(ctx, new_start, new_end);
    }
    let moved = new_start != start || new_end != end;
    (new_start, new_end, moved)
}

fn trim_start(ctx: &TextContext<'_>, start: Position, end: Position) -> Position {
    let mut iter = CharacterIterator::new(ctx, start, false, Some(end));
    let mut pos = start;
    while let Some(tc) = iter.next() {
        if tc.ch.is_whitespace() {
            pos = tc.pos;
        } else {
            break;
        }
    }
    pos
}

fn trim_end(ctx: &TextContext<'_>, start: Position, end: Position) -> Position {
    let mut iter = CharacterIterator::new(ctx, end, true, Some(start));
    let mut pos = end;
    while let Some(tc) = iter.next() {
        if tc.ch.is_whitespace() {
            pos = walker::previous_position(ctx, tc.pos).unwrap_or(pos);
        } else {
            break;
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CharacterOptions;
    use dom::parse_document;

    fn ctx_for(doc: &dom::Document) -> TextContext<'_> {
        TextContext::new(doc, CharacterOptions::default())
    }

    #[test]
    fn unit_parsing() {
        assert_eq!("character".parse::<TextUnit>().unwrap(), TextUnit::Character);
        assert_eq!(" Word ".parse::<TextUnit>().unwrap(), TextUnit::Word);
        assert!(matches!(
            "sentence".parse::<TextUnit>(),
            Err(TextError::UnsupportedUnit(_))
        ));
    }

    #[test]
    fn zero_count_is_a_no_op() {
        let doc = parse_document("<p>abc</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let pos = Position::new(t, 1);
        assert_eq!(
            move_position_by(&ctx, pos, TextUnit::Character, 0, &WordOptions::default()),
            (pos, 0)
        );
    }

    #[test]
    fn forward_characters_stop_at_content_end() {
        let doc = parse_document("<p>ab</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let (pos, moved) = move_position_by(
            &ctx,
            Position::new(t, 0),
            TextUnit::Character,
            5,
            &WordOptions::default(),
        );
        assert_eq!(moved, 2);
        assert_eq!(pos, Position::new(t, 2));
    }

    #[test]
    fn backward_characters_land_before_the_character() {
        let doc = parse_document("<p>ab</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let (pos, moved) = move_position_by(
            &ctx,
            Position::new(t, 2),
            TextUnit::Character,
            -1,
            &WordOptions::default(),
        );
        assert_eq!(moved, -1);
        assert_eq!(pos, Position::new(t, 1));
    }

    #[test]
    fn characters_cross_block_boundaries() {
        let doc = parse_document("<p>1</p><p>2</p>");
        let ctx = ctx_for(&doc);
        let t1 = doc.children(doc.children(doc.root())[0])[0];
        // "1", then the synthesized break, then "2".
        let (pos, moved) = move_position_by(
            &ctx,
            Position::new(t1, 0),
            TextUnit::Character,
            3,
            &WordOptions::default(),
        );
        assert_eq!(moved, 3);
        let t2 = doc.children(doc.children(doc.root())[1])[0];
        assert_eq!(pos, Position::new(t2, 1));
    }

    #[test]
    fn word_movement_forward_and_backward() {
        let doc = parse_document("<p>one two three</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let options = WordOptions::default();

        let (pos, moved) =
            move_position_by(&ctx, Position::new(t, 5), TextUnit::Word, -1, &options);
        assert_eq!(moved, -1);
        assert_eq!(pos, Position::new(t, 4));

        let (pos, moved) =
            move_position_by(&ctx, Position::new(t, 5), TextUnit::Word, 1, &options);
        assert_eq!(moved, 1);
        assert_eq!(pos, Position::new(t, 7));

        let (pos, moved) =
            move_position_by(&ctx, Position::new(t, 0), TextUnit::Word, 2, &options);
        assert_eq!(moved, 2);
        assert_eq!(pos, Position::new(t, 7));
    }

    #[test]
    fn expand_is_idempotent_on_whole_words() {
        let doc = parse_document("<p>one two three</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let (start, end, moved) = expand_to_word(
            &ctx,
            Position::new(t, 4),
            Position::new(t, 7),
            &ExpandOptions::default(),
        );
        assert!(!moved);
        assert_eq!(start, Position::new(t, 4));
        assert_eq!(end, Position::new(t, 7));
    }

    #[test]
    fn expand_selects_the_word_around_a_caret() {
        let doc = parse_document("<p>one two three</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let caret = Position::new(t, 5);
        let (start, end, moved) =
            expand_to_word(&ctx, caret, caret, &ExpandOptions::default());
        assert!(moved);
        assert_eq!(start, Position::new(t, 4));
        assert_eq!(end, Position::new(t, 7));
    }

    #[test]
    fn expand_grows_a_mid_word_range() {
        let doc = parse_document("<p>one two three</p>");
        let ctx = ctx_for(&doc);
        let t = doc.children(doc.children(doc.root())[0])[0];
        let (start, end, moved) = expand_to_word(
            &ctx,
            Position::new(t, 5),
            Position::new(t, 6),
            &ExpandOptions::default(),
        );
        assert!(moved);
        assert_eq!(start, Position::new(t, 4));
        assert_eq!(end, Position::new(t, 7));
    }
}
