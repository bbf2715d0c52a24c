use regex::Regex;

use crate::context::TextContext;
use crate::error::TextError;
use crate::iter::CharacterIterator;
use crate::mover::word_boundaries;
use crate::options::{Direction, FindOptions};
use crate::position::Position;
use crate::walker;

/// What to search for: a literal string or a regular-expression pattern.
#[derive(Clone, Copy, Debug)]
pub enum SearchTerm<'a> {
    Literal(&'a str),
    Pattern(&'a str),
}

enum CompiledTerm {
    Literal(Vec<char>),
    Pattern(Regex),
}

fn fold_case(c: char, case_sensitive: bool) -> char {
    if case_sensitive {
        c
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

fn compile(term: SearchTerm<'_>, options: &FindOptions) -> Result<CompiledTerm, TextError> {
    match term {
        SearchTerm::Literal(s) => Ok(CompiledTerm::Literal(
            s.chars()
                .map(|c| fold_case(c, options.case_sensitive))
                .collect(),
        )),
        SearchTerm::Pattern(p) => {
            let source = if options.case_sensitive {
                p.to_string()
            } else {
                format!("(?i){p}")
            };
            Regex::new(&source)
                .map(CompiledTerm::Pattern)
                .map_err(|e| TextError::InvalidPattern(e.to_string()))
        }
    }
}

/// Search for `term` in the character stream starting at `pos`, bounded by
/// `scope`. Whole-word rejection does not terminate the search; the scan
/// resumes past the rejected match. Returns character-accurate boundary
/// positions.
pub fn find_text_from_position(
    ctx: &TextContext<'_>,
    pos: Position,
    term: SearchTerm<'_>,
    options: &FindOptions,
    scope: (Position, Position),
) -> Result<Option<(Position, Position)>, TextError> {
    let compiled = compile(term, options)?;
    let backward = options.direction == Direction::Backward;
    let mut from = pos;
    loop {
        let found = match &compiled {
            CompiledTerm::Literal(needle) => scan_literal(ctx, from, needle, options, scope),
            CompiledTerm::Pattern(regex) => scan_pattern(ctx, from, regex, options, scope),
        };
        let Some((start, end)) = found else {
            return Ok(None);
        };
        if !options.whole_words_only || is_whole_word(ctx, start, end, options) {
            log::trace!(target: "textrange.search", "match at {start:?}..{end:?}");
            return Ok(Some((start, end)));
        }
        // Found-but-invalid: resume from the far edge of the match.
        from = if backward { start } else { end };
    }
}

fn is_whole_word(
    ctx: &TextContext<'_>,
    start: Position,
    end: Position,
    options: &FindOptions,
) -> bool {
    match word_boundaries(ctx, start, end, &options.word_options) {
        Some((word_start, word_end)) => word_start == start && word_end == end,
        None => false,
    }
}

fn boundary_before(ctx: &TextContext<'_>, pos: Position) -> Position {
    walker::previous_position(ctx, pos).unwrap_or(pos)
}

fn scan_literal(
    ctx: &TextContext<'_>,
    from: Position,
    needle: &[char],
    options: &FindOptions,
    scope: (Position, Position),
) -> Option<(Position, Position)> {
    if needle.is_empty() {
        return None;
    }
    let backward = options.direction == Direction::Backward;
    let bound = if backward { scope.0 } else { scope.1 };
    let mut iter = CharacterIterator::new(ctx, from, backward, Some(bound));

    let mut haystack: Vec<char> = Vec::new();
    let mut positions: Vec<Position> = Vec::new();
    while let Some(tc) = iter.next() {
        haystack.push(fold_case(tc.ch, options.case_sensitive));
        positions.push(tc.pos);
        if haystack.len() < needle.len() {
            continue;
        }
        let tail = &haystack[haystack.len() - needle.len()..];
        let matched = if backward {
            tail.iter().rev().eq(needle.iter())
        } else {
            tail == needle
        };
        if matched {
            let (first, last) = if backward {
                // The newest character is the leftmost in document order.
                (positions[positions.len() - 1], positions[positions.len() - needle.len()])
            } else {
                (positions[positions.len() - needle.len()], positions[positions.len() - 1])
            };
            return Some((boundary_before(ctx, first), last));
        }
    }
    None
}

/// Pattern search re-runs the regex on the accumulated string at every new
/// character and only commits a match once one further character proves it
/// is no longer extending; this handles unbounded repetition correctly.
fn scan_pattern(
    ctx: &TextContext<'_>,
    from: Position,
    regex: &Regex,
    options: &FindOptions,
    scope: (Position, Position),
) -> Option<(Position, Position)> {
    let backward = options.direction == Direction::Backward;
    let bound = if backward { scope.0 } else { scope.1 };
    let mut iter = CharacterIterator::new(ctx, from, backward, Some(bound));

    // `chars`/`positions` are kept in document order; backward iteration
    // prepends.
    let mut chars: Vec<char> = Vec::new();
    let mut positions: Vec<Position> = Vec::new();
    let mut pending: Option<(usize, usize)> = None;

    let commit = |ctx: &TextContext<'_>, positions: &[Position], span: (usize, usize)| {
        let (start, end) = span;
        if start >= end || end > positions.len() {
            return None;
        }
        Some((boundary_before(ctx, positions[start]), positions[end - 1]))
    };

    while let Some(tc) = iter.next() {
        if backward {
            chars.insert(0, tc.ch);
            positions.insert(0, tc.pos);
            // Earlier spans shift right by one.
            pending = pending.map(|(s, e)| (s + 1, e + 1));
        } else {
            chars.push(tc.ch);
            positions.push(tc.pos);
        }
        let text: String = chars.iter().collect();
        let found = if backward {
            // The match nearest to the search origin is the rightmost one.
            regex.find_iter(&text).last()
        } else {
            regex.find(&text)
        };
        let span = found.map(|m| {
            let start = text[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            (start, end)
        });
        match (span, pending) {
            (Some(s), Some(p)) if s == p => {
                // Stable under one character of lookahead: commit.
                return commit(ctx, &positions, s);
            }
            (Some(s), _) => pending = Some(s),
            (None, _) => pending = None,
        }
    }
    pending.and_then(|p| commit(ctx, &positions, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CharacterOptions;
    use dom::parse_document;

    fn doc_scope(doc: &dom::Document) -> (Position, Position) {
        (
            Position::new(doc.root(), 0),
            Position::new(doc.root(), doc.node_len(doc.root())),
        )
    }

    fn find(
        html: &str,
        term: SearchTerm<'_>,
        options: &FindOptions,
    ) -> Option<(Position, Position)> {
        let doc = parse_document(html);
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let scope = doc_scope(&doc);
        let from = if options.direction == Direction::Backward {
            scope.1
        } else {
            scope.0
        };
        find_text_from_position(&ctx, from, term, options, scope).unwrap()
    }

    #[test]
    fn literal_search_is_case_insensitive_by_default() {
        let doc = parse_document("<p>Hello World</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let scope = doc_scope(&doc);
        let found =
            find_text_from_position(&ctx, scope.0, SearchTerm::Literal("world"), &FindOptions::default(), scope)
                .unwrap();
        let (start, end) = found.expect("match");
        let t = doc.children(doc.children(doc.root())[0])[0];
        assert_eq!(start, Position::new(t, 6));
        assert_eq!(end, Position::new(t, 11));
    }

    #[test]
    fn case_sensitive_literal_misses() {
        let options = FindOptions {
            case_sensitive: true,
            ..FindOptions::default()
        };
        assert!(find("<p>Hello</p>", SearchTerm::Literal("hello"), &options).is_none());
    }

    #[test]
    fn literal_search_spans_element_boundaries() {
        let doc = parse_document("<p>con<b>cat</b>enate</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let scope = doc_scope(&doc);
        let found = find_text_from_position(
            &ctx,
            scope.0,
            SearchTerm::Literal("concat"),
            &FindOptions::default(),
            scope,
        )
        .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn whole_words_only_rejects_substrings() {
        let options = FindOptions {
            whole_words_only: true,
            ..FindOptions::default()
        };
        assert!(find("<p>concatenate</p>", SearchTerm::Literal("cat"), &options).is_none());
        assert!(find("<p>a cat sat</p>", SearchTerm::Literal("cat"), &options).is_some());
        assert!(find("<p>concatenate</p>", SearchTerm::Literal("cat"), &FindOptions::default()).is_some());
    }

    #[test]
    fn backward_literal_finds_nearest_preceding_match() {
        let doc = parse_document("<p>ab ab ab</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let t = doc.children(doc.children(doc.root())[0])[0];
        let scope = doc_scope(&doc);
        let options = FindOptions {
            direction: Direction::Backward,
            ..FindOptions::default()
        };
        let (start, end) = find_text_from_position(
            &ctx,
            Position::new(t, 5),
            SearchTerm::Literal("ab"),
            &options,
            scope,
        )
        .unwrap()
        .expect("match");
        assert_eq!(start, Position::new(t, 3));
        assert_eq!(end, Position::new(t, 5));
    }

    #[test]
    fn pattern_with_repetition_takes_the_full_run() {
        let doc = parse_document("<p>xaaab</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let t = doc.children(doc.children(doc.root())[0])[0];
        let scope = doc_scope(&doc);
        let (start, end) = find_text_from_position(
            &ctx,
            scope.0,
            SearchTerm::Pattern("a+"),
            &FindOptions::default(),
            scope,
        )
        .unwrap()
        .expect("match");
        assert_eq!(start, Position::new(t, 1));
        assert_eq!(end, Position::new(t, 4));
    }

    #[test]
    fn invalid_pattern_surfaces_an_error() {
        let doc = parse_document("<p>x</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let scope = doc_scope(&doc);
        let result = find_text_from_position(
            &ctx,
            scope.0,
            SearchTerm::Pattern("("),
            &FindOptions::default(),
            scope,
        );
        assert!(matches!(result, Err(TextError::InvalidPattern(_))));
    }
}
