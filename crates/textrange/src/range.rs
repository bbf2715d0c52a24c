use std::cmp::Ordering;

use dom::{Document, Id};

use crate::context::TextContext;
use crate::error::TextError;
use crate::iter::CharacterIterator;
use crate::mover::{TextUnit, expand_to_word, move_position_by};
use crate::options::{CharacterOptions, Direction, ExpandOptions, FindOptions, MoveOptions};
use crate::position::{Position, compare_positions};
use crate::search::{SearchTerm, find_text_from_position};

/// Character offsets relative to a container node's text. A range starting
/// before the container yields a negative `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterRange {
    pub start: i64,
    pub end: i64,
}

/// A pair of boundary points with DOM-Range ordering semantics: setting one
/// boundary past the other collapses the other onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRange {
    start: Position,
    end: Position,
}

impl TextRange {
    pub fn new(doc: &Document, start: Position, end: Position) -> Self {
        let end = match compare_positions(doc, start, end) {
            Ordering::Greater => start,
            _ => end,
        };
        TextRange { start, end }
    }

    pub fn collapsed_at(pos: Position) -> Self {
        TextRange { start: pos, end: pos }
    }

    /// A range selecting the entire contents of a node.
    pub fn select_node_contents(doc: &Document, node: Id) -> Self {
        TextRange {
            start: Position::new(node, 0),
            end: Position::new(node, doc.node_len(node)),
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn set_start(&mut self, doc: &Document, pos: Position) {
        self.start = pos;
        if compare_positions(doc, self.end, pos) == Ordering::Less {
            self.end = pos;
        }
    }

    pub fn set_end(&mut self, doc: &Document, pos: Position) {
        self.end = pos;
        if compare_positions(doc, self.start, pos) == Ordering::Greater {
            self.start = pos;
        }
    }

    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    /// Where `pos` lies relative to this range: `Less` before it, `Equal`
    /// within it, `Greater` after it.
    pub fn compare_point(&self, doc: &Document, pos: Position) -> Ordering {
        if compare_positions(doc, pos, self.start) == Ordering::Less {
            Ordering::Less
        } else if compare_positions(doc, pos, self.end) == Ordering::Greater {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// The visible text between the boundaries; empty for a collapsed range.
    pub fn text(&self, doc: &Document) -> String {
        self.text_with_options(doc, &CharacterOptions::default())
    }

    pub fn text_with_options(&self, doc: &Document, options: &CharacterOptions) -> String {
        let ctx = TextContext::new(doc, *options);
        let mut iter = CharacterIterator::new(&ctx, self.start, false, Some(self.end));
        let mut out = String::new();
        while let Some(tc) = iter.next() {
            out.push(tc.ch);
        }
        out
    }

    /// Move the start boundary by `count` units. Returns the units actually
    /// moved, signed by direction.
    pub fn move_start(
        &mut self,
        doc: &Document,
        unit: &str,
        count: i64,
        options: &MoveOptions,
    ) -> Result<i64, TextError> {
        let unit: TextUnit = unit.parse()?;
        let ctx = TextContext::new(doc, options.character_options);
        let (pos, moved) = move_position_by(&ctx, self.start, unit, count, &options.word_options);
        self.set_start(doc, pos);
        Ok(moved)
    }

    /// Move the end boundary by `count` units.
    pub fn move_end(
        &mut self,
        doc: &Document,
        unit: &str,
        count: i64,
        options: &MoveOptions,
    ) -> Result<i64, TextError> {
        let unit: TextUnit = unit.parse()?;
        let ctx = TextContext::new(doc, options.character_options);
        let (pos, moved) = move_position_by(&ctx, self.end, unit, count, &options.word_options);
        self.set_end(doc, pos);
        Ok(moved)
    }

    /// Collapse, then move: to the end boundary for a forward move, to the
    /// start boundary for a backward one.
    pub fn move_(
        &mut self,
        doc: &Document,
        unit: &str,
        count: i64,
        options: &MoveOptions,
    ) -> Result<i64, TextError> {
        let unit: TextUnit = unit.parse()?;
        let from = if count < 0 { self.start } else { self.end };
        let ctx = TextContext::new(doc, options.character_options);
        let (pos, moved) = move_position_by(&ctx, from, unit, count, &options.word_options);
        self.start = pos;
        self.end = pos;
        Ok(moved)
    }

    /// Expand the range to whole-word boundaries. Returns whether either
    /// boundary moved.
    pub fn expand(
        &mut self,
        doc: &Document,
        unit: &str,
        options: &ExpandOptions,
    ) -> Result<bool, TextError> {
        match unit.parse()? {
            TextUnit::Character => Ok(false),
            TextUnit::Word => {
                let ctx = TextContext::new(doc, options.character_options);
                let (start, end, moved) = expand_to_word(&ctx, self.start, self.end, options);
                if moved {
                    self.start = start;
                    self.end = end;
                }
                Ok(moved)
            }
        }
    }

    /// Search for `term` and select the match on success. Forward searches
    /// start at the range end, backward ones at the range start; `wrap`
    /// retries once over the complementary portion of the scope.
    pub fn find_text(
        &mut self,
        doc: &Document,
        term: SearchTerm<'_>,
        options: &FindOptions,
    ) -> Result<bool, TextError> {
        let ctx = TextContext::new(doc, options.character_options);
        let scope = match options.within_range {
            Some(range) => (range.start(), range.end()),
            None => {
                let root = doc.root();
                (Position::new(root, 0), Position::new(root, doc.node_len(root)))
            }
        };
        let backward = options.direction == Direction::Backward;
        let from = if backward { self.start } else { self.end };

        let mut found = find_text_from_position(&ctx, from, term, options, scope)?;
        if found.is_none() && options.wrap {
            // Complementary portion of the scope, exactly once.
            let (wrapped_from, wrapped_scope) = if backward {
                (scope.1, (from, scope.1))
            } else {
                (scope.0, (scope.0, from))
            };
            found = find_text_from_position(&ctx, wrapped_from, term, options, wrapped_scope)?;
        }
        match found {
            Some((start, end)) => {
                self.start = start;
                self.end = end;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Select characters `[start_index, end_index)` of the container's
    /// visible text. Out-of-range indices clamp to the available characters.
    pub fn select_characters(
        &mut self,
        doc: &Document,
        container: Id,
        start_index: usize,
        end_index: usize,
    ) {
        let ctx = TextContext::new(doc, CharacterOptions::default());
        let bounds = TextRange::select_node_contents(doc, container);
        let mut iter = CharacterIterator::new(&ctx, bounds.start, false, Some(bounds.end));

        let mut start = bounds.start;
        let mut end = bounds.start;
        let mut count = 0usize;
        while let Some(tc) = iter.next() {
            count += 1;
            if count <= start_index {
                start = tc.pos;
            }
            if count <= end_index.max(start_index) {
                end = tc.pos;
            } else {
                break;
            }
        }
        if end_index <= start_index {
            end = start;
        }
        self.start = start;
        self.end = end;
    }

    /// The range's boundaries as character offsets relative to `container`.
    /// A boundary before the container yields a negative offset.
    pub fn to_character_range(&self, doc: &Document, container: Id) -> CharacterRange {
        let ctx = TextContext::new(doc, CharacterOptions::default());
        let origin = Position::new(container, 0);
        CharacterRange {
            start: signed_character_distance(&ctx, origin, self.start),
            end: signed_character_distance(&ctx, origin, self.end),
        }
    }
}

fn signed_character_distance(ctx: &TextContext<'_>, from: Position, to: Position) -> i64 {
    match compare_positions(ctx.doc(), from, to) {
        Ordering::Equal => 0,
        Ordering::Less => count_characters(ctx, from, to),
        Ordering::Greater => -count_characters(ctx, to, from),
    }
}

fn count_characters(ctx: &TextContext<'_>, from: Position, to: Position) -> i64 {
    let mut iter = CharacterIterator::new(ctx, from, false, Some(to));
    let mut count = 0;
    while iter.next().is_some() {
        count += 1;
    }
    count
}

/// The visible text of an element's entire contents.
pub fn inner_text(doc: &Document, element: Id) -> String {
    inner_text_with_options(doc, element, &CharacterOptions::default())
}

pub fn inner_text_with_options(
    doc: &Document,
    element: Id,
    options: &CharacterOptions,
) -> String {
    TextRange::select_node_contents(doc, element).text_with_options(doc, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::parse_document;

    #[test]
    fn boundary_ordering_is_maintained() {
        let doc = parse_document("<p>abcdef</p>");
        let t = doc.children(doc.children(doc.root())[0])[0];
        let mut range = TextRange::new(&doc, Position::new(t, 1), Position::new(t, 4));
        range.set_start(&doc, Position::new(t, 5));
        assert_eq!(range.start(), Position::new(t, 5));
        assert_eq!(range.end(), Position::new(t, 5));
        range.set_end(&doc, Position::new(t, 2));
        assert_eq!(range.start(), Position::new(t, 2));
        assert!(range.is_collapsed());
    }

    #[test]
    fn text_of_collapsed_range_is_empty() {
        let doc = parse_document("<p>abc</p>");
        let t = doc.children(doc.children(doc.root())[0])[0];
        let range = TextRange::collapsed_at(Position::new(t, 1));
        assert_eq!(range.text(&doc), "");
    }

    #[test]
    fn select_characters_and_back() {
        let doc = parse_document("<p>one two three</p>");
        let p = doc.children(doc.root())[0];
        let mut range = TextRange::collapsed_at(Position::new(p, 0));
        range.select_characters(&doc, p, 4, 7);
        assert_eq!(range.text(&doc), "two");
        let chars = range.to_character_range(&doc, p);
        assert_eq!(chars, CharacterRange { start: 4, end: 7 });
    }

    #[test]
    fn select_characters_clamps_out_of_range_indices() {
        let doc = parse_document("<p>abc</p>");
        let p = doc.children(doc.root())[0];
        let mut range = TextRange::collapsed_at(Position::new(p, 0));
        range.select_characters(&doc, p, 1, 99);
        assert_eq!(range.text(&doc), "bc");
        range.select_characters(&doc, p, 50, 99);
        assert_eq!(range.text(&doc), "");
    }

    #[test]
    fn character_range_is_negative_before_the_container() {
        let doc = parse_document("<p>abc</p><p>defg</p>");
        let p1 = doc.children(doc.root())[0];
        let p2 = doc.children(doc.root())[1];
        let t1 = doc.children(p1)[0];
        let range = TextRange::new(&doc, Position::new(t1, 1), Position::new(t1, 3));
        let chars = range.to_character_range(&doc, p2);
        // Between the range start and the container start lie "b", "c" and
        // the block break; between the range end and the container start,
        // only the break.
        assert_eq!(chars, CharacterRange { start: -3, end: -1 });
    }

    #[test]
    fn compare_point_classifies_positions() {
        let doc = parse_document("<p>abcdef</p>");
        let t = doc.children(doc.children(doc.root())[0])[0];
        let range = TextRange::new(&doc, Position::new(t, 2), Position::new(t, 4));
        assert_eq!(range.compare_point(&doc, Position::new(t, 1)), Ordering::Less);
        assert_eq!(range.compare_point(&doc, Position::new(t, 3)), Ordering::Equal);
        assert_eq!(range.compare_point(&doc, Position::new(t, 5)), Ordering::Greater);
    }
}
