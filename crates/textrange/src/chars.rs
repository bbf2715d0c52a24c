//! Character resolution at a position.
//!
//! Every position classifies to at most one *possible* character: the raw
//! character before it in a text node, or whitespace synthesized at an
//! element boundary (a `<br>` line break, a block boundary line break, a
//! table-cell separator). Possible characters are provisional; resolution
//! decides whether they actually render.
//!
//! Resolution is position-local and memoized. The backward question ("is
//! there a previously rendered character, and is it whitespace?") recurses
//! through resolved characters and terminates at the document start. The
//! forward question ("what possibly follows?") scans possible characters
//! only, never resolved ones, which keeps resolution cycle-free.

use dom::Id;
use style::{Display, WhiteSpace};

use crate::context::TextContext;
use crate::position::Position;
use crate::walker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharKind {
    /// Finalized, not subject to collapsing.
    NonSpace,
    /// Finalized whitespace: a `<br>` line break, preserved `pre` spacing.
    UncollapsibleSpace,
    /// Provisional; may collapse depending on its neighbors.
    CollapsibleSpace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CharSource {
    /// A raw character from a text node with collapsing white-space.
    Text,
    /// A raw character from a text node with preserved white-space.
    PreText,
    /// The line break produced by a `<br>` element.
    Br,
    /// A line break synthesized at a block boundary.
    SynthBlock,
    /// A tab synthesized at a table-cell boundary.
    SynthTab,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PossibleChar {
    pub ch: char,
    pub kind: CharKind,
    pub(crate) source: CharSource,
}

impl PossibleChar {
    fn new(ch: char, kind: CharKind, source: CharSource) -> Self {
        PossibleChar { ch, kind, source }
    }

    /// Definitely non-empty regardless of neighbors.
    pub(crate) fn is_definite(self) -> bool {
        matches!(self.kind, CharKind::NonSpace | CharKind::UncollapsibleSpace)
    }
}

/// A character that survived resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedChar {
    pub ch: char,
    pub(crate) source: CharSource,
}

fn is_collapsible_ws(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t' | '\r' | '\u{0C}')
}

/// Whitespace as the model renders it. NBSP is intentionally excluded: a
/// collapsible space after an NBSP still renders.
fn is_rendered_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// The provisional character immediately before `pos`, before any collapse
/// decisions. Rules, in order: a text offset reads the raw character; an
/// element offset reads the previous sibling's `<br>` break or trailing
/// space; offset zero of an element reads the element's own leading space.
pub(crate) fn possible_char_before(ctx: &TextContext<'_>, pos: Position) -> Option<PossibleChar> {
    if let Some(cached) = ctx.cached_possible(pos) {
        return cached;
    }
    let result = compute_possible(ctx, pos);
    ctx.cache_possible(pos, result);
    result
}

fn compute_possible(ctx: &TextContext<'_>, pos: Position) -> Option<PossibleChar> {
    let doc = ctx.doc();
    let node = pos.node;

    if doc.is_text(node) {
        if pos.offset == 0 {
            return None;
        }
        let c = doc.text_char_at(node, pos.offset - 1)?;
        return Some(classify_text_char(c, ctx.style(node).white_space));
    }

    if !doc.is_element(node) && !doc.is_document(node) {
        return None;
    }

    if pos.offset > 0 {
        let child = doc.child(node, pos.offset - 1)?;
        if doc.is_element(child) && !walker::is_collapsed_node(ctx, child) {
            if doc.is_element_named(child, "br") {
                return Some(PossibleChar::new('\n', CharKind::UncollapsibleSpace, CharSource::Br));
            }
            return trailing_space_of(ctx, child);
        }
        return None;
    }

    // Offset zero: the leading edge of the element itself.
    if doc.is_element(node) && !walker::is_collapsed_node(ctx, node) {
        return leading_space_of(ctx, node);
    }
    None
}

fn classify_text_char(c: char, white_space: WhiteSpace) -> PossibleChar {
    match white_space {
        WhiteSpace::Pre | WhiteSpace::PreWrap => {
            if c == '\n' || c == '\r' {
                PossibleChar::new('\n', CharKind::UncollapsibleSpace, CharSource::PreText)
            } else if is_collapsible_ws(c) {
                PossibleChar::new(c, CharKind::UncollapsibleSpace, CharSource::PreText)
            } else {
                PossibleChar::new(c, CharKind::NonSpace, CharSource::Text)
            }
        }
        WhiteSpace::PreLine => {
            if c == '\n' || c == '\r' {
                PossibleChar::new('\n', CharKind::UncollapsibleSpace, CharSource::PreText)
            } else if is_collapsible_ws(c) {
                PossibleChar::new(' ', CharKind::CollapsibleSpace, CharSource::Text)
            } else {
                PossibleChar::new(c, CharKind::NonSpace, CharSource::Text)
            }
        }
        WhiteSpace::Normal | WhiteSpace::Nowrap => {
            if is_collapsible_ws(c) {
                PossibleChar::new(' ', CharKind::CollapsibleSpace, CharSource::Text)
            } else {
                PossibleChar::new(c, CharKind::NonSpace, CharSource::Text)
            }
        }
    }
}

/// The synthesized character at an element's trailing edge: a block-boundary
/// line break when the element has inner text, a tab for a table cell.
/// Inline elements delegate to their own last visible child.
fn trailing_space_of(ctx: &TextContext<'_>, el: Id) -> Option<PossibleChar> {
    let doc = ctx.doc();
    if doc.is_element_named(el, "br") {
        return Some(PossibleChar::new('\n', CharKind::UncollapsibleSpace, CharSource::Br));
    }
    match ctx.style(el).display {
        Display::Inline => {
            for &child in doc.children(el).iter().rev() {
                if doc.is_comment(child) || walker::is_collapsed_node(ctx, child) {
                    continue;
                }
                if doc.is_element(child) {
                    return trailing_space_of(ctx, child);
                }
                // Text content contributes positionally, not at the boundary.
                return None;
            }
            None
        }
        Display::InlineBlock
        | Display::InlineTable
        | Display::None
        | Display::TableColumn
        | Display::TableColumnGroup => None,
        Display::TableCell => Some(PossibleChar::new(
            '\t',
            CharKind::CollapsibleSpace,
            CharSource::SynthTab,
        )),
        _ => {
            if has_inner_text(ctx, el) {
                Some(PossibleChar::new(
                    '\n',
                    CharKind::CollapsibleSpace,
                    CharSource::SynthBlock,
                ))
            } else {
                None
            }
        }
    }
}

/// The synthesized character at an element's leading edge. Cell separators
/// are synthesized from the trailing edge only.
fn leading_space_of(ctx: &TextContext<'_>, el: Id) -> Option<PossibleChar> {
    match ctx.style(el).display {
        Display::Inline
        | Display::InlineBlock
        | Display::InlineTable
        | Display::None
        | Display::TableCell
        | Display::TableColumn
        | Display::TableColumnGroup => None,
        _ => {
            if has_inner_text(ctx, el) {
                Some(PossibleChar::new(
                    '\n',
                    CharKind::CollapsibleSpace,
                    CharSource::SynthBlock,
                ))
            } else {
                None
            }
        }
    }
}

/// Whether some position inside `el` holds a definitely non-empty possible
/// character. An element with no inner text contributes no boundary breaks.
pub(crate) fn has_inner_text(ctx: &TextContext<'_>, el: Id) -> bool {
    if let Some(cached) = ctx.cached_inner_text(el) {
        return cached;
    }
    let doc = ctx.doc();
    let end = Position::new(el, doc.node_len(el));
    let mut pos = Position::new(el, 0);
    let mut result = false;
    while let Some(next) = walker::next_position(ctx, pos) {
        if crate::position::compare_positions(doc, next, end) == std::cmp::Ordering::Greater {
            break;
        }
        if possible_char_before(ctx, next).is_some_and(PossibleChar::is_definite) {
            result = true;
            break;
        }
        pos = next;
    }
    ctx.cache_inner_text(el, result);
    result
}

/// The rendered character immediately before `pos`, after collapse
/// resolution. Memoized per transaction; deterministic for an immutable
/// tree.
pub(crate) fn resolved_char_before(ctx: &TextContext<'_>, pos: Position) -> Option<ResolvedChar> {
    if let Some(cached) = ctx.cached_resolved(pos) {
        return cached;
    }
    let result = match possible_char_before(ctx, pos) {
        None => None,
        Some(p) => match (p.kind, p.source) {
            (CharKind::NonSpace, _) => Some(ResolvedChar {
                ch: p.ch,
                source: p.source,
            }),
            (CharKind::UncollapsibleSpace, CharSource::Br) => resolve_br(ctx, pos),
            (CharKind::UncollapsibleSpace, _) => Some(ResolvedChar {
                ch: p.ch,
                source: p.source,
            }),
            (CharKind::CollapsibleSpace, CharSource::SynthBlock) => resolve_block_break(ctx, pos),
            (CharKind::CollapsibleSpace, CharSource::SynthTab) => resolve_cell_tab(ctx, pos),
            (CharKind::CollapsibleSpace, _) => resolve_space(ctx, pos),
        },
    };
    ctx.cache_resolved(pos, result);
    result
}

/// The nearest rendered character strictly before `pos`.
fn previous_rendered_char(ctx: &TextContext<'_>, pos: Position) -> Option<ResolvedChar> {
    let mut current = pos;
    while let Some(prev) = walker::previous_position(ctx, current) {
        if let Some(r) = resolved_char_before(ctx, prev) {
            return Some(r);
        }
        current = prev;
    }
    None
}

/// Whether any definitely non-empty possible character follows `pos`.
fn definite_follows(ctx: &TextContext<'_>, pos: Position) -> bool {
    let mut current = pos;
    while let Some(next) = walker::next_position(ctx, current) {
        if possible_char_before(ctx, next).is_some_and(PossibleChar::is_definite) {
            return true;
        }
        current = next;
    }
    false
}

/// A collapsible text space renders only after a rendered non-space
/// character, and its refinement depends on what possibly follows: a `<br>`
/// break, a block boundary break, or a preserved `pre-line` break each put
/// it under the corresponding `CharacterOptions` flag.
fn resolve_space(ctx: &TextContext<'_>, pos: Position) -> Option<ResolvedChar> {
    match previous_rendered_char(ctx, pos) {
        None => return None,
        Some(prev) if is_rendered_space(prev.ch) => return None,
        Some(_) => {}
    }
    let options = *ctx.options();
    let space = |included: bool| {
        included.then_some(ResolvedChar {
            ch: ' ',
            source: CharSource::Text,
        })
    };
    let mut current = pos;
    while let Some(next) = walker::next_position(ctx, current) {
        if let Some(p) = possible_char_before(ctx, next) {
            return match (p.kind, p.source) {
                // Part of the same collapsible run; look further.
                (CharKind::CollapsibleSpace, CharSource::Text) => {
                    current = next;
                    continue;
                }
                // A cell boundary collapses its trailing space.
                (CharKind::CollapsibleSpace, CharSource::SynthTab) => None,
                (CharKind::CollapsibleSpace, CharSource::SynthBlock) => {
                    if definite_follows(ctx, next) {
                        space(options.include_block_content_trailing_space)
                    } else {
                        None
                    }
                }
                (CharKind::UncollapsibleSpace, CharSource::Br) => {
                    space(options.include_space_before_br)
                }
                (CharKind::UncollapsibleSpace, CharSource::PreText) if p.ch == '\n' => {
                    space(options.include_pre_line_trailing_space)
                }
                _ => space(true),
            };
        }
        current = next;
    }
    None
}

/// A block boundary line break renders between rendered content on both
/// sides, and merges into an immediately preceding synthesized or `<br>`
/// break. Literal `pre` line breaks never merge.
fn resolve_block_break(ctx: &TextContext<'_>, pos: Position) -> Option<ResolvedChar> {
    if !definite_follows(ctx, pos) {
        return None;
    }
    match previous_rendered_char(ctx, pos) {
        None => None,
        Some(prev)
            if prev.ch == '\n' && matches!(prev.source, CharSource::SynthBlock | CharSource::Br) =>
        {
            None
        }
        Some(_) => Some(ResolvedChar {
            ch: '\n',
            source: CharSource::SynthBlock,
        }),
    }
}

/// A cell separator renders only when real content follows it before the
/// next line break: no tab before a row boundary or at the end of content.
fn resolve_cell_tab(ctx: &TextContext<'_>, pos: Position) -> Option<ResolvedChar> {
    let mut current = pos;
    while let Some(next) = walker::next_position(ctx, current) {
        if let Some(p) = possible_char_before(ctx, next) {
            return match (p.kind, p.source) {
                (CharKind::CollapsibleSpace, CharSource::Text)
                | (CharKind::CollapsibleSpace, CharSource::SynthTab) => {
                    current = next;
                    continue;
                }
                (CharKind::CollapsibleSpace, CharSource::SynthBlock) => None,
                (CharKind::UncollapsibleSpace, _) if p.ch == '\n' => None,
                _ => Some(ResolvedChar {
                    ch: '\t',
                    source: CharSource::SynthTab,
                }),
            };
        }
        current = next;
    }
    None
}

/// A `<br>` break renders unless it is immediately followed by a collapsible
/// space that is itself at the trailing edge of a block; the break collapses
/// instead of the space.
fn resolve_br(ctx: &TextContext<'_>, pos: Position) -> Option<ResolvedChar> {
    let mut current = pos;
    while let Some(next) = walker::next_position(ctx, current) {
        if let Some(p) = possible_char_before(ctx, next) {
            if p.kind == CharKind::CollapsibleSpace
                && p.source == CharSource::Text
                && is_trailing_space_in_block(ctx, next)
            {
                return None;
            }
            break;
        }
        current = next;
    }
    Some(ResolvedChar {
        ch: '\n',
        source: CharSource::Br,
    })
}

fn is_trailing_space_in_block(ctx: &TextContext<'_>, pos: Position) -> bool {
    let mut current = pos;
    while let Some(next) = walker::next_position(ctx, current) {
        if let Some(p) = possible_char_before(ctx, next) {
            return match (p.kind, p.source) {
                (CharKind::CollapsibleSpace, CharSource::Text) => {
                    current = next;
                    continue;
                }
                (CharKind::CollapsibleSpace, CharSource::SynthBlock)
                | (CharKind::CollapsibleSpace, CharSource::SynthTab) => true,
                _ => false,
            };
        }
        current = next;
    }
    true
}
