//! Position stepping over the visible part of the tree.
//!
//! A node is collapsed (its entire subtree is skipped) when it is a comment,
//! is hidden via resolved display/visibility, or is a whitespace-only text
//! node sitting at a block boundary where it can never render. Stepping
//! never descends into a collapsed node; it lands on the position just past
//! the node's boundary instead.

use dom::{Document, Id, is_void_element};
use style::Display;

use crate::context::TextContext;
use crate::position::Position;

/// Whether positions exist inside the node: text nodes carry character
/// offsets, non-void elements carry child offsets.
pub(crate) fn contains_positions(doc: &Document, id: Id) -> bool {
    if doc.is_text(id) || doc.is_document(id) {
        return true;
    }
    match doc.tag_name(id) {
        Some(name) => !is_void_element(name),
        None => false,
    }
}

pub(crate) fn is_collapsed_node(ctx: &TextContext<'_>, id: Id) -> bool {
    let doc = ctx.doc();
    if doc.is_comment(id) {
        return true;
    }
    if doc.is_element(id) {
        let node_style = ctx.style(id);
        return node_style.display == Display::None
            || matches!(
                node_style.visibility,
                style::Visibility::Hidden | style::Visibility::Collapse
            );
    }
    if doc.is_text(id) {
        return is_collapsed_whitespace_node(ctx, id);
    }
    false
}

fn is_collapsible_ws(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t' | '\r' | '\u{0C}')
}

/// A whitespace-only text node is skipped entirely when it sits between
/// block boundaries; elsewhere the collapse rules decide its visibility
/// position by position.
fn is_collapsed_whitespace_node(ctx: &TextContext<'_>, id: Id) -> bool {
    let doc = ctx.doc();
    let Some(text) = doc.text(id) else {
        return false;
    };
    if text.is_empty() {
        return true;
    }
    if !text.chars().all(is_collapsible_ws) {
        return false;
    }
    let white_space = ctx.style(id).white_space;
    if !white_space.collapses_spaces() {
        return false;
    }
    // In pre-line the embedded line breaks render.
    if white_space.preserves_line_breaks() && text.chars().any(|c| c == '\n' || c == '\r') {
        return false;
    }
    block_boundary_side(ctx, id, false) && block_boundary_side(ctx, id, true)
}

fn block_boundary_side(ctx: &TextContext<'_>, id: Id, forward: bool) -> bool {
    let doc = ctx.doc();
    let mut sibling = if forward {
        doc.next_sibling(id)
    } else {
        doc.previous_sibling(id)
    };
    while let Some(s) = sibling {
        if doc.is_comment(s) || (doc.is_element(s) && ctx.style(s).display == Display::None) {
            sibling = if forward {
                doc.next_sibling(s)
            } else {
                doc.previous_sibling(s)
            };
            continue;
        }
        return doc.is_element(s) && !ctx.style(s).display.is_inline_level();
    }
    match doc.parent(id) {
        None => true,
        Some(p) => doc.is_document(p) || !ctx.style(p).display.is_inline_level(),
    }
}

/// Next position in document order, skipping collapsed subtrees.
pub(crate) fn next_position(ctx: &TextContext<'_>, pos: Position) -> Option<Position> {
    let doc = ctx.doc();
    let node = pos.node;
    if doc.is_text(node) {
        if pos.offset < doc.node_len(node) {
            return Some(Position::new(node, pos.offset + 1));
        }
        return step_out_forward(doc, node);
    }
    if let Some(child) = doc.child(node, pos.offset) {
        if !is_collapsed_node(ctx, child) && contains_positions(doc, child) {
            return Some(Position::new(child, 0));
        }
        return Some(Position::new(node, pos.offset + 1));
    }
    step_out_forward(doc, node)
}

/// Previous position in document order; exact inverse of [`next_position`].
pub(crate) fn previous_position(ctx: &TextContext<'_>, pos: Position) -> Option<Position> {
    let doc = ctx.doc();
    let node = pos.node;
    if pos.offset == 0 {
        let parent = doc.parent(node)?;
        let index = doc.index_in_parent(node)?;
        return Some(Position::new(parent, index));
    }
    if doc.is_text(node) {
        return Some(Position::new(node, pos.offset - 1));
    }
    let child = doc.child(node, pos.offset - 1)?;
    if !is_collapsed_node(ctx, child) && contains_positions(doc, child) {
        Some(Position::new(child, doc.node_len(child)))
    } else {
        Some(Position::new(node, pos.offset - 1))
    }
}

fn step_out_forward(doc: &Document, node: Id) -> Option<Position> {
    let parent = doc.parent(node)?;
    let index = doc.index_in_parent(node)?;
    Some(Position::new(parent, index + 1))
}

fn outermost_collapsed_ancestor(ctx: &TextContext<'_>, id: Id) -> Option<Id> {
    let doc = ctx.doc();
    let mut found = None;
    let mut current = Some(id);
    while let Some(node) = current {
        if is_collapsed_node(ctx, node) {
            found = Some(node);
        }
        current = doc.parent(node);
    }
    found
}

/// Adjust a position that sits inside a collapsed subtree to the nearest
/// visible position after it.
pub(crate) fn nearest_visible_forward(ctx: &TextContext<'_>, pos: Position) -> Option<Position> {
    match outermost_collapsed_ancestor(ctx, pos.node) {
        None => Some(pos),
        Some(collapsed) => step_out_forward(ctx.doc(), collapsed),
    }
}

/// Adjust a position that sits inside a collapsed subtree to the nearest
/// visible position before it.
pub(crate) fn nearest_visible_backward(ctx: &TextContext<'_>, pos: Position) -> Option<Position> {
    match outermost_collapsed_ancestor(ctx, pos.node) {
        None => Some(pos),
        Some(collapsed) => {
            let doc = ctx.doc();
            let parent = doc.parent(collapsed)?;
            let index = doc.index_in_parent(collapsed)?;
            Some(Position::new(parent, index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CharacterOptions;
    use dom::parse_document;

    fn walk_forward(ctx: &TextContext<'_>, mut pos: Position) -> Vec<Position> {
        let mut out = Vec::new();
        while let Some(next) = next_position(ctx, pos) {
            out.push(next);
            pos = next;
        }
        out
    }

    #[test]
    fn stepping_is_invertible() {
        let doc = parse_document("<div>ab<span>c</span></div><p>d</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let start = Position::new(doc.root(), 0);
        let forward = walk_forward(&ctx, start);
        let mut pos = *forward.last().unwrap();
        let mut backward = Vec::new();
        while let Some(prev) = previous_position(&ctx, pos) {
            backward.push(pos);
            pos = prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn skips_hidden_subtrees() {
        let doc = parse_document(r#"<div>a</div><div style="display:none">b<span>c</span></div>"#);
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let hidden = doc.children(doc.root())[1];
        let positions = walk_forward(&ctx, Position::new(doc.root(), 0));
        assert!(positions.iter().all(|p| p.node != hidden
            && !dom::traverse::is_ancestor(&doc, hidden, p.node)));
    }

    #[test]
    fn does_not_descend_into_void_elements() {
        let doc = parse_document("<div>a<br>b</div>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let div = doc.children(doc.root())[0];
        let br = doc.children(div)[1];
        let positions = walk_forward(&ctx, Position::new(doc.root(), 0));
        assert!(positions.iter().all(|p| p.node != br));
    }

    #[test]
    fn whitespace_between_blocks_is_collapsed() {
        let doc = parse_document("<p>1</p>\n<p>2</p>");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let ws = doc.children(doc.root())[1];
        assert!(doc.is_text(ws));
        assert!(is_collapsed_node(&ctx, ws));
    }

    #[test]
    fn whitespace_inside_inline_content_is_not_collapsed() {
        let doc = parse_document("a<span> </span>b");
        let ctx = TextContext::new(&doc, CharacterOptions::default());
        let span = doc.children(doc.root())[1];
        let ws = doc.children(span)[0];
        assert!(!is_collapsed_node(&ctx, ws));
    }
}
