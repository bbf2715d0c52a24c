use std::cmp::Ordering;

use dom::{Document, Id, traverse};

/// A point in the tree: `(node, offset)`.
///
/// For a text node the offset is a character index (`0..=len`); for a
/// container node it is a child index (`0..=child_count`). Positions are
/// value objects and do not own nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: Id,
    pub offset: u32,
}

impl Position {
    pub fn new(node: Id, offset: u32) -> Self {
        Position { node, offset }
    }
}

/// Document-order comparison of two boundary points, with the usual DOM
/// Range semantics: a container position compares against a descendant by
/// the child index it sits next to.
pub fn compare_positions(doc: &Document, a: Position, b: Position) -> Ordering {
    if a.node == b.node {
        return a.offset.cmp(&b.offset);
    }
    let path_a = traverse::path_from_root(doc, a.node);
    let path_b = traverse::path_from_root(doc, b.node);
    let mut i = 0;
    while i < path_a.len() && i < path_b.len() && path_a[i] == path_b[i] {
        i += 1;
    }
    if i == path_a.len() {
        // a.node is an ancestor of b.node.
        let child_index = doc.index_in_parent(path_b[i]).unwrap_or(0);
        if a.offset <= child_index {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    } else if i == path_b.len() {
        let child_index = doc.index_in_parent(path_a[i]).unwrap_or(0);
        if b.offset <= child_index {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    } else {
        let index_a = doc.index_in_parent(path_a[i]).unwrap_or(0);
        let index_b = doc.index_in_parent(path_b[i]).unwrap_or(0);
        index_a.cmp(&index_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::parse_document;

    #[test]
    fn same_node_compares_by_offset() {
        let doc = parse_document("<p>abc</p>");
        let p = doc.children(doc.root())[0];
        let t = doc.children(p)[0];
        assert_eq!(
            compare_positions(&doc, Position::new(t, 1), Position::new(t, 2)),
            Ordering::Less
        );
        assert_eq!(
            compare_positions(&doc, Position::new(t, 2), Position::new(t, 2)),
            Ordering::Equal
        );
    }

    #[test]
    fn container_vs_descendant() {
        let doc = parse_document("<div><span>x</span><span>y</span></div>");
        let div = doc.children(doc.root())[0];
        let span2 = doc.children(div)[1];
        let t2 = doc.children(span2)[0];

        // (div, 1) sits before everything inside the second span.
        assert_eq!(
            compare_positions(&doc, Position::new(div, 1), Position::new(t2, 0)),
            Ordering::Less
        );
        // (div, 2) sits after it.
        assert_eq!(
            compare_positions(&doc, Position::new(div, 2), Position::new(t2, 1)),
            Ordering::Greater
        );
    }

    #[test]
    fn sibling_subtrees_compare_by_child_index() {
        let doc = parse_document("<p>a</p><p>b</p>");
        let p1 = doc.children(doc.root())[0];
        let p2 = doc.children(doc.root())[1];
        let t1 = doc.children(p1)[0];
        let t2 = doc.children(p2)[0];
        assert_eq!(
            compare_positions(&doc, Position::new(t1, 1), Position::new(t2, 0)),
            Ordering::Less
        );
    }
}
