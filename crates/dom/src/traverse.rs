use crate::{Document, Id};

/// Next node in document (pre-order) order.
pub fn following(doc: &Document, id: Id) -> Option<Id> {
    if let Some(&first) = doc.children(id).first() {
        return Some(first);
    }
    let mut current = id;
    loop {
        if let Some(sibling) = doc.next_sibling(current) {
            return Some(sibling);
        }
        current = doc.parent(current)?;
    }
}

/// Previous node in document (pre-order) order.
pub fn preceding(doc: &Document, id: Id) -> Option<Id> {
    match doc.previous_sibling(id) {
        Some(sibling) => Some(last_descendant_or_self(doc, sibling)),
        None => doc.parent(id),
    }
}

fn last_descendant_or_self(doc: &Document, id: Id) -> Id {
    let mut current = id;
    while let Some(&last) = doc.children(current).last() {
        current = last;
    }
    current
}

pub fn is_ancestor(doc: &Document, ancestor: Id, descendant: Id) -> bool {
    let mut current = doc.parent(descendant);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = doc.parent(id);
    }
    false
}

/// Chain of ids from the root down to `id`, inclusive.
pub fn path_from_root(doc: &Document, id: Id) -> Vec<Id> {
    let mut path = vec![id];
    let mut current = id;
    while let Some(parent) = doc.parent(current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
