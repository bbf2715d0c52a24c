use std::cell::RefCell;
use std::collections::HashMap;

use dom::{Document, Id};
use style::{Display, Visibility, WhiteSpace};

use crate::chars::{PossibleChar, ResolvedChar};
use crate::options::CharacterOptions;
use crate::position::Position;

/// Style values the text model dispatches on, resolved once per node per
/// transaction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeStyle {
    pub display: Display,
    pub white_space: WhiteSpace,
    pub visibility: Visibility,
}

/// Per-transaction state for one logical text operation.
///
/// Owns the memoization caches for character classification and style
/// resolution. The `&Document` borrow keeps the tree immutable for as long
/// as the context (and anything built on it) is alive; caches are discarded
/// with the context, never invalidated incrementally.
pub struct TextContext<'d> {
    doc: &'d Document,
    options: CharacterOptions,
    styles: RefCell<HashMap<Id, NodeStyle>>,
    possible: RefCell<HashMap<Position, Option<PossibleChar>>>,
    resolved: RefCell<HashMap<Position, Option<ResolvedChar>>>,
    inner_text: RefCell<HashMap<Id, bool>>,
}

impl<'d> TextContext<'d> {
    pub fn new(doc: &'d Document, options: CharacterOptions) -> Self {
        TextContext {
            doc,
            options,
            styles: RefCell::new(HashMap::new()),
            possible: RefCell::new(HashMap::new()),
            resolved: RefCell::new(HashMap::new()),
            inner_text: RefCell::new(HashMap::new()),
        }
    }

    pub fn doc(&self) -> &'d Document {
        self.doc
    }

    pub fn options(&self) -> &CharacterOptions {
        &self.options
    }

    pub(crate) fn style(&self, id: Id) -> NodeStyle {
        if let Some(&cached) = self.styles.borrow().get(&id) {
            return cached;
        }
        let resolved = NodeStyle {
            display: style::resolved_display(self.doc, id),
            white_space: style::resolved_white_space(self.doc, id),
            visibility: style::resolved_visibility(self.doc, id),
        };
        self.styles.borrow_mut().insert(id, resolved);
        resolved
    }

    pub(crate) fn cached_possible(&self, pos: Position) -> Option<Option<PossibleChar>> {
        self.possible.borrow().get(&pos).copied()
    }

    pub(crate) fn cache_possible(&self, pos: Position, value: Option<PossibleChar>) {
        self.possible.borrow_mut().insert(pos, value);
    }

    pub(crate) fn cached_resolved(&self, pos: Position) -> Option<Option<ResolvedChar>> {
        self.resolved.borrow().get(&pos).copied()
    }

    pub(crate) fn cache_resolved(&self, pos: Position, value: Option<ResolvedChar>) {
        self.resolved.borrow_mut().insert(pos, value);
    }

    pub(crate) fn cached_inner_text(&self, id: Id) -> Option<bool> {
        self.inner_text.borrow().get(&id).copied()
    }

    pub(crate) fn cache_inner_text(&self, id: Id, value: bool) {
        self.inner_text.borrow_mut().insert(id, value);
    }
}
