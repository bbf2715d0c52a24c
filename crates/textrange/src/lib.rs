//! A model of the visible text positions within a node tree.
//!
//! Given a document tree and resolved styles, this crate decides what
//! character (if any) exists at every point once collapsible whitespace,
//! hidden content, block-level line breaks, and inline trailing-space rules
//! are taken into account, and builds character/word boundary movement, text
//! search, and range/selection facades on top of that model.
//!
//! All state is scoped to one logical operation: facade calls construct a
//! [`TextContext`] internally, and its caches are discarded when the call
//! returns. The context borrows the document immutably, so the tree cannot
//! change under a live iterator.

pub mod chars;
pub mod iter;
pub mod mover;
pub mod search;
pub mod words;

mod context;
mod error;
mod options;
mod position;
mod range;
mod selection;
mod walker;

pub use crate::chars::CharKind;
pub use crate::context::TextContext;
pub use crate::error::TextError;
pub use crate::iter::{CharacterIterator, TextCharacter};
pub use crate::mover::{TextUnit, move_position_by};
pub use crate::options::{
    CharacterOptions,
    Direction,
    ExpandOptions,
    FindOptions,
    MoveOptions,
    WordOptions,
};
pub use crate::position::{Position, compare_positions};
pub use crate::range::{CharacterRange, TextRange, inner_text, inner_text_with_options};
pub use crate::search::{SearchTerm, find_text_from_position};
pub use crate::selection::Selection;
pub use crate::words::{Token, TokenizedTextProvider, default_tokenizer};
