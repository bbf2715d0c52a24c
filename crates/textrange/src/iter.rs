use std::cmp::Ordering;

use crate::chars::resolved_char_before;
use crate::context::TextContext;
use crate::error::TextError;
use crate::position::{Position, compare_positions};
use crate::walker;

/// A rendered character together with the position just after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextCharacter {
    pub ch: char,
    pub pos: Position,
}

/// Lazy sequence of non-empty characters between two positions.
///
/// Going forward it yields the character before every visible position in
/// `(start, end]`; going backward, before every position in `(end, start]`,
/// nearest first. `rewind` un-consumes exactly the most recently returned
/// character; state releases when the iterator drops.
pub struct CharacterIterator<'c, 'd> {
    ctx: &'c TextContext<'d>,
    current: Option<Position>,
    end: Option<Position>,
    backward: bool,
    pending: Option<TextCharacter>,
    last: Option<TextCharacter>,
}

impl<'c, 'd> CharacterIterator<'c, 'd> {
    pub fn new(
        ctx: &'c TextContext<'d>,
        start: Position,
        backward: bool,
        end: Option<Position>,
    ) -> Self {
        // A start inside a collapsed subtree steps to the nearest visible
        // position so the walk stays on visible ground.
        let current = if backward {
            walker::nearest_visible_backward(ctx, start)
        } else {
            walker::nearest_visible_forward(ctx, start)
        };
        CharacterIterator {
            ctx,
            current,
            end,
            backward,
            pending: None,
            last: None,
        }
    }

    pub fn next(&mut self) -> Option<TextCharacter> {
        if let Some(pending) = self.pending.take() {
            self.last = Some(pending);
            return Some(pending);
        }
        let found = if self.backward {
            self.next_backward()
        } else {
            self.next_forward()
        };
        if found.is_some() {
            self.last = found;
        }
        found
    }

    fn next_forward(&mut self) -> Option<TextCharacter> {
        loop {
            let current = self.current?;
            let candidate = match walker::next_position(self.ctx, current) {
                Some(p) => p,
                None => {
                    self.current = None;
                    return None;
                }
            };
            if let Some(end) = self.end {
                if compare_positions(self.ctx.doc(), candidate, end) == Ordering::Greater {
                    self.current = None;
                    return None;
                }
            }
            self.current = Some(candidate);
            if let Some(resolved) = resolved_char_before(self.ctx, candidate) {
                return Some(TextCharacter {
                    ch: resolved.ch,
                    pos: candidate,
                });
            }
        }
    }

    fn next_backward(&mut self) -> Option<TextCharacter> {
        loop {
            let candidate = self.current?;
            if let Some(end) = self.end {
                if compare_positions(self.ctx.doc(), candidate, end) != Ordering::Greater {
                    self.current = None;
                    return None;
                }
            }
            self.current = walker::previous_position(self.ctx, candidate);
            if let Some(resolved) = resolved_char_before(self.ctx, candidate) {
                return Some(TextCharacter {
                    ch: resolved.ch,
                    pos: candidate,
                });
            }
        }
    }

    /// Un-consume the most recently returned character. Calling this twice
    /// without an intervening `next` is a programmer error.
    pub fn rewind(&mut self) -> Result<(), TextError> {
        match self.last.take() {
            Some(last) if self.pending.is_none() => {
                self.pending = Some(last);
                Ok(())
            }
            _ => Err(TextError::InvalidOperation(
                "rewind without a preceding next",
            )),
        }
    }
}
