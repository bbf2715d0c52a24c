use dom::{Document, Id};

use crate::error::TextError;
use crate::options::{ExpandOptions, MoveOptions};
use crate::range::{CharacterRange, TextRange};

/// A possibly multi-range selection. Operations apply the corresponding
/// range operation to every range and write the results back.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    ranges: Vec<TextRange>,
}

impl Selection {
    pub fn new() -> Self {
        Selection { ranges: Vec::new() }
    }

    pub fn from_range(range: TextRange) -> Self {
        Selection {
            ranges: vec![range],
        }
    }

    pub fn add_range(&mut self, range: TextRange) {
        self.ranges.push(range);
    }

    pub fn ranges(&self) -> &[TextRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Concatenated text of all ranges.
    pub fn text(&self, doc: &Document) -> String {
        self.ranges.iter().map(|r| r.text(doc)).collect()
    }

    /// Expand every range to whole-word boundaries. Returns whether any
    /// boundary moved.
    pub fn expand(
        &mut self,
        doc: &Document,
        unit: &str,
        options: &ExpandOptions,
    ) -> Result<bool, TextError> {
        let mut moved = false;
        for range in &mut self.ranges {
            moved |= range.expand(doc, unit, options)?;
        }
        Ok(moved)
    }

    /// Collapse-and-move every range. Returns the total units moved across
    /// ranges.
    pub fn move_(
        &mut self,
        doc: &Document,
        unit: &str,
        count: i64,
        options: &MoveOptions,
    ) -> Result<i64, TextError> {
        let mut total = 0;
        for range in &mut self.ranges {
            total += range.move_(doc, unit, count, options)?;
        }
        Ok(total)
    }

    /// Replace the selection with characters `[start_index, end_index)` of
    /// the container's visible text.
    pub fn select_characters(
        &mut self,
        doc: &Document,
        container: Id,
        start_index: usize,
        end_index: usize,
    ) {
        let mut range = TextRange::select_node_contents(doc, container);
        range.select_characters(doc, container, start_index, end_index);
        self.ranges = vec![range];
    }

    /// Capture every range as character offsets relative to `container`, in
    /// a form that survives tree-independent storage.
    pub fn save_character_ranges(&self, doc: &Document, container: Id) -> Vec<CharacterRange> {
        self.ranges
            .iter()
            .map(|r| r.to_character_range(doc, container))
            .collect()
    }

    /// Rebuild the selection from saved character offsets. Offsets before
    /// the container clamp to its first character.
    pub fn restore_character_ranges(
        &mut self,
        doc: &Document,
        container: Id,
        saved: &[CharacterRange],
    ) {
        self.ranges.clear();
        for chars in saved {
            let start = chars.start.max(0) as usize;
            let end = chars.end.max(0) as usize;
            let mut range = TextRange::select_node_contents(doc, container);
            range.select_characters(doc, container, start, end);
            self.ranges.push(range);
        }
    }
}
