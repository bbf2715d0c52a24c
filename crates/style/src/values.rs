/// CSS `display` value, restricted to the variants the text model
/// distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    InlineTable,
    ListItem,
    None,
    Table,
    TableCaption,
    TableCell,
    TableColumn,
    TableColumnGroup,
    TableFooterGroup,
    TableHeaderGroup,
    TableRow,
    TableRowGroup,
}

impl Display {
    /// Inline-level content that participates in its parent's line boxes.
    pub fn is_inline_level(self) -> bool {
        matches!(
            self,
            Display::Inline | Display::InlineBlock | Display::InlineTable
        )
    }

    /// Displays whose element boundary implies a rendered line break.
    pub fn is_block_boundary(self) -> bool {
        matches!(
            self,
            Display::Block
                | Display::ListItem
                | Display::Table
                | Display::TableCaption
                | Display::TableFooterGroup
                | Display::TableHeaderGroup
                | Display::TableRow
                | Display::TableRowGroup
        )
    }
}

/// CSS `white-space` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhiteSpace {
    Normal,
    Nowrap,
    Pre,
    PreLine,
    PreWrap,
}

impl WhiteSpace {
    /// Whether runs of space/tab/CR/LF collapse to a single space.
    pub fn collapses_spaces(self) -> bool {
        matches!(self, WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine)
    }

    /// Whether embedded line breaks are preserved as rendered breaks.
    pub fn preserves_line_breaks(self) -> bool {
        matches!(self, WhiteSpace::Pre | WhiteSpace::PreWrap | WhiteSpace::PreLine)
    }
}

/// CSS `visibility` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

pub fn parse_display(value: &str) -> Option<Display> {
    match value.trim().to_ascii_lowercase().as_str() {
        "block" => Some(Display::Block),
        "inline" => Some(Display::Inline),
        "inline-block" => Some(Display::InlineBlock),
        "inline-table" => Some(Display::InlineTable),
        "list-item" => Some(Display::ListItem),
        "none" => Some(Display::None),
        "table" => Some(Display::Table),
        "table-caption" => Some(Display::TableCaption),
        "table-cell" => Some(Display::TableCell),
        "table-column" => Some(Display::TableColumn),
        "table-column-group" => Some(Display::TableColumnGroup),
        "table-footer-group" => Some(Display::TableFooterGroup),
        "table-header-group" => Some(Display::TableHeaderGroup),
        "table-row" => Some(Display::TableRow),
        "table-row-group" => Some(Display::TableRowGroup),
        _ => None, // unknown / unsupported -> ignored
    }
}

pub fn parse_white_space(value: &str) -> Option<WhiteSpace> {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(WhiteSpace::Normal),
        "nowrap" => Some(WhiteSpace::Nowrap),
        "pre" => Some(WhiteSpace::Pre),
        "pre-line" => Some(WhiteSpace::PreLine),
        "pre-wrap" => Some(WhiteSpace::PreWrap),
        _ => None,
    }
}

pub fn parse_visibility(value: &str) -> Option<Visibility> {
    match value.trim().to_ascii_lowercase().as_str() {
        "visible" => Some(Visibility::Visible),
        "hidden" => Some(Visibility::Hidden),
        "collapse" => Some(Visibility::Collapse),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_known_and_unknown() {
        assert_eq!(parse_display(" table-cell "), Some(Display::TableCell));
        assert_eq!(parse_display("INLINE"), Some(Display::Inline));
        assert_eq!(parse_display("flexish"), None);
    }

    #[test]
    fn white_space_classes() {
        assert!(parse_white_space("normal").unwrap().collapses_spaces());
        assert!(parse_white_space("pre-line").unwrap().collapses_spaces());
        assert!(!parse_white_space("pre").unwrap().collapses_spaces());
        assert!(parse_white_space("pre-line").unwrap().preserves_line_breaks());
        assert!(!parse_white_space("nowrap").unwrap().preserves_line_breaks());
    }
}
