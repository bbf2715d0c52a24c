use dom::{Document, Id};

use crate::values::{
    Display,
    Visibility,
    WhiteSpace,
    parse_display,
    parse_visibility,
    parse_white_space,
};

/// Parse the declarations of an inline `style` attribute.
///
/// Property names come back lowercase; unknown or malformed declarations are
/// dropped (CSS: unknown declarations are ignored).
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for declaration in style.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        if !name.is_empty() && !value.is_empty() {
            out.push((name, value));
        }
    }
    out
}

/// The specified value of `property` from a node's inline style, if any.
pub fn specified_value(doc: &Document, id: Id, property: &str) -> Option<String> {
    let style = doc.attribute(id, "style")?;
    parse_declarations(style)
        .into_iter()
        .rev() // last declaration wins
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

fn default_display_for(tag: &str) -> Display {
    match tag.to_ascii_lowercase().as_str() {
        "a" | "abbr" | "b" | "bdi" | "bdo" | "big" | "br" | "cite" | "code" | "em" | "i"
        | "img" | "kbd" | "mark" | "q" | "s" | "samp" | "small" | "span" | "strong" | "sub"
        | "sup" | "time" | "u" | "var" | "wbr" => Display::Inline,
        "button" | "input" | "select" | "textarea" => Display::InlineBlock,
        "li" => Display::ListItem,
        "table" => Display::Table,
        "caption" => Display::TableCaption,
        "td" | "th" => Display::TableCell,
        "col" => Display::TableColumn,
        "colgroup" => Display::TableColumnGroup,
        "tfoot" => Display::TableFooterGroup,
        "thead" => Display::TableHeaderGroup,
        "tr" => Display::TableRow,
        "tbody" => Display::TableRowGroup,
        "head" | "link" | "meta" | "script" | "style" | "title" => Display::None,
        _ => Display::Block,
    }
}

fn default_white_space_for(tag: &str) -> Option<WhiteSpace> {
    match tag.to_ascii_lowercase().as_str() {
        "pre" | "textarea" => Some(WhiteSpace::Pre),
        "nobr" => Some(WhiteSpace::Nowrap),
        _ => None,
    }
}

/// Correct the table-structural default-display quirk.
///
/// Some style resolvers report `block` for table-structural elements whose
/// effective layout display is the table-internal value (`table-row`,
/// `table-cell`, ...). The text model needs the effective value to synthesize
/// cell and row separators, so a `block` resolution on a table-structural tag
/// is mapped back to the tag's correct default.
pub fn fix_table_display_quirk(tag: &str, display: Display) -> Display {
    if display != Display::Block {
        return display;
    }
    match tag.to_ascii_lowercase().as_str() {
        "table" => Display::Table,
        "caption" => Display::TableCaption,
        "td" | "th" => Display::TableCell,
        "col" => Display::TableColumn,
        "colgroup" => Display::TableColumnGroup,
        "tfoot" => Display::TableFooterGroup,
        "thead" => Display::TableHeaderGroup,
        "tr" => Display::TableRow,
        "tbody" => Display::TableRowGroup,
        _ => display,
    }
}

/// Resolved `display` for a node. Text and comment nodes resolve to the
/// inline level of their surrounding content; failed lookups resolve to the
/// tag default rather than erroring.
pub fn resolved_display(doc: &Document, id: Id) -> Display {
    let Some(tag) = doc.tag_name(id) else {
        return if doc.is_document(id) {
            Display::Block
        } else {
            Display::Inline
        };
    };
    let display = specified_value(doc, id, "display")
        .and_then(|v| parse_display(&v))
        .unwrap_or_else(|| default_display_for(tag));
    fix_table_display_quirk(tag, display)
}

/// Resolved `white-space` for a node. Inherited: the nearest ancestor with a
/// specified or tag-default value wins; the initial value is `normal`.
pub fn resolved_white_space(doc: &Document, id: Id) -> WhiteSpace {
    let mut current = Some(id);
    while let Some(node) = current {
        if doc.is_element(node) {
            if let Some(ws) = specified_value(doc, node, "white-space")
                .and_then(|v| parse_white_space(&v))
            {
                return ws;
            }
            if let Some(ws) = doc.tag_name(node).and_then(default_white_space_for) {
                return ws;
            }
        }
        current = doc.parent(node);
    }
    WhiteSpace::Normal
}

/// Resolved `visibility` for a node. Inherited; the initial value is
/// `visible`.
pub fn resolved_visibility(doc: &Document, id: Id) -> Visibility {
    let mut current = Some(id);
    while let Some(node) = current {
        if doc.is_element(node) {
            if let Some(v) = specified_value(doc, node, "visibility")
                .and_then(|v| parse_visibility(&v))
            {
                return v;
            }
        }
        current = doc.parent(node);
    }
    Visibility::Visible
}
