//! Simplified HTML parser with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`. Attribute
//! names use the same ASCII character class. This is not an HTML5 parser; the
//! constraint keeps tokenization fast and allocation-light, which is all the
//! text model needs to build documents in code and tests.
//!
//! Known limitations (intentional):
//! - No spec parse-error recovery; mismatched end tags pop to the nearest
//!   matching open element.
//! - Entity decoding covers the named entities the text model cares about
//!   plus decimal/hex numeric references.
//! - Rawtext close-tag scanning for `<script>`/`<style>` accepts only ASCII
//!   whitespace before `>`.

use memchr::memchr;

use crate::{Document, Id, NodeKind};

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

#[derive(Debug)]
enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

// Only attempts matches starting at ASCII '<'; '<' cannot appear in UTF-8
// continuation bytes, so byte scanning stays on char boundaries.
fn find_rawtext_close_tag(haystack: &str, tag: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len {
        let rel = memchr(b'<', &bytes[i..])?;
        i += rel;
        if i + 2 + tag.len() > len {
            return None;
        }
        if bytes[i + 1] == b'/' && starts_with_ignore_ascii_case_at(bytes, i + 2, tag.as_bytes()) {
            let mut k = i + 2 + tag.len();
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';').filter(|&i| i <= 16) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| {
                    if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        num.parse::<u32>().ok()
                    }
                })
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            // Collect text until the next '<'. Slice endpoints land on ASCII
            // structural bytes only, so they remain UTF-8 boundaries.
            let start = i;
            i += memchr(b'<', &bytes[i..]).unwrap_or(bytes.len() - i);
            let text = decode_entities(&input[start..i]);
            if !text.is_empty() {
                out.push(Token::Text(text));
            }
            continue;
        }
        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            match input[body_start..].find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + HTML_COMMENT_END.len();
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    break;
                }
            }
            continue;
        }
        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            match rest.find('>') {
                Some(end) => {
                    out.push(Token::Doctype(rest[..end].trim().to_string()));
                    i += 2 + end + 1;
                }
                None => break,
            }
            continue;
        }
        // End tag.
        if i + 2 <= bytes.len() && bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < bytes.len() && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            while j < bytes.len() && bytes[j] != b'>' {
                j += 1;
            }
            if j < bytes.len() {
                j += 1;
            }
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            i = j;
            continue;
        }
        // Start tag.
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && is_name_byte(bytes[j]) {
            j += 1;
        }
        if j == start {
            // Bare '<' in text.
            out.push(Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let name = input[start..j].to_ascii_lowercase();
        let (attributes, self_closing, after) = scan_attributes(input, j);
        i = after;

        let is_rawtext = name == "script" || name == "style";
        let self_closing = self_closing || is_void_element(&name);
        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        if is_rawtext && !self_closing {
            match find_rawtext_close_tag(&input[i..], &name) {
                Some((text_end, close_end)) => {
                    if text_end > 0 {
                        out.push(Token::Text(input[i..i + text_end].to_string()));
                    }
                    out.push(Token::EndTag(name));
                    i += close_end;
                }
                None => {
                    if i < input.len() {
                        out.push(Token::Text(input[i..].to_string()));
                    }
                    out.push(Token::EndTag(name));
                    break;
                }
            }
        }
    }
    out
}

fn scan_attributes(input: &str, mut i: usize) -> (Vec<(String, Option<String>)>, bool, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
            }
            _ => {
                let name_start = i;
                while i < len && is_name_byte(bytes[i]) {
                    i += 1;
                }
                if i == name_start {
                    // Unparseable byte inside a tag; skip it.
                    i += 1;
                    continue;
                }
                let name = input[name_start..i].to_ascii_lowercase();
                while i < len && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let value = if i < len && bytes[i] == b'=' {
                    i += 1;
                    while i < len && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                        let quote = bytes[i];
                        i += 1;
                        let value_start = i;
                        i += memchr(quote, &bytes[i..]).unwrap_or(len - i);
                        let value = decode_entities(&input[value_start..i]);
                        if i < len {
                            i += 1;
                        }
                        Some(value)
                    } else {
                        let value_start = i;
                        while i < len
                            && !bytes[i].is_ascii_whitespace()
                            && bytes[i] != b'>'
                            && bytes[i] != b'/'
                        {
                            i += 1;
                        }
                        Some(decode_entities(&input[value_start..i]))
                    }
                } else {
                    None
                };
                attributes.push((name, value));
            }
        }
    }
    (attributes, self_closing, i)
}

/// Parse an HTML-subset string into a document tree.
///
/// Whitespace-only text nodes are preserved; the text model's collapsing
/// rules decide their visibility, not the parser.
pub fn parse_document(input: &str) -> Document {
    let tokens = tokenize(input);
    log::trace!(target: "dom.parser", "tokenized {} tokens from {} bytes", tokens.len(), input.len());

    let mut doc = Document::new();
    let mut open_elements: Vec<(Id, String)> = Vec::new();

    for token in tokens {
        let parent = open_elements.last().map(|(id, _)| *id).unwrap_or(doc.root());
        match token {
            Token::Doctype(s) => doc.set_doctype(s),
            Token::Comment(text) => {
                doc.append_child(parent, NodeKind::Comment { text });
            }
            Token::Text(text) => {
                doc.append_child(parent, NodeKind::Text { text });
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let id = doc.append_child(
                    parent,
                    NodeKind::Element {
                        name: name.clone(),
                        attributes,
                    },
                );
                if !self_closing {
                    open_elements.push((id, name));
                }
            }
            Token::EndTag(name) => {
                if open_elements.iter().any(|(_, n)| *n == name) {
                    while let Some((_, open_name)) = open_elements.pop() {
                        if open_name == name {
                            break;
                        }
                    }
                }
            }
        }
    }
    doc
}
