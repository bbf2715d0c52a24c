//! End-to-end properties of the text model, exercised through the public
//! range and selection facades over parsed documents.

use dom::parse_document;
use textrange::{
    Direction,
    ExpandOptions,
    FindOptions,
    MoveOptions,
    Position,
    SearchTerm,
    TextRange,
    inner_text,
};

#[test]
fn whitespace_collapses_round_trip() {
    let doc = parse_document("<div>1  2</div>");
    let div = doc.children(doc.root())[0];
    assert_eq!(inner_text(&doc, div), "1 2");

    let doc = parse_document(r#"<div style="white-space: pre">1  2</div>"#);
    let div = doc.children(doc.root())[0];
    assert_eq!(inner_text(&doc, div), "1  2");
}

#[test]
fn block_join_produces_single_breaks() {
    let doc = parse_document("<p>1</p><p>2</p>");
    assert_eq!(inner_text(&doc, doc.root()), "1\n2");

    // A hidden paragraph contributes nothing, and no stray blank line.
    let doc = parse_document(r#"<p>1</p><p style="display:none">2</p><p>3</p>"#);
    assert_eq!(inner_text(&doc, doc.root()), "1\n3");
}

#[test]
fn expand_is_idempotent_on_whole_word_ranges() {
    let doc = parse_document("<p>one two three</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];

    let mut range = TextRange::new(&doc, Position::new(t, 4), Position::new(t, 7));
    let moved = range.expand(&doc, "word", &ExpandOptions::default()).unwrap();
    assert!(!moved);
    assert_eq!(range.start(), Position::new(t, 4));
    assert_eq!(range.end(), Position::new(t, 7));
    assert_eq!(range.text(&doc), "two");
}

#[test]
fn repeated_character_moves_track_offsets_without_collapsing() {
    let doc = parse_document("<p>abcdef</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];
    let options = MoveOptions::default();

    for k in 0..=6u32 {
        let mut range = TextRange::collapsed_at(Position::new(t, 0));
        for _ in 0..k {
            let moved = range.move_start(&doc, "character", 1, &options).unwrap();
            assert_eq!(moved, 1);
        }
        assert_eq!(range.start(), Position::new(t, k));
    }
}

#[test]
fn word_boundary_movement_selects_the_word() {
    let doc = parse_document("<p>one two three</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];
    let options = MoveOptions::default();

    let mut range = TextRange::collapsed_at(Position::new(t, 5));
    let moved = range.move_start(&doc, "word", -1, &options).unwrap();
    assert_eq!(moved, -1);
    assert_eq!(range.start(), Position::new(t, 4));

    let moved = range.move_end(&doc, "word", 1, &options).unwrap();
    assert_eq!(moved, 1);
    assert_eq!(range.end(), Position::new(t, 7));
    assert_eq!(range.text(&doc), "two");
}

#[test]
fn table_cells_separate_with_tabs_and_rows_with_breaks() {
    let doc = parse_document(
        "<table><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>",
    );
    assert_eq!(inner_text(&doc, doc.root()), "1\t2\n3\t4");
}

#[test]
fn whole_word_search_rejects_substrings() {
    let doc = parse_document("<p>concatenate</p>");
    let p = doc.children(doc.root())[0];

    let whole_words = FindOptions {
        whole_words_only: true,
        ..FindOptions::default()
    };
    let mut range = TextRange::collapsed_at(Position::new(p, 0));
    let found = range
        .find_text(&doc, SearchTerm::Literal("cat"), &whole_words)
        .unwrap();
    assert!(!found);

    let mut range = TextRange::collapsed_at(Position::new(p, 0));
    let found = range
        .find_text(&doc, SearchTerm::Literal("cat"), &FindOptions::default())
        .unwrap();
    assert!(found);
    assert_eq!(range.text(&doc), "cat");
}

#[test]
fn apostrophes_are_internal_to_word_tokens() {
    let doc = parse_document("<p>one don't two</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];
    let options = MoveOptions::default();

    // From the start boundary of "two", one word back is the start of
    // "don't": the internal apostrophe does not split the token.
    let mut range = TextRange::collapsed_at(Position::new(t, 10));
    let moved = range.move_start(&doc, "word", -1, &options).unwrap();
    assert_eq!(moved, -1);
    assert_eq!(range.start(), Position::new(t, 4));

    range.collapse(true);
    let moved = range.move_end(&doc, "word", 1, &options).unwrap();
    assert_eq!(moved, 1);
    assert_eq!(range.text(&doc), "don't");
}

#[test]
fn search_wraps_once_over_the_complementary_scope() {
    let doc = parse_document("<p>alpha beta</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];

    // Start past "alpha": a forward search only finds it by wrapping.
    let no_wrap = FindOptions::default();
    let mut range = TextRange::collapsed_at(Position::new(t, 8));
    assert!(!range
        .find_text(&doc, SearchTerm::Literal("alpha"), &no_wrap)
        .unwrap());

    let wrap = FindOptions {
        wrap: true,
        ..FindOptions::default()
    };
    let mut range = TextRange::collapsed_at(Position::new(t, 8));
    assert!(range
        .find_text(&doc, SearchTerm::Literal("alpha"), &wrap)
        .unwrap());
    assert_eq!(range.text(&doc), "alpha");
}

#[test]
fn find_text_searches_forward_from_the_range_end() {
    let doc = parse_document("<p>cat and cat</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];

    let mut range = TextRange::collapsed_at(Position::new(t, 0));
    assert!(range
        .find_text(&doc, SearchTerm::Literal("cat"), &FindOptions::default())
        .unwrap());
    assert_eq!(range.start(), Position::new(t, 0));
    assert_eq!(range.end(), Position::new(t, 3));

    // Searching again from the match end finds the next occurrence.
    assert!(range
        .find_text(&doc, SearchTerm::Literal("cat"), &FindOptions::default())
        .unwrap());
    assert_eq!(range.start(), Position::new(t, 8));
    assert_eq!(range.end(), Position::new(t, 11));
}

#[test]
fn backward_search_from_a_range_start() {
    let doc = parse_document("<p>cat and cat</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];

    let options = FindOptions {
        direction: Direction::Backward,
        ..FindOptions::default()
    };
    let mut range = TextRange::collapsed_at(Position::new(t, 7));
    assert!(range
        .find_text(&doc, SearchTerm::Literal("cat"), &options)
        .unwrap());
    assert_eq!(range.start(), Position::new(t, 0));
    assert_eq!(range.end(), Position::new(t, 3));
}

#[test]
fn hidden_content_is_invisible_to_search() {
    let doc = parse_document(r#"<p>aa<span style="display:none">cat</span>bb</p>"#);
    let p = doc.children(doc.root())[0];

    let mut range = TextRange::collapsed_at(Position::new(p, 0));
    assert!(!range
        .find_text(&doc, SearchTerm::Literal("cat"), &FindOptions::default())
        .unwrap());
    assert_eq!(inner_text(&doc, p), "aabb");
}

#[test]
fn expand_trims_whitespace_when_asked() {
    let doc = parse_document("<p>one two three</p>");
    let p = doc.children(doc.root())[0];
    let t = doc.children(p)[0];

    let trim = ExpandOptions {
        trim: true,
        word_options: textrange::WordOptions {
            include_trailing_space: true,
            ..textrange::WordOptions::default()
        },
        ..ExpandOptions::default()
    };
    let mut range = TextRange::new(&doc, Position::new(t, 5), Position::new(t, 6));
    assert!(range.expand(&doc, "word", &trim).unwrap());
    assert_eq!(range.text(&doc), "two");
}
