pub mod computed;
pub mod values;

// Re-exports so other crates can just use `style::...` nicely.
pub use computed::{
    fix_table_display_quirk,
    parse_declarations,
    resolved_display,
    resolved_visibility,
    resolved_white_space,
    specified_value,
};
pub use values::{
    Display,
    Visibility,
    WhiteSpace,
    parse_display,
    parse_visibility,
    parse_white_space,
};
