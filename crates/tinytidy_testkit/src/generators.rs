//! Property-based test generators using proptest.

use proptest::prelude::*;
use tinytidy_core::{OptionTable, OptionValue};

/// Boolean options in [`crate::RecordingEngine::new`]'s registry.
pub const BOOLEAN_OPTIONS: &[&str] = &[
    "indent",
    "markup",
    "add-xml-decl",
    "output-xhtml",
    "uppercase-tags",
];

/// Integer options in [`crate::RecordingEngine::new`]'s registry.
pub const INTEGER_OPTIONS: &[&str] = &["wrap", "tab-size"];

/// Text options in [`crate::RecordingEngine::new`]'s registry.
pub const TEXT_OPTIONS: &[&str] = &["doctype", "char-encoding", "alt-text"];

/// Strategy for short HTML-ish fragments, well formed or not.
pub fn html_fragment_strategy() -> impl Strategy<Value = Vec<u8>> {
    let piece = prop_oneof![
        Just("<p>".to_owned()),
        Just("</p>".to_owned()),
        Just("<b>".to_owned()),
        Just("</i>".to_owned()),
        Just("<br>".to_owned()),
        Just("&amp;".to_owned()),
        Just("<title>Foo</title>".to_owned()),
        "[a-zA-Z0-9 ]{0,12}",
    ];
    prop::collection::vec(piece, 0..16).prop_map(|pieces| pieces.concat().into_bytes())
}

/// Strategy for option names no stock registry knows.
pub fn unknown_option_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("x-[a-z]{1,12}(-[a-z]{1,8})?").expect("Invalid regex")
}

/// Strategy for a boolean option name.
pub fn boolean_option_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(BOOLEAN_OPTIONS)
}

/// Strategy for a text option name.
pub fn text_option_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(TEXT_OPTIONS)
}

/// Strategy for tables the stock registry accepts in full.
pub fn valid_table_strategy() -> impl Strategy<Value = OptionTable> {
    let boolean = (
        boolean_option_strategy(),
        prop_oneof![
            any::<bool>().prop_map(OptionValue::Boolean),
            (0i64..=1).prop_map(OptionValue::Integer),
        ],
    );
    let integer = (
        prop::sample::select(INTEGER_OPTIONS),
        (0i64..=200).prop_map(OptionValue::Integer),
    );
    let entry = prop_oneof![boolean, integer];
    prop::collection::vec(entry, 0..6).prop_map(|entries| entries.into_iter().collect())
}
