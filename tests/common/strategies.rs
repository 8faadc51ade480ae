use proptest::prelude::*;

/// Plain text free of anything the sanitizer would touch
pub fn plain_text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?;:'\"()-]{0,40}"
}

/// Fragments that mix text, tags, entities, and stray angle brackets
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_text_strategy(),
        "<[a-z/ =\"]{0,8}>",
        Just("&nbsp;".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
        Just("&".to_string()),
        Just("&nb".to_string()),
        Just("sp;".to_string()),
    ]
}

/// Text with arbitrary markup interleaved
pub fn markup_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..12).prop_map(|parts| parts.concat())
}

/// One sheet cell; empty about a fifth of the time
fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        4 => "[a-z0-9]{1,6}",
    ]
}

/// A data row of up to three cells
pub fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(cell_strategy(), 0..=3)
}

/// A header row followed by data rows
pub fn sheet_rows_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(row_strategy(), 0..15).prop_map(|data| {
        let mut rows = vec![vec![
            "userID".to_string(),
            "submitDate".to_string(),
            "messageText".to_string(),
        ]];
        rows.extend(data);
        rows
    })
}
