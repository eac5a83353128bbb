/// Quote `text` as a string literal. JSON string syntax is valid in both Rust
/// and TypeScript, so emitters use this for tags and names alike.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Up to 80 characters of `text` starting at byte `offset`, used to show where
/// a declaration failed to match.
pub fn fragment(text: &str, offset: usize) -> String {
    text.get(offset..)
        .unwrap_or_default()
        .chars()
        .take(80)
        .collect()
}
