/// Collapses newlines, non-breaking spaces and whitespace runs to single spaces
pub fn clean_text(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gives a bare serving unit an explicit count ("servings" -> "1 servings")
pub fn normalize_portion(portion: &str) -> String {
    let portion = clean_text(portion);
    if portion.starts_with(|c: char| c.is_ascii_digit()) {
        portion
    } else {
        format!("1 {}", portion)
    }
}
