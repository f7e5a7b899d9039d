//! Bulk name input splitting.

/// Split comma/newline separated text into trimmed, non-empty, unique tokens.
///
/// Order is preserved and the first occurrence of a repeated token wins.
/// `\r` from Windows line endings is removed by the trim.
pub fn split_bulk(raw: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in raw.split([',', '\n']).map(str::trim) {
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
