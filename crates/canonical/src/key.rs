/// Lowercases `text` and drops every character that is not an ASCII letter
/// or digit. The result contains no spaces, so keys built from several
/// stripped values can be joined with a space without ambiguity.
pub fn strip_key(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
