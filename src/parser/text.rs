use std::sync::LazyLock;

use regex::Regex;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{8,15}").unwrap());

pub const MAX_PHONES: usize = 3;
const PHONE_LABEL: &str = "Tel.";
const SEPARATOR: &str = " , ";
const MAX_SEPARATORS: usize = 3;

/// First `MAX_PHONES` runs of 8–15 digits, leftmost first.
pub fn extract_phones(text: &str) -> Vec<String> {
    PHONE_RE
        .find_iter(text)
        .take(MAX_PHONES)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Strip phone numbers, the first "Tel." label and up to three " , "
/// separators. Whatever whitespace is left over stays as is.
pub fn clean_address(text: &str) -> String {
    PHONE_RE
        .replace_all(text, "")
        .replacen(PHONE_LABEL, "", 1)
        .replacen(SEPARATOR, "", MAX_SEPARATORS)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
