use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    static ref RE_SPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref RE_PAREN_OPEN: Regex = Regex::new(r"\(\s+").unwrap();
    static ref RE_PAREN_CLOSE: Regex = Regex::new(r"\s+\)").unwrap();
    static ref RE_COMMA: Regex = Regex::new(r"\s*,\s*").unwrap();
    static ref RE_PLUS: Regex = Regex::new(r"\s*\+\s*").unwrap();
    static ref RE_SLASH: Regex = Regex::new(r"\s*/\s*").unwrap();
}

/// Normalize whitespace in dictionary text.
///
/// Collapses whitespace runs, removes spaces inside parentheses, and
/// normalizes the spacing around `,` `+` and `/`. Applying it twice gives the
/// same result as applying it once.
pub fn normalize_text(text: &str) -> String {
    let mut s = RE_SPACES.replace_all(text.trim(), " ").to_string();
    s = RE_PAREN_OPEN.replace_all(&s, "(").to_string();
    s = RE_PAREN_CLOSE.replace_all(&s, ")").to_string();
    s = RE_COMMA.replace_all(&s, ", ").to_string();
    s = RE_PLUS.replace_all(&s, " + ").to_string();
    s = RE_SLASH.replace_all(&s, "/").to_string();
    // A trailing ',' or '+' picks up a space above.
    s.trim().to_string()
}
