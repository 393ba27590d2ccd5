//! TFlat stores its HTML with shortened tags. `restore()` expands them back,
//! `split()` cuts the restored text into the dictionary tabs.

use regex::Regex;
use lazy_static::lazy_static;

/// Separator between dictionary tabs.
pub const TAB_SEPARATOR: &str = "##";

/// Abbreviated tokens expanded by [`restore`].
pub const SHORT_TOKENS: [&str; 5] = ["<d1", "<d3>", "<a1", "<s1", "<s2>"];

lazy_static! {
    // The attribute value runs up to an optional closing quote, which the
    // shortened form sometimes leaves out.
    static ref RE_DIV_OPEN: Regex = Regex::new(r#"<d1([^"<>]*)"?"#).unwrap();
    static ref RE_ANCHOR_OPEN: Regex = Regex::new(r#"<a1([^"<>]*)"?"#).unwrap();
    static ref RE_SPAN_OPEN: Regex = Regex::new(r#"<s1([^"<>]*)"?"#).unwrap();
}

/// Expand the shortened tags into plain HTML.
///
/// - `<d1CLASS` → `<div class="CLASS"`
/// - `<d3>` → `</div></div></div>`
/// - `<a1HREF` → `<a href="HREF"`
/// - `<s1CLASS` → `<span class="CLASS"`
/// - `<s2>` → `</span></span>`
pub fn restore(html: &str) -> String {
    let s = RE_DIV_OPEN.replace_all(html, r#"<div class="$1""#);
    let s = RE_ANCHOR_OPEN.replace_all(&s, r#"<a href="$1""#);
    let s = RE_SPAN_OPEN.replace_all(&s, r#"<span class="$1""#);

    s.replace("<d3>", "</div></div></div>")
        .replace("<s2>", "</span></span>")
}

/// Split restored markup into its tabs, in source order.
pub fn split(text: &str) -> Vec<String> {
    text.split(TAB_SEPARATOR).map(|s| s.to_string()).collect()
}

/// Tabs of one dictionary record, by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSections {
    sections: Vec<String>,
}

impl TabSections {
    pub const PRIMARY: usize = 0;
    pub const ENG_ENG: usize = 1;
    pub const TECHNICAL: usize = 2;
    pub const SYNONYMS: usize = 3;
    pub const GRAMMAR: usize = 4;

    pub fn from_markup(text: &str) -> Self {
        TabSections { sections: split(text) }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|s| s.as_str())
    }

    pub fn primary(&self) -> &str {
        self.get(Self::PRIMARY).unwrap_or_default()
    }

    pub fn eng_eng(&self) -> Option<&str> {
        self.get(Self::ENG_ENG)
    }

    pub fn technical(&self) -> Option<&str> {
        self.get(Self::TECHNICAL)
    }

    pub fn synonyms(&self) -> Option<&str> {
        self.get(Self::SYNONYMS)
    }

    pub fn grammar(&self) -> Option<&str> {
        self.get(Self::GRAMMAR)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
