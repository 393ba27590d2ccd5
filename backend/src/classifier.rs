//! Structural extraction of one dictionary tab.
//!
//! The markup carries its meaning in short class names on `div`/`span`
//! elements: `b`/`ub` open a part of speech, `m` is a meaning, `e`/`em` an
//! example and its translation, `id`/`im` a phrase and its translation.

use ego_tree::{NodeId, NodeRef, Tree};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Node};

use crate::helpers::normalize_text;
use crate::types::{Entry, DEFAULT_PART};

lazy_static! {
    static ref RE_ROLE_MARKER: Regex = Regex::new(r"^[meidub]{1,2}$").unwrap();
}

/// Elements removed while keeping their children in place.
const UNWRAP_TAGS: [&str; 2] = ["ul", "li"];

/// Classes of the dedicated pronunciation element.
const PRONUNCIATION_CLASSES: [&str; 2] = ["p5l", "fl"];

/// Class of the headword element that sits next to the pronunciation text.
const WORD_CLASS: &str = "w";

/// Semantic role of a marked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// `b`, `ub`
    PartOfSpeech,
    /// `m`
    Meaning,
    /// `e`
    Example,
    /// `em`
    ExampleTranslation,
    /// `id`
    Phrase,
    /// `im`
    PhraseTranslation,
    /// A role marker with no extraction rule, such as `d`, `i` or `u`.
    Ignored,
}

impl Role {
    /// True if `class` has the shape of a role marker.
    pub fn is_marker(class: &str) -> bool {
        RE_ROLE_MARKER.is_match(class)
    }

    /// Classify an element by its class list.
    ///
    /// Returns `None` if no class is a role marker. With several markers the
    /// first match in the order `ub|b`, `m`, `e`, `em`, `id`, `im` wins.
    pub fn classify<'a, I>(classes: I) -> Option<Role>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let markers: Vec<&str> = classes.into_iter().filter(|c| Role::is_marker(c)).collect();
        if markers.is_empty() {
            return None;
        }

        let has = |name: &str| markers.contains(&name);

        let role = if has("ub") || has("b") {
            Role::PartOfSpeech
        } else if has("m") {
            Role::Meaning
        } else if has("e") {
            Role::Example
        } else if has("em") {
            Role::ExampleTranslation
        } else if has("id") {
            Role::Phrase
        } else if has("im") {
            Role::PhraseTranslation
        } else {
            Role::Ignored
        };

        Some(role)
    }
}

fn role_of(node: NodeRef<'_, Node>) -> Option<Role> {
    node.value().as_element().and_then(|el| Role::classify(el.classes()))
}

fn has_any_class(node: NodeRef<'_, Node>, names: &[&str]) -> bool {
    node.value()
        .as_element()
        .is_some_and(|el| el.classes().any(|c| names.contains(&c)))
}

fn node_text(node: NodeRef<'_, Node>) -> String {
    node.descendants()
        .filter_map(|n| n.value().as_text())
        .map(|t| &**t)
        .collect()
}

/// Move `node` to be the previous sibling of `anchor`.
fn move_before(tree: &mut Tree<Node>, anchor: NodeId, node: NodeId) {
    if let Some(mut n) = tree.get_mut(node) {
        n.detach();
    }
    if let Some(mut a) = tree.get_mut(anchor) {
        if a.parent().is_some() {
            a.insert_id_before(node);
        }
    }
}

/// Move `node` to be the next sibling of `anchor`.
fn move_after(tree: &mut Tree<Node>, anchor: NodeId, node: NodeId) {
    if let Some(mut n) = tree.get_mut(node) {
        n.detach();
    }
    if let Some(mut a) = tree.get_mut(anchor) {
        if a.parent().is_some() {
            a.insert_id_after(node);
        }
    }
}

/// Replace every `ul` and `li` element with its children.
fn unwrap_lists(doc: &mut Html) {
    let ids: Vec<NodeId> = doc.tree.root()
        .descendants()
        .filter(|n| {
            n.value()
                .as_element()
                .is_some_and(|el| UNWRAP_TAGS.contains(&el.name()))
        })
        .map(|n| n.id())
        .collect();

    for id in ids {
        let children: Vec<NodeId> = match doc.tree.get(id) {
            Some(n) if n.parent().is_some() => n.children().map(|c| c.id()).collect(),
            _ => continue,
        };
        for child in children {
            move_before(&mut doc.tree, id, child);
        }
        if let Some(mut n) = doc.tree.get_mut(id) {
            n.detach();
        }
    }
}

/// Pronunciation text of the tab, if any.
///
/// The dedicated `div.p5l.fl` element is preferred. Otherwise the `.w`
/// headword element is removed from the tree and the text left in its parent
/// is taken.
fn extract_pronunciation(doc: &mut Html) -> Option<String> {
    let root = doc.tree.root();

    let dedicated = root.descendants().find(|n| {
        n.value().as_element().is_some_and(|el| {
            el.name() == "div"
                && PRONUNCIATION_CLASSES.iter().all(|p| el.classes().any(|c| c == *p))
        })
    });
    if let Some(n) = dedicated {
        return Some(normalize_text(&node_text(n)));
    }

    let (word_id, parent_id) = {
        let w = root.descendants().find(|n| has_any_class(*n, &[WORD_CLASS]))?;
        (w.id(), w.parent()?.id())
    };

    if let Some(mut w) = doc.tree.get_mut(word_id) {
        w.detach();
    }

    doc.tree.get(parent_id).map(|p| normalize_text(&node_text(p)))
}

/// The container of the first role-marked element.
fn find_body(doc: &Html) -> Option<NodeId> {
    let marked = doc.tree.root().descendants().find(|n| role_of(*n).is_some())?;
    marked.parent().map(|p| p.id())
}

/// Lift `e`/`em` elements nested in a meaning up to be its next siblings,
/// keeping their document order.
fn hoist_examples(doc: &mut Html, body: NodeId) {
    let meanings: Vec<NodeId> = match doc.tree.get(body) {
        Some(b) => b.descendants()
            .skip(1)
            .filter(|n| has_any_class(*n, &["m"]))
            .map(|n| n.id())
            .collect(),
        None => return,
    };

    for m_id in meanings {
        let examples: Vec<NodeId> = match doc.tree.get(m_id) {
            Some(m) => m.descendants()
                .skip(1)
                .filter(|n| has_any_class(*n, &["e", "em"]))
                .map(|n| n.id())
                .collect(),
            None => continue,
        };

        for ex in examples.into_iter().rev() {
            move_after(&mut doc.tree, m_id, ex);
        }
    }
}

/// Walk state while visiting the marked elements of a body.
struct Cursor {
    part: String,
    meaning: String,
    example: String,
    /// An `e` was seen and not yet paired with an `em`.
    example_pending: bool,
    phrase: String,
}

impl Cursor {
    fn new() -> Self {
        Cursor {
            part: DEFAULT_PART.to_string(),
            meaning: DEFAULT_PART.to_string(),
            example: String::new(),
            example_pending: false,
            phrase: String::new(),
        }
    }

    /// Record an unpaired example with an empty translation.
    fn flush_example(&mut self, entry: &mut Entry) {
        if self.example_pending {
            entry.part_mut(&self.part)
                .meaning_mut(&self.meaning)
                .entry(self.example.clone())
                .or_default();
            self.example_pending = false;
        }
    }

    fn visit(&mut self, role: Role, text: String, entry: &mut Entry) {
        match role {
            Role::PartOfSpeech => {
                self.flush_example(entry);
                let label = text.to_lowercase().trim().to_string();
                self.part = if label.is_empty() { DEFAULT_PART.to_string() } else { label };
                entry.part_mut(&self.part);
            }
            Role::Meaning => {
                self.flush_example(entry);
                self.meaning = text;
                entry.part_mut(&self.part).meaning_mut(&self.meaning);
            }
            Role::Example => {
                self.flush_example(entry);
                self.example = text;
                self.example_pending = true;
            }
            Role::ExampleTranslation => {
                entry.part_mut(&self.part)
                    .meaning_mut(&self.meaning)
                    .insert(self.example.clone(), text);
                self.example_pending = false;
            }
            Role::Phrase => {
                self.phrase = text;
            }
            Role::PhraseTranslation => {
                entry.part_mut(&self.part)
                    .phrases
                    .insert(self.phrase.clone(), text);
            }
            Role::Ignored => {}
        }
    }
}

/// Parse one tab of restored markup and merge what it holds into `entry`.
///
/// Fragments of three characters or less are ignored. Text that isn't a
/// `div` container is treated as a single meaning. Existing parts, meanings
/// and the pronunciation of `entry` are kept; new content is added to them.
pub fn parse_section(markup: &str, mut entry: Entry) -> Entry {
    let content = markup.trim();
    if content.chars().count() <= 3 {
        return entry;
    }

    let html = if content.starts_with("<div") {
        content.to_string()
    } else {
        format!(r#"<div><div class="m">{}</div></div>"#, normalize_text(content))
    };

    let mut doc = Html::parse_fragment(&html);
    unwrap_lists(&mut doc);

    if let Some(pronunciation) = extract_pronunciation(&mut doc) {
        if entry.pronunciation.is_none() && !pronunciation.is_empty() {
            entry.pronunciation = Some(pronunciation);
        }
    }

    let Some(body) = find_body(&doc) else {
        tracing::trace!("No marked elements in section");
        return entry;
    };

    hoist_examples(&mut doc, body);

    let marked: Vec<(Role, String)> = match doc.tree.get(body) {
        Some(b) => b.descendants()
            .skip(1)
            .filter_map(|n| role_of(n).map(|role| (role, normalize_text(&node_text(n)))))
            .collect(),
        None => return entry,
    };

    if entry.parts.is_empty() {
        entry.part_mut(DEFAULT_PART);
    }

    let mut cursor = Cursor::new();
    for (role, text) in marked {
        cursor.visit(role, text, &mut entry);
    }
    cursor.flush_example(&mut entry);

    entry
}
