//! Casing aware identifiers. A [`Name`] is a list of pieces, each remembering the casing it was
//! created with, rendered in one of the supported casings only when asked for.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConversionError;

static LOWER_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(_[a-z0-9]+)*$").unwrap());
static UPPER_CAMEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());
static LOWER_CAMEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").unwrap());
static ANY_CAMEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaseFormat {
    LowerUnderscore,
    LowerCamel,
    UpperCamel,
    Acronym,
}

#[derive(Clone, Debug)]
struct NamePiece {
    identifier: String,
    case: CaseFormat,
}

impl NamePiece {
    fn capitalized(&self) -> String {
        let lower = self.identifier.to_ascii_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// Identifier made of one or more pieces. Equality and hashing use the lower underscore form, so
/// `Name::from(&["ip_address"])` equals `Name::any_camel(&["IPAddress"])`.
#[derive(Clone, Debug)]
pub struct Name {
    pieces: Vec<NamePiece>,
}

impl Name {
    /// Creates a name from lower underscore fragments.
    pub fn from(fragments: &[&str]) -> Result<Name, ConversionError> {
        let mut pieces = Vec::new();
        for fragment in fragments {
            if !LOWER_UNDERSCORE.is_match(fragment) {
                return Err(ConversionError::format(&format!(
                    "Name fragment '{}' is not lower underscore",
                    fragment
                )));
            }
            pieces.extend(fragment.split('_').map(|p| NamePiece {
                identifier: p.to_owned(),
                case: CaseFormat::LowerUnderscore,
            }));
        }
        Ok(Name { pieces })
    }

    /// Creates a name from upper camel fragments like `FooBar`.
    pub fn upper_camel(fragments: &[&str]) -> Result<Name, ConversionError> {
        Name::camel(fragments, &UPPER_CAMEL, "upper camel")
    }

    /// Creates a name from lower camel fragments like `fooBar`.
    pub fn lower_camel(fragments: &[&str]) -> Result<Name, ConversionError> {
        Name::camel(fragments, &LOWER_CAMEL, "lower camel")
    }

    /// Creates a name from fragments in either camel casing. Runs of capitals are kept together as
    /// acronyms, the last capital of a run starts the next word when it is followed by a lower case
    /// letter, so `IPAddress` becomes `IP` and `Address`.
    pub fn any_camel(fragments: &[&str]) -> Result<Name, ConversionError> {
        Name::camel(fragments, &ANY_CAMEL, "camel")
    }

    fn camel(fragments: &[&str], pattern: &Regex, casing: &str) -> Result<Name, ConversionError> {
        let mut pieces = Vec::new();
        for fragment in fragments {
            if !pattern.is_match(fragment) {
                return Err(ConversionError::format(&format!(
                    "Name fragment '{}' is not {}",
                    fragment, casing
                )));
            }
            pieces.extend(split_camel(fragment));
        }
        Ok(Name { pieces })
    }

    /// Appends the pieces of other, each keeps its own casing.
    pub fn join(&self, other: &Name) -> Name {
        let mut pieces = self.pieces.clone();
        pieces.extend(other.pieces.iter().cloned());
        Name { pieces }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn to_lower_underscore(&self) -> String {
        self.pieces
            .iter()
            .map(|p| p.identifier.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn to_upper_underscore(&self) -> String {
        self.to_lower_underscore().to_ascii_uppercase()
    }

    /// Like [`Name::to_lower_underscore`] but with the first letter in upper case.
    pub fn to_capitalized_lower_underscore(&self) -> String {
        let lower = self.to_lower_underscore();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn to_upper_camel(&self) -> String {
        self.pieces.iter().map(NamePiece::capitalized).collect()
    }

    pub fn to_lower_camel(&self) -> String {
        let mut result = String::new();
        for (i, piece) in self.pieces.iter().enumerate() {
            if i == 0 {
                result.push_str(&piece.identifier.to_ascii_lowercase());
            } else {
                result.push_str(&piece.capitalized());
            }
        }
        result
    }

    /// Upper camel, but acronym pieces stay a squashed upper case block, `IPAddress` stays as is.
    pub fn to_upper_camel_keep_acronyms(&self) -> String {
        self.pieces
            .iter()
            .map(|p| match p.case {
                CaseFormat::Acronym => p.identifier.clone(),
                _ => p.capitalized(),
            })
            .collect()
    }
}

fn split_camel(fragment: &str) -> Vec<NamePiece> {
    let chars: Vec<char> = fragment.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let previous = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let after_lower = previous.is_ascii_lowercase() || previous.is_ascii_digit();
            let ends_acronym = previous.is_ascii_uppercase() && next_is_lower;
            if (after_lower || ends_acronym) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(*c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .into_iter()
        .map(|w| {
            let capitals = w.chars().filter(|c| c.is_ascii_uppercase()).count();
            let case = if capitals > 1 && !w.chars().any(|c| c.is_ascii_lowercase()) {
                CaseFormat::Acronym
            } else if w.starts_with(|c: char| c.is_ascii_uppercase()) {
                CaseFormat::UpperCamel
            } else {
                CaseFormat::LowerCamel
            };
            NamePiece {
                identifier: w,
                case,
            }
        })
        .collect()
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.to_lower_underscore() == other.to_lower_underscore()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_lower_underscore().hash(state)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_lower_underscore())
    }
}

/// Splits any identifier on the characters a [`Name`] can't hold, `foo-bar.baz` gives `foo`, `bar`
/// and `baz`.
pub fn identifier_fragments(identifier: &str) -> Vec<&str> {
    identifier
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Crude english singular, enough for resource collection names like `instances` or `policies`.
pub fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_owned();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_owned();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_owned(),
        _ => word.to_owned(),
    }
}
