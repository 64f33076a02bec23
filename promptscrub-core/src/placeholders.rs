//! Placeholder map: which replacement text stands in for each entity category.
//!
//! Lookups are case-insensitive. Categories the caller did not configure fall
//! back to the built-in defaults, and anything unknown becomes `[CATEGORY]`.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Built-in replacements, keyed by uppercase category.
const DEFAULT_PLACEHOLDERS: &[(&str, &str)] = &[
    ("PHONE", "[PHONE NUMBER]"),
    ("EMAIL", "[email@gmail.com]"),
    ("IP_ADDRESS", "[ran.ran.ip.addr]"),
    ("URL", "[example.com]"),
    ("CREDIT_CARD", "[CREDIT CARD]"),
    ("SSN", "[SSN]"),
    ("ADDRESS", "[ADDRESS]"),
    ("DATE", "[DATE]"),
    ("PER", "[PERSON]"),
    ("PERSON", "[PERSON]"),
    ("ORG", "[ORGANIZATION]"),
    ("ORGANIZATION", "[ORGANIZATION]"),
    ("LOC", "[LOCATION]"),
    ("LOCATION", "[LOCATION]"),
    ("GPE", "[LOCATION]"),
    ("MISC", "[MISC]"),
    ("MONEY", "[MONEY]"),
    ("PERCENT", "[PERCENT]"),
    ("TIME", "[TIME]"),
    ("CARDINAL", "[NUMBER]"),
    ("ORDINAL", "[NUMBER]"),
];

/// User-configured placeholder overrides layered over the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct PlaceholderMap {
    overrides: BTreeMap<String, String>,
}

impl PlaceholderMap {
    /// A map with no overrides: every lookup uses the defaults or the fallback.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Sets the replacement for `category`, replacing any earlier override.
    pub fn insert(&mut self, category: &str, replacement: impl Into<String>) {
        self.overrides.insert(category.to_uppercase(), replacement.into());
    }

    pub fn with(mut self, category: &str, replacement: impl Into<String>) -> Self {
        self.insert(category, replacement);
        self
    }

    /// Layers `other`'s overrides on top of this map's.
    pub fn extend(&mut self, other: &PlaceholderMap) {
        for (category, replacement) in &other.overrides {
            self.overrides.insert(category.clone(), replacement.clone());
        }
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// Replacement text for `category`.
    pub fn lookup(&self, category: &str) -> Cow<'_, str> {
        let key = category.to_uppercase();
        if let Some(custom) = self.overrides.get(&key) {
            return Cow::Borrowed(custom.as_str());
        }
        match DEFAULT_PLACEHOLDERS.iter().find(|(name, _)| *name == key) {
            Some((_, default)) => Cow::Borrowed(default),
            None => Cow::Owned(format!("[{}]", key)),
        }
    }
}

impl From<BTreeMap<String, String>> for PlaceholderMap {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let mut map = PlaceholderMap::default();
        for (category, replacement) in raw {
            map.insert(&category, replacement);
        }
        map
    }
}

impl From<PlaceholderMap> for BTreeMap<String, String> {
    fn from(map: PlaceholderMap) -> Self {
        map.overrides
    }
}
