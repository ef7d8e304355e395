//! Dotenv-style text parsing.
//!
//! The format is deliberately minimal: one `KEY=VALUE` pair per line, blank
//! lines and `#` comments ignored, no quoting or escaping. Malformed lines
//! are skipped rather than rejected, so a partially edited file still loads
//! whatever is well-formed.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// An immutable, key-ordered mapping of configuration keys to values.
///
/// A fresh `ConfigMap` is produced by each parse and installed into the
/// [`SnapshotStore`](crate::SnapshotStore) as the current snapshot. Keys are
/// unique; iteration is in ascending key order, which keeps diff reporting
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: BTreeMap<String, String>,
}

impl ConfigMap {
    /// Parse dotenv-style text into a map.
    ///
    /// Lines are trimmed; empty lines and lines whose first non-whitespace
    /// character is `#` are skipped. Each remaining line is split at the
    /// first `=`, with key and value trimmed. Lines without `=` contribute
    /// nothing. Duplicate keys: the last occurrence wins.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();
                entries.insert(key.to_string(), value.to_string());
            }
        }

        Self { entries }
    }

    /// An empty map, used as the snapshot before the first load.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize back to `KEY=VALUE` lines, one per entry, in key order.
    ///
    /// Parsing the output reproduces an equivalent map for any well-formed
    /// input (comments and blank lines are not preserved).
    #[must_use]
    pub fn to_dotenv(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<(String, String)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
