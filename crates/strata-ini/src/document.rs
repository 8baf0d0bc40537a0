//! Parsed INI document and section-aware lookups.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::{interpolate, parser};

/// Name of the section whose keys are visible from every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Ordered key/value pairs of one section. Keys are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Entries(Vec<(String, String)>);

impl Entries {
    pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

/// An INI document read with configparser semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    defaults: Entries,
    sections: Vec<(String, Entries)>,
}

impl IniDocument {
    /// Parse a document from text.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = parser::parse(text)?;
        Ok(Self {
            defaults: parsed.defaults,
            sections: parsed.sections,
        })
    }

    /// Read and parse a document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document = Self::parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            sections = document.sections.len(),
            "Loaded INI document"
        );
        Ok(document)
    }

    /// Non-default section names, in file order.
    pub fn sections(&self) -> Vec<&str> {
        self.sections.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Whether a non-default section exists. `DEFAULT` is never reported.
    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    /// Key/value pairs of the `DEFAULT` section, raw.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults
            .0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Keys visible from `section`: its own, then inherited defaults.
    ///
    /// Returns `None` when the section does not exist.
    pub fn keys(&self, section: &str) -> Option<Vec<&str>> {
        let own = self.entries(section)?;
        let mut keys: Vec<&str> = own.keys().collect();
        if section != DEFAULT_SECTION {
            keys.extend(self.defaults.keys().filter(|key| own.get(key).is_none()));
        }
        Some(keys)
    }

    /// Uninterpolated value of `key` in `section`, falling back to `DEFAULT`.
    ///
    /// `None` if the section does not exist or the key is absent from both.
    pub fn raw_get(&self, section: &str, key: &str) -> Option<&str> {
        let own = self.entries(section)?;
        let key = key.to_lowercase();
        own.get(&key).or_else(|| self.defaults.get(&key))
    }

    /// Interpolated value of `key` in `section`, falling back to `DEFAULT`.
    ///
    /// Missing sections and keys are `Ok(None)`; malformed `%(name)s`
    /// references are errors.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.raw_get(section, key) else {
            return Ok(None);
        };
        let lookup = |name: &str| self.raw_get(section, name);
        interpolate::expand(section, &key.to_lowercase(), raw, &lookup).map(Some)
    }

    fn section(&self, section: &str) -> Option<&Entries> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, entries)| entries)
    }

    fn entries(&self, section: &str) -> Option<&Entries> {
        if section == DEFAULT_SECTION {
            Some(&self.defaults)
        } else {
            self.section(section)
        }
    }
}
