//! Fully resolved, immutable copies of a config's values.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::value::Value;

/// Option name to value, for one section.
pub type SectionMap = BTreeMap<String, Value>;

/// Every option value of a config, resolved at one point in time.
///
/// Keyed by section (`None` is the default section) and then option name.
/// Later changes to the config do not affect a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    sections: BTreeMap<Option<String>, SectionMap>,
    /// Section used by [`Snapshot::get`].
    section: Option<String>,
}

impl Snapshot {
    pub(crate) fn new(sections: BTreeMap<Option<String>, SectionMap>) -> Self {
        Self {
            sections,
            section: None,
        }
    }

    /// The same snapshot with a different section for [`Snapshot::get`].
    pub fn with_section(mut self, section: Option<&str>) -> Self {
        self.section = section.map(str::to_string);
        self
    }

    /// Value of `name` in the snapshot's section.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_in(name, self.section.as_deref())
    }

    pub fn get_in(&self, name: &str, section: Option<&str>) -> Option<&Value> {
        self.section(section)?.get(name)
    }

    /// All values of one section.
    pub fn section(&self, section: Option<&str>) -> Option<&SectionMap> {
        self.sections.get(&section.map(str::to_string))
    }

    /// The whole two-level mapping.
    pub fn as_map(&self) -> &BTreeMap<Option<String>, SectionMap> {
        &self.sections
    }

    /// Number of resolved options across all sections.
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pretty-printed JSON form, see the `Serialize` impl.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialized as `{"default": {...}, "sections": {"name": {...}}}`.
impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            default: &'a SectionMap,
            sections: BTreeMap<&'a str, &'a SectionMap>,
        }

        let empty = SectionMap::new();
        View {
            default: self.sections.get(&None).unwrap_or(&empty),
            sections: self
                .sections
                .iter()
                .filter_map(|(name, values)| name.as_deref().map(|name| (name, values)))
                .collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut sections = BTreeMap::new();
        sections.insert(
            None,
            BTreeMap::from([("option1".to_string(), Value::Int(1))]),
        );
        sections.insert(
            Some("OTHER".to_string()),
            BTreeMap::from([("option4".to_string(), Value::from("yes"))]),
        );
        Snapshot::new(sections)
    }

    #[test]
    fn test_get_uses_the_default_section() {
        let snapshot = sample();
        assert_eq!(snapshot.get("option1"), Some(&Value::Int(1)));
        assert_eq!(snapshot.get("option4"), None);
        assert_eq!(snapshot.get_in("option4", Some("OTHER")), Some(&Value::from("yes")));
    }

    #[test]
    fn test_with_section_changes_get() {
        let snapshot = sample().with_section(Some("OTHER"));
        assert_eq!(snapshot.get("option4"), Some(&Value::from("yes")));
    }

    #[test]
    fn test_counts_options_across_sections() {
        assert_eq!(sample().len(), 2);
        assert!(Snapshot::default().is_empty());
    }

    #[test]
    fn test_serializes_default_and_named_sections_apart() {
        let json: serde_json::Value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "default": {"option1": 1},
                "sections": {"OTHER": {"option4": "yes"}}
            })
        );
    }
}
