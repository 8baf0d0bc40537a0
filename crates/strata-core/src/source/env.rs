use std::collections::HashMap;
use std::env::{self, VarError};
use std::fmt;

use super::{Lookup, ValueSource};
use crate::error::Result;
use crate::value::Value;

/// Looks options up in environment variables named `PREFIX` + `NAME`,
/// uppercased. Sections are ignored.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    prefix: String,
    /// Fixed variables used instead of the process environment.
    vars: Option<HashMap<String, String>>,
}

impl EnvironmentSource {
    /// Read the process environment with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the process environment with a variable name prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            vars: None,
        }
    }

    /// Read from a fixed set of variables instead of the process environment.
    ///
    /// Variable names are used as given; lookups still uppercase
    /// `prefix + name`.
    pub fn from_vars<K, V>(prefix: impl Into<String>, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            vars: Some(
                vars.into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The variable consulted for an option name.
    pub fn variable_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name).to_uppercase()
    }
}

impl fmt::Display for EnvironmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvironmentSource(prefix: {:?})", self.prefix)
    }
}

impl ValueSource for EnvironmentSource {
    fn lookup(&self, name: &str, _section: Option<&str>) -> Result<Lookup> {
        let variable = self.variable_name(name);
        let found = match &self.vars {
            Some(vars) => vars.get(&variable).cloned().ok_or(VarError::NotPresent),
            None => env::var(&variable),
        };

        Ok(match found {
            Ok(value) => Lookup::Found(Value::Str(value)),
            Err(VarError::NotPresent) => {
                Lookup::NotFound(format!("{self} could not find {variable} in environment"))
            }
            Err(VarError::NotUnicode(_)) => {
                Lookup::NotFound(format!("{self} found {variable} but it is not valid unicode"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_prefixed_and_uppercased() {
        let source = EnvironmentSource::with_prefix("app_");
        assert_eq!(source.variable_name("port"), "APP_PORT");
        assert_eq!(EnvironmentSource::new().variable_name("User"), "USER");
    }

    #[test]
    fn test_finds_fixed_variables_ignoring_section() {
        let source = EnvironmentSource::from_vars("", [("OPTION3", "spam")]);
        assert_eq!(
            source.lookup("option3", Some("anything")).unwrap(),
            Lookup::Found(Value::from("spam"))
        );
    }

    #[test]
    fn test_missing_variable_is_not_found_with_reason() {
        let source = EnvironmentSource::from_vars("X_", [("OTHER", "1")]);
        match source.lookup("port", None).unwrap() {
            Lookup::NotFound(reason) => assert!(reason.contains("X_PORT"), "got: {reason}"),
            found => panic!("expected not found, got {found:?}"),
        }
    }

    #[test]
    fn test_fixed_variables_are_matched_exactly() {
        let source = EnvironmentSource::from_vars("", [("user", "lower")]);
        assert!(!source.lookup("user", None).unwrap().is_found());
    }

    #[test]
    fn test_reads_the_process_environment() {
        // Cargo sets this for every test binary it runs.
        let Ok(expected) = env::var("CARGO_MANIFEST_DIR") else {
            return;
        };
        let source = EnvironmentSource::with_prefix("cargo_");
        assert_eq!(
            source.lookup("manifest_dir", None).unwrap().found(),
            Some(Value::Str(expected))
        );
    }
}
