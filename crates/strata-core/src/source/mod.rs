//! Value sources: leaf resolvers that look up raw values by option name.
//!
//! A source never fails just because it has no value: "not found" is the
//! [`Lookup::NotFound`] sentinel carrying a reason for diagnostics, so a
//! config can move on to the next source. Errors are reserved for sources
//! that are themselves broken (for example malformed interpolation in a
//! file).

mod env;
mod file;

pub use env::EnvironmentSource;
pub use file::FileSectionSource;

use std::fmt;

use crate::error::Result;
use crate::value::Value;

/// Outcome of a single source lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    /// The source has no value; the string says where it looked.
    NotFound(String),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound(_) => None,
        }
    }
}

/// Something that can look up a raw value for an option.
///
/// Implementations must be deterministic and free of side effects; the
/// `Display` output names the source in diagnostics.
pub trait ValueSource: fmt::Display {
    fn lookup(&self, name: &str, section: Option<&str>) -> Result<Lookup>;
}
