//! Error types for strata-ini

use std::path::PathBuf;

/// Result type for strata-ini operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or querying an INI document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File contains no section headers (line {line}): {content:?}")]
    MissingSectionHeader { line: usize, content: String },

    #[error("Source contains parsing errors: {}", format_bad_lines(.lines))]
    Parse { lines: Vec<(usize, String)> },

    #[error("Section {section:?} already exists (line {line})")]
    DuplicateSection { section: String, line: usize },

    #[error("Option {key:?} in section {section:?} already exists (line {line})")]
    DuplicateOption {
        section: String,
        key: String,
        line: usize,
    },

    #[error("Bad interpolation in {section:?}/{key:?}: {message}")]
    InterpolationSyntax {
        section: String,
        key: String,
        message: String,
    },

    #[error("Bad value substitution in {section:?}/{key:?}: key {reference:?} not found")]
    InterpolationMissingOption {
        section: String,
        key: String,
        reference: String,
    },

    #[error("Recursion limit exceeded interpolating {section:?}/{key:?}")]
    InterpolationDepth { section: String, key: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_bad_lines(lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(number, line)| format!("[line {number:2}]: {line:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_lists_every_bad_line() {
        let error = Error::Parse {
            lines: vec![(3, "garbage".into()), (7, "more".into())],
        };
        let display = error.to_string();
        assert!(display.contains("[line  3]: \"garbage\""), "got: {display}");
        assert!(display.contains("[line  7]: \"more\""), "got: {display}");
    }
}
