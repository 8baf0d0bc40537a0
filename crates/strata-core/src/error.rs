//! Error types for strata-core

/// Result type for strata-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building configs or resolving option values
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No option with this name and section exists anywhere in the chain
    #[error("Undefined option {}", describe(.name, .section))]
    UndefinedOption {
        name: String,
        section: Option<String>,
    },

    /// The option exists but no source, explicit value or default produced a value
    #[error("Could not read value of {} after {} attempt(s)", describe(.name, .section), .attempts.len())]
    UnassignedOption {
        name: String,
        section: Option<String>,
        attempts: Vec<String>,
    },

    /// The config was asked to resolve locally but has no value sources attached
    #[error("Config {config} has no value sources attached")]
    NoDirectResolvers { config: String },

    /// The option is not owned directly by the config asked to resolve it
    #[error("Config {config} does not own option {}", describe(.name, .section))]
    ForeignOption {
        name: String,
        section: Option<String>,
        config: String,
    },

    /// An option with the same name and section is already owned by the config
    #[error("Config {config} already has option {}", describe(.name, .section))]
    DuplicateOption {
        name: String,
        section: Option<String>,
        config: String,
    },

    /// A value source was constructed with invalid arguments
    #[error("Invalid value source: {message}")]
    InvalidSource { message: String },

    /// Attaching the config would make it resolve through itself
    #[error("Attaching {upstream} to {config} would create a cycle")]
    CyclicComposition { config: String, upstream: String },

    /// The option's transform rejected the value
    #[error("Transform failed for {}: {reason}", describe(.name, .section))]
    Transform {
        name: String,
        section: Option<String>,
        reason: String,
    },

    /// Reading or parsing an INI file failed
    #[error(transparent)]
    Ini(#[from] strata_ini::Error),
}

impl Error {
    /// Whether this is a malformed-construction or caller error rather than a
    /// failed lookup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ForeignOption { .. }
                | Self::DuplicateOption { .. }
                | Self::InvalidSource { .. }
                | Self::CyclicComposition { .. }
        )
    }

    /// Per-source failure reasons collected while resolving, if any.
    pub fn attempts(&self) -> &[String] {
        match self {
            Self::UnassignedOption { attempts, .. } => attempts,
            _ => &[],
        }
    }
}

pub(crate) fn describe(name: &str, section: &Option<String>) -> String {
    match section {
        Some(section) => format!("{name:?} in section {section:?}"),
        None => format!("{name:?} in the default section"),
    }
}
