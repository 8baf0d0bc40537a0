//! Layered configuration resolution.
//!
//! This crate determines the effective value of named, sectioned
//! configuration options by consulting, in order:
//!
//! 1. **Explicit value** set on the option
//! 2. **Value sources** attached to the option's config (environment
//!    variables, INI file sections), first hit wins
//! 3. **Default** set on the option
//!
//! Configs compose: `&base + &overrides` is a live view in which options
//! defined by `overrides` shadow those of `base`, without copying either.
//!
//! # Architecture
//!
//! ```text
//!         Snapshot  (Config::cache)
//!             |
//!          Config ----> upstream Configs (shared)
//!           |   \
//!   ConfigOption  ValueSource
//!                  |          \
//!      EnvironmentSource  FileSectionSource -> strata-ini
//! ```
//!
//! # Example
//!
//! ```
//! use strata_core::{Config, ConfigOption, EnvironmentSource, Value};
//! use strata_core::transform::parse_int;
//!
//! let config = Config::builder()
//!     .option(ConfigOption::with_default("option1", 1))
//!     .option(ConfigOption::builder("option2").value("2").transform(parse_int).build())
//!     .option(ConfigOption::with_default("option3", 3))
//!     .source(EnvironmentSource::from_vars("", [("OPTION3", "spam")]))
//!     .build()?;
//!
//! assert_eq!(config.value("option1")?, Value::Int(1));
//! assert_eq!(config.value("option2")?, Value::Int(2));
//! assert_eq!(config.value("option3")?, "spam");
//! # Ok::<(), strata_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod option;
pub mod snapshot;
pub mod source;
pub mod transform;
pub mod value;

pub use config::{Config, ConfigBuilder, Resolver};
pub use error::{Error, Result};
pub use option::{ConfigOption, OptionBuilder};
pub use snapshot::Snapshot;
pub use source::{EnvironmentSource, FileSectionSource, Lookup, ValueSource};
pub use transform::Transform;
pub use value::Value;
