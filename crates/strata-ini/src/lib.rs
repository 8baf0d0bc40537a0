//! configparser-compatible INI reader for strata.
//!
//! Parses INI documents the way the standard `configparser` dialect does, so
//! existing configuration files resolve to the same values:
//!
//! - `[section]` headers, with `DEFAULT` acting as the defaults section
//! - `key = value` or `key: value` entries, keys case-insensitive
//! - `#` / `;` full-line comments
//! - indented continuation lines for multi-line values
//! - `%(name)s` basic interpolation on read
//!
//! # Example
//!
//! ```
//! use strata_ini::IniDocument;
//!
//! let doc = IniDocument::parse("[DEFAULT]\nForwardX11 = yes\n\n[bitbucket.org]\nUser = hg\n").unwrap();
//! assert_eq!(doc.get("bitbucket.org", "User").unwrap(), Some("hg".to_string()));
//! assert_eq!(doc.get("bitbucket.org", "forwardx11").unwrap(), Some("yes".to_string()));
//! ```

pub mod document;
pub mod error;
mod interpolate;
mod parser;

pub use document::{DEFAULT_SECTION, IniDocument};
pub use error::{Error, Result};
