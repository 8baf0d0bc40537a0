//! Shared test utilities for the strata workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`ini`]: INI fixture files written to temporary directories
//! - [`tracing`]: test-friendly log output

pub mod ini;
pub mod tracing;
