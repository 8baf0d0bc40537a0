//! Composable configs.
//!
//! A [`Config`] owns the options added to it directly and *shares* every
//! config in its upstream chain. Merging never copies: `&base + &overrides`
//! produces a new node whose upstream chain is `[base, overrides]`, so later
//! changes to either are visible through the merged view.
//!
//! # Precedence
//!
//! - Option lookup: owned options first, then upstream configs from the most
//!   recently attached to the oldest, depth first.
//! - Value resolution: an option is resolved by the config that owns it, which
//!   asks its own value sources in the order they were attached.
//!
//! # Example
//!
//! ```
//! use strata_core::{Config, ConfigOption, EnvironmentSource};
//!
//! let base = Config::builder()
//!     .name("base")
//!     .option(ConfigOption::with_default("user", "nobody"))
//!     .source(EnvironmentSource::from_vars("APP_", [("APP_USER", "hg")]))
//!     .build()
//!     .unwrap();
//! let overrides = Config::builder()
//!     .name("overrides")
//!     .option(ConfigOption::builder("user").value("root").build())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(base.value("user").unwrap(), "hg");
//! assert_eq!((&base + &overrides).value("user").unwrap(), "root");
//! ```

mod compose;
mod lookup;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::option::ConfigOption;
use crate::source::ValueSource;

/// An entry in a config's upstream chain.
#[derive(Clone)]
pub enum Resolver {
    /// Another config, shared by reference.
    Config(Config),
    /// A value source consulted when this config resolves its own options.
    Source(Rc<dyn ValueSource>),
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(config) => write!(f, "Config({})", config.name()),
            Self::Source(source) => write!(f, "Source({source})"),
        }
    }
}

#[derive(Default)]
pub(crate) struct ConfigNode {
    name: Option<String>,
    section: Option<String>,
    options: Vec<ConfigOption>,
    resolvers: Vec<Resolver>,
}

/// A shared handle to a config node.
///
/// Cloning a `Config` yields another handle to the same node.
#[derive(Clone, Default)]
pub struct Config {
    node: Rc<RefCell<ConfigNode>>,
}

/// Non-owning reference from an option back to its config.
#[derive(Clone, Default)]
pub(crate) struct WeakConfig(Weak<RefCell<ConfigNode>>);

impl WeakConfig {
    pub(crate) fn upgrade(&self) -> Option<Config> {
        self.0.upgrade().map(|node| Config { node })
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config with a name used in diagnostics.
    pub fn named(name: impl Into<String>) -> Self {
        let config = Self::new();
        config.node.borrow_mut().name = Some(name.into());
        config
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Diagnostic name; anonymous configs report `config`.
    pub fn name(&self) -> String {
        self.node
            .borrow()
            .name
            .clone()
            .unwrap_or_else(|| "config".to_string())
    }

    /// Ambient section assigned to options added without one.
    pub fn section(&self) -> Option<String> {
        self.node.borrow().section.clone()
    }

    /// Change the ambient section. Options already added keep theirs.
    pub fn set_section(&self, section: Option<&str>) {
        self.node.borrow_mut().section = section.map(str::to_string);
    }

    /// Options owned directly by this config, in insertion order.
    pub fn options(&self) -> Vec<ConfigOption> {
        self.node.borrow().options.clone()
    }

    /// The upstream chain, in attachment order.
    pub fn resolvers(&self) -> Vec<Resolver> {
        self.node.borrow().resolvers.clone()
    }

    /// Whether both handles point at the same config.
    pub fn same_instance(&self, other: &Config) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Add an option owned by this config.
    ///
    /// Options without a section take the ambient section. Adding a second
    /// option with the same name and section fails; use
    /// [`Config::set_option`] to replace.
    pub fn add_option(&self, option: ConfigOption) -> Result<()> {
        let ambient = self.section();
        let section = option.effective_section(ambient.as_deref());
        if self.owned(option.name(), section.as_deref()).is_some() {
            return Err(Error::DuplicateOption {
                name: option.name().to_string(),
                section,
                config: self.name(),
            });
        }

        option.adopt_section(ambient.as_deref());
        option.bind(self);
        tracing::trace!(config = %self.name(), option = %option, "Added option");
        self.node.borrow_mut().options.push(option);
        Ok(())
    }

    pub fn add_options(&self, options: impl IntoIterator<Item = ConfigOption>) -> Result<()> {
        options
            .into_iter()
            .try_for_each(|option| self.add_option(option))
    }

    /// Attach a value source after the existing ones.
    pub fn add_source(&self, source: impl ValueSource + 'static) {
        self.add_shared_source(Rc::new(source));
    }

    /// Attach a value source that may also be attached elsewhere.
    pub fn add_shared_source(&self, source: Rc<dyn ValueSource>) {
        tracing::debug!(config = %self.name(), source = %source, "Attached value source");
        self.node.borrow_mut().resolvers.push(Resolver::Source(source));
    }

    /// Attach an upstream config; it takes precedence over configs attached
    /// before it.
    pub fn add_config(&self, upstream: &Config) -> Result<()> {
        if upstream.same_instance(self) || upstream.reaches(self) {
            return Err(Error::CyclicComposition {
                config: self.name(),
                upstream: upstream.name(),
            });
        }
        tracing::debug!(config = %self.name(), upstream = %upstream.name(), "Attached upstream config");
        self.node
            .borrow_mut()
            .resolvers
            .push(Resolver::Config(upstream.clone()));
        Ok(())
    }

    pub(crate) fn downgrade(&self) -> WeakConfig {
        WeakConfig(Rc::downgrade(&self.node))
    }

    /// Owned option with this key.
    fn owned(&self, name: &str, section: Option<&str>) -> Option<ConfigOption> {
        self.node
            .borrow()
            .options
            .iter()
            .find(|option| option.matches(name, section))
            .cloned()
    }

    fn owns_instance(&self, option: &ConfigOption) -> bool {
        self.node
            .borrow()
            .options
            .iter()
            .any(|owned| owned.same_instance(option))
    }

    /// Upstream configs, most recently attached first.
    fn upstream_configs(&self) -> Vec<Config> {
        self.node
            .borrow()
            .resolvers
            .iter()
            .rev()
            .filter_map(|resolver| match resolver {
                Resolver::Config(config) => Some(config.clone()),
                Resolver::Source(_) => None,
            })
            .collect()
    }

    /// Value sources attached directly, in attachment order.
    fn direct_sources(&self) -> Vec<Rc<dyn ValueSource>> {
        self.node
            .borrow()
            .resolvers
            .iter()
            .filter_map(|resolver| match resolver {
                Resolver::Source(source) => Some(Rc::clone(source)),
                Resolver::Config(_) => None,
            })
            .collect()
    }

    /// Whether `target` is anywhere in this config's upstream graph.
    fn reaches(&self, target: &Config) -> bool {
        self.upstream_configs()
            .iter()
            .any(|upstream| upstream.same_instance(target) || upstream.reaches(target))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("Config")
            .field("name", &node.name)
            .field("section", &node.section)
            .field(
                "options",
                &node.options.iter().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .field("resolvers", &node.resolvers)
            .finish()
    }
}

/// Builder for [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    name: Option<String>,
    section: Option<String>,
    options: Vec<ConfigOption>,
    resolvers: Vec<Resolver>,
}

impl ConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Ambient section for options added without one.
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn option(mut self, option: ConfigOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = ConfigOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn source(mut self, source: impl ValueSource + 'static) -> Self {
        self.resolvers.push(Resolver::Source(Rc::new(source)));
        self
    }

    /// Attach an upstream config, shared by reference.
    pub fn config(mut self, upstream: &Config) -> Self {
        self.resolvers.push(Resolver::Config(upstream.clone()));
        self
    }

    pub fn build(self) -> Result<Config> {
        let config = Config::new();
        {
            let mut node = config.node.borrow_mut();
            node.name = self.name;
            node.section = self.section;
        }
        for resolver in self.resolvers {
            match resolver {
                Resolver::Config(upstream) => config.add_config(&upstream)?,
                Resolver::Source(source) => config.add_shared_source(source),
            }
        }
        config.add_options(self.options)?;
        Ok(config)
    }
}
