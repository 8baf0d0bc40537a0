//! Option lookup, local resolution and owned-set mutation.

use super::Config;
use crate::error::{Error, Result};
use crate::option::ConfigOption;
use crate::source::Lookup;
use crate::value::Value;

impl Config {
    /// Find an option by name in the ambient section.
    pub fn get_option(&self, name: &str) -> Result<ConfigOption> {
        let section = self.section();
        self.get_option_in(name, section.as_deref())
    }

    /// Find an option by name and section.
    ///
    /// Owned options win; otherwise upstream configs are searched from the
    /// most recently attached, so the topmost definition is returned.
    pub fn get_option_in(&self, name: &str, section: Option<&str>) -> Result<ConfigOption> {
        self.locate(name, section)
            .map(|(_, option)| option)
            .ok_or_else(|| Error::UndefinedOption {
                name: name.to_string(),
                section: section.map(str::to_string),
            })
    }

    /// Find this exact option instance anywhere in the chain.
    ///
    /// Unlike name lookup this still finds options that are shadowed by a
    /// definition with the same key higher up.
    pub fn find_instance(&self, option: &ConfigOption) -> Result<ConfigOption> {
        self.locate_instance(option)
            .map(|(_, found)| found)
            .ok_or_else(|| Error::UndefinedOption {
                name: option.name().to_string(),
                section: option.section(),
            })
    }

    /// Resolve an owned option using only this config's value sources.
    ///
    /// Sources are asked in attachment order and the first hit wins. Upstream
    /// configs are not consulted.
    pub fn resolve(&self, option: &ConfigOption) -> Result<Value> {
        if !self.owns_instance(option) {
            return Err(Error::ForeignOption {
                name: option.name().to_string(),
                section: option.section(),
                config: self.name(),
            });
        }

        let sources = self.direct_sources();
        if sources.is_empty() {
            return Err(Error::NoDirectResolvers {
                config: self.name(),
            });
        }

        let section = option.section();
        let mut attempts = Vec::with_capacity(sources.len());
        for source in sources {
            match source.lookup(option.name(), section.as_deref())? {
                Lookup::Found(value) => {
                    tracing::trace!(option = %option, source = %source, "Resolved option");
                    return Ok(value);
                }
                Lookup::NotFound(reason) => attempts.push(reason),
            }
        }

        Err(Error::UnassignedOption {
            name: option.name().to_string(),
            section,
            attempts,
        })
    }

    /// Read the value of an option in the ambient section.
    pub fn value(&self, name: &str) -> Result<Value> {
        let section = self.section();
        self.value_in(name, section.as_deref())
    }

    /// Read the value of an option in a given section.
    ///
    /// Every failed attempt is logged as a warning before the error is
    /// returned.
    pub fn value_in(&self, name: &str, section: Option<&str>) -> Result<Value> {
        let result = self
            .get_option_in(name, section)
            .and_then(|option| option.read());
        if let Err(err) = &result {
            for attempt in err.attempts() {
                tracing::warn!(config = %self.name(), option = name, "{attempt}");
            }
            tracing::warn!(config = %self.name(), option = name, error = %err, "Option lookup failed");
        }
        result
    }

    /// Remove the topmost option with this name in the ambient section from
    /// whichever config in the chain owns it.
    pub fn remove_option(&self, name: &str) -> Result<ConfigOption> {
        let section = self.section();
        self.remove_option_in(name, section.as_deref())
    }

    pub fn remove_option_in(&self, name: &str, section: Option<&str>) -> Result<ConfigOption> {
        let (owner, option) = self.locate(name, section).ok_or_else(|| Error::UndefinedOption {
            name: name.to_string(),
            section: section.map(str::to_string),
        })?;
        owner.discard(&option);
        Ok(option)
    }

    /// Remove this exact option instance from whichever config owns it.
    pub fn remove_instance(&self, option: &ConfigOption) -> Result<ConfigOption> {
        let (owner, found) = self
            .locate_instance(option)
            .ok_or_else(|| Error::UndefinedOption {
                name: option.name().to_string(),
                section: option.section(),
            })?;
        owner.discard(&found);
        Ok(found)
    }

    /// Insert or replace an option by name and section.
    ///
    /// An existing definition anywhere in the chain is replaced in the config
    /// that owns it, so every view sharing that config sees the new option.
    /// Otherwise the option is added to this config.
    pub fn set_option(&self, option: ConfigOption) -> Result<()> {
        option.adopt_section(self.section().as_deref());
        let section = option.section();
        match self.locate(option.name(), section.as_deref()) {
            Some((owner, old)) => {
                tracing::debug!(config = %owner.name(), option = %old, "Replacing option");
                owner.discard(&old);
                owner.add_option(option)
            }
            None => self.add_option(option),
        }
    }

    /// Owner and option for a key, topmost first.
    pub(crate) fn locate(&self, name: &str, section: Option<&str>) -> Option<(Config, ConfigOption)> {
        if let Some(option) = self.owned(name, section) {
            return Some((self.clone(), option));
        }
        self.upstream_configs()
            .into_iter()
            .find_map(|upstream| upstream.locate(name, section))
    }

    fn locate_instance(&self, option: &ConfigOption) -> Option<(Config, ConfigOption)> {
        if self.owns_instance(option) {
            return Some((self.clone(), option.clone()));
        }
        self.upstream_configs()
            .into_iter()
            .find_map(|upstream| upstream.locate_instance(option))
    }

    fn discard(&self, option: &ConfigOption) {
        tracing::trace!(config = %self.name(), option = %option, "Removed option");
        self.node
            .borrow_mut()
            .options
            .retain(|owned| !owned.same_instance(option));
    }
}
