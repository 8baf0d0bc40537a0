//! Merging, flattening and snapshots.

use std::collections::BTreeMap;
use std::ops::Add;
use std::rc::Rc;

use super::{Config, Resolver};
use crate::error::Result;
use crate::option::ConfigOption;
use crate::snapshot::Snapshot;
use crate::source::ValueSource;

impl Config {
    /// Compose two configs into a new view where `overrides` wins.
    ///
    /// The result owns no options; both inputs are shared, not copied.
    pub fn merge(base: &Config, overrides: &Config) -> Config {
        let merged = Config::named(format!("{} + {}", base.name(), overrides.name()));
        {
            let mut node = merged.node.borrow_mut();
            node.resolvers.push(Resolver::Config(base.clone()));
            node.resolvers.push(Resolver::Config(overrides.clone()));
        }
        tracing::debug!(config = %merged.name(), "Merged configs");
        merged
    }

    /// Every option visible from this config, topmost definition per key.
    ///
    /// Does not modify the chain.
    pub fn reachable_options(&self) -> Vec<ConfigOption> {
        let mut seen: Vec<ConfigOption> = Vec::new();
        self.collect_options(&mut seen);
        seen
    }

    fn collect_options(&self, seen: &mut Vec<ConfigOption>) {
        for option in self.options() {
            if !seen.contains(&option) {
                seen.push(option);
            }
        }
        for upstream in self.upstream_configs() {
            upstream.collect_options(seen);
        }
    }

    /// Every value source in the chain: this config's own first, then those
    /// of upstream configs from the most recently attached.
    pub fn reachable_sources(&self) -> Vec<Rc<dyn ValueSource>> {
        let mut seen: Vec<Rc<dyn ValueSource>> = Vec::new();
        self.collect_sources(&mut seen);
        seen
    }

    fn collect_sources(&self, seen: &mut Vec<Rc<dyn ValueSource>>) {
        for source in self.direct_sources() {
            if !seen.iter().any(|known| Rc::ptr_eq(known, &source)) {
                seen.push(source);
            }
        }
        for upstream in self.upstream_configs() {
            upstream.collect_sources(seen);
        }
    }

    /// Collapse the whole upstream chain into this config.
    ///
    /// Upstream options are copied and bound here; upstream configs are
    /// dropped from the chain and no longer affect this config, nor does this
    /// config affect them.
    pub fn flatten(&self) {
        let options: Vec<ConfigOption> = self
            .reachable_options()
            .into_iter()
            .map(|option| {
                if self.owns_instance(&option) {
                    option
                } else {
                    let copy = option.detached_copy();
                    copy.bind(self);
                    copy
                }
            })
            .collect();
        let sources = self.reachable_sources();

        tracing::debug!(
            config = %self.name(),
            options = options.len(),
            sources = sources.len(),
            "Flattened config"
        );

        let mut node = self.node.borrow_mut();
        node.options = options;
        node.resolvers = sources.into_iter().map(Resolver::Source).collect();
    }

    /// Resolve every reachable option into an immutable snapshot.
    ///
    /// Fails on the first option that cannot be read; there are no partial
    /// snapshots.
    pub fn cache(&self) -> Result<Snapshot> {
        let mut sections: BTreeMap<Option<String>, BTreeMap<String, _>> = BTreeMap::new();
        for option in self.reachable_options() {
            let value = option.read()?;
            sections
                .entry(option.section())
                .or_default()
                .insert(option.name().to_string(), value);
        }
        tracing::debug!(config = %self.name(), sections = sections.len(), "Built snapshot");
        Ok(Snapshot::new(sections))
    }
}

impl Add for &Config {
    type Output = Config;

    fn add(self, overrides: Self) -> Config {
        Config::merge(self, overrides)
    }
}

impl Add for Config {
    type Output = Config;

    fn add(self, overrides: Config) -> Config {
        Config::merge(&self, &overrides)
    }
}
