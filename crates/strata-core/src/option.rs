//! Configuration options and the read-time fallback chain.
//!
//! A [`ConfigOption`] is a shared handle: cloning it clones the reference, not
//! the definition. Configs hold the same handles the caller holds, which is
//! what makes lookups by instance possible after an option has been shadowed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::{Config, WeakConfig};
use crate::error::{Error, Result};
use crate::transform::{Transform, TransformResult};
use crate::value::Value;

/// Section placement of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// Takes the ambient section of the first config it is added to.
    Ambient,
    Fixed(Option<String>),
}

struct OptionInner {
    name: String,
    section: RefCell<Placement>,
    value: Option<Value>,
    default: Option<Value>,
    transform: Option<Transform>,
    description: Option<String>,
    owner: RefCell<WeakConfig>,
}

/// A named, sectioned configuration slot.
///
/// Equality compares `(name, section)`; use [`ConfigOption::same_instance`] to
/// compare handles.
#[derive(Clone)]
pub struct ConfigOption {
    inner: Rc<OptionInner>,
}

/// Builder for [`ConfigOption`].
#[derive(Debug)]
pub struct OptionBuilder {
    name: String,
    section: Placement,
    value: Option<Value>,
    default: Option<Value>,
    transform: Option<Transform>,
    description: Option<String>,
}

impl OptionBuilder {
    /// Value returned when neither an explicit value nor any source provides one.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Explicit value; always wins over sources and the default.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Fix the option to a named section.
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Placement::Fixed(Some(section.into()));
        self
    }

    /// Fix the option to the default section, ignoring any ambient section.
    pub fn default_section(mut self) -> Self {
        self.section = Placement::Fixed(None);
        self
    }

    pub fn transform(mut self, f: impl Fn(Value) -> TransformResult + 'static) -> Self {
        self.transform = Some(Transform::new(f));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> ConfigOption {
        ConfigOption {
            inner: Rc::new(OptionInner {
                name: self.name,
                section: RefCell::new(self.section),
                value: self.value,
                default: self.default,
                transform: self.transform,
                description: self.description,
                owner: RefCell::new(WeakConfig::default()),
            }),
        }
    }
}

impl ConfigOption {
    pub fn builder(name: impl Into<String>) -> OptionBuilder {
        OptionBuilder {
            name: name.into(),
            section: Placement::Ambient,
            value: None,
            default: None,
            transform: None,
            description: None,
        }
    }

    /// An option with no value, default or transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::builder(name).default(default).build()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The option's section; `None` is the default section.
    ///
    /// Options built without a section report `None` until they are added to
    /// a config, which assigns its ambient section.
    pub fn section(&self) -> Option<String> {
        match &*self.inner.section.borrow() {
            Placement::Ambient => None,
            Placement::Fixed(section) => section.clone(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn explicit_value(&self) -> Option<&Value> {
        self.inner.value.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.inner.default.as_ref()
    }

    /// Whether both handles point at the same option.
    pub fn same_instance(&self, other: &ConfigOption) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether this option has the given name and section.
    pub fn matches(&self, name: &str, section: Option<&str>) -> bool {
        self.inner.name == name && self.section().as_deref() == section
    }

    /// The config that currently owns this option, if it is still alive.
    pub fn owner(&self) -> Option<Config> {
        self.inner.owner.borrow().upgrade()
    }

    /// Determine the option's effective value.
    ///
    /// Precedence: explicit value, then the owning config's sources, then the
    /// default. The transform is applied to whichever wins. When nothing
    /// yields a value the error carries every reason collected on the way.
    pub fn read(&self) -> Result<Value> {
        if let Some(value) = &self.inner.value {
            return self.apply(value.clone());
        }

        let mut attempts = Vec::new();
        match self.owner() {
            Some(config) => match config.resolve(self) {
                Ok(raw) => return self.apply(raw),
                Err(Error::UnassignedOption { attempts: tried, .. }) => attempts.extend(tried),
                Err(err @ Error::NoDirectResolvers { .. }) => attempts.push(err.to_string()),
                Err(err) => return Err(err),
            },
            None => attempts.push(format!("{self} is not bound to a config")),
        }

        if let Some(default) = &self.inner.default {
            return self.apply(default.clone());
        }

        Err(Error::UnassignedOption {
            name: self.inner.name.clone(),
            section: self.section(),
            attempts,
        })
    }

    fn apply(&self, value: Value) -> Result<Value> {
        match &self.inner.transform {
            Some(transform) => transform.apply(value).map_err(|reason| Error::Transform {
                name: self.inner.name.clone(),
                section: self.section(),
                reason,
            }),
            None => Ok(value),
        }
    }

    /// Assign the ambient section if the option has none yet.
    pub(crate) fn adopt_section(&self, ambient: Option<&str>) {
        let mut placement = self.inner.section.borrow_mut();
        if *placement == Placement::Ambient {
            *placement = Placement::Fixed(ambient.map(str::to_string));
        }
    }

    /// The section this option will have once added to a config with `ambient`.
    pub(crate) fn effective_section(&self, ambient: Option<&str>) -> Option<String> {
        match &*self.inner.section.borrow() {
            Placement::Ambient => ambient.map(str::to_string),
            Placement::Fixed(section) => section.clone(),
        }
    }

    pub(crate) fn bind(&self, config: &Config) {
        *self.inner.owner.borrow_mut() = config.downgrade();
    }

    /// A fresh, unbound option with the same definition.
    pub(crate) fn detached_copy(&self) -> ConfigOption {
        ConfigOption {
            inner: Rc::new(OptionInner {
                name: self.inner.name.clone(),
                section: RefCell::new(self.inner.section.borrow().clone()),
                value: self.inner.value.clone(),
                default: self.inner.default.clone(),
                transform: self.inner.transform.clone(),
                description: self.inner.description.clone(),
                owner: RefCell::new(WeakConfig::default()),
            }),
        }
    }
}

impl PartialEq for ConfigOption {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name && self.section() == other.section()
    }
}

impl Eq for ConfigOption {}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.section() {
            Some(section) => write!(f, "{}@{}", self.inner.name, section),
            None => f.write_str(&self.inner.name),
        }
    }
}

impl fmt::Debug for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOption")
            .field("name", &self.inner.name)
            .field("section", &self.section())
            .field("value", &self.inner.value)
            .field("default", &self.inner.default)
            .field("transform", &self.inner.transform.is_some())
            .finish()
    }
}
