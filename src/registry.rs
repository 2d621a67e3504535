//! The option registry.
//!
//! This module provides [`Registry`], the main entry point for declaring,
//! reading and mutating options. Every option is identified by a
//! case-insensitive `(key, subkey)` pair and carries a declared
//! [`OptionKind`]; the registry checks every mutation against it.
//!
//! # Overview
//!
//! The [`Registry`] owns:
//!
//! - Registration and removal of options (until it is frozen)
//! - Reads of current values, defaults and metadata
//! - Type-checked mutation, honoring alternatives and locks
//! - Bulk resets
//!
//! Serialization, scoped overrides and documentation live in their own
//! modules as further `impl Registry` blocks.
//!
//! # Example
//!
//! ```rust
//! use next_options::{OptionKind, OptionSpec, OptionValue, Registry};
//!
//! # fn main() -> Result<(), next_options::Error> {
//! let mut registry = Registry::new();
//! registry.register(OptionSpec::new("net", "port", 8080, OptionKind::Int, "listen port"))?;
//!
//! assert_eq!(registry.get("NET", "Port")?, OptionValue::Int(8080));
//!
//! registry.set("net", "port", 9090)?;
//! registry.lock("net", "port")?;
//! assert!(registry.set("net", "port", 1111).unwrap_err().is_locked());
//! # Ok(())
//! # }
//! ```
use tracing::debug;

use crate::{
    error::Error,
    evaluator,
    option::{ConfigOption, OptionSpec},
    value::{OptionKind, OptionValue},
};

/// Lower-cases a `(key, subkey)` pair.
pub(crate) fn normalize(key: &str, subkey: &str) -> (String, String) {
    (key.to_lowercase(), subkey.to_lowercase())
}

/// An ordered collection of options.
///
/// Options keep their registration order, which is the order used by
/// [`list`](Registry::list), serialization and documentation.
///
/// # Lifecycle
///
/// An option is created by [`register`](Registry::register), mutated with
/// [`set`](Registry::set), [`reset`](Registry::reset) and
/// [`lock`](Registry::lock), and destroyed by
/// [`unregister`](Registry::unregister) or
/// [`reset_all`](Registry::reset_all). Locking is one-way.
///
/// Once [`freeze`](Registry::freeze) is called, registration and
/// unregistration become no-ops; values stay mutable unless locked.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Registered options in registration order.
    options: Vec<ConfigOption>,

    /// Cleared by [`freeze`](Registry::freeze).
    open: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty, open registry.
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            open: true,
        }
    }

    fn position(&self, key: &str, subkey: &str) -> Option<usize> {
        self.options.iter().position(|o| o.matches(key, subkey))
    }

    /// Guard: the normalized pair must be registered.
    fn must_exist(&self, key: &str, subkey: &str) -> Result<usize, Error> {
        self.position(key, subkey)
            .ok_or_else(|| Error::not_found(key, subkey))
    }

    /// Guard: the normalized pair must not be registered.
    fn must_not_exist(&self, key: &str, subkey: &str) -> Result<(), Error> {
        match self.position(key, subkey) {
            Some(_) => Err(Error::already_exists(key, subkey)),
            None => Ok(()),
        }
    }

    pub(crate) fn entry(&self, key: &str, subkey: &str) -> Result<&ConfigOption, Error> {
        let (key, subkey) = normalize(key, subkey);
        let idx = self.must_exist(&key, &subkey)?;
        Ok(&self.options[idx])
    }

    /// Registers a new option with `value = default`.
    ///
    /// The default is checked against the declared kind and, when
    /// alternatives are given, must be one of them.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyExists`] if the pair is already registered
    /// - [`Error::TypeMismatch`] / [`Error::PathNotFound`] for an invalid default
    /// - [`Error::NotAllowed`] if the default is not among the alternatives
    ///
    /// Does nothing when the registry is frozen.
    pub fn register(&mut self, spec: OptionSpec) -> Result<(), Error> {
        if !self.open {
            debug!(key = %spec.key, subkey = %spec.subkey, "registry frozen, skipping registration");
            return Ok(());
        }

        let (key, subkey) = normalize(&spec.key, &spec.subkey);
        self.must_not_exist(&key, &subkey)?;

        let default = evaluator::conform(spec.default_value, spec.kind)?;
        let alternatives = spec
            .alternatives
            .map(|values| {
                values
                    .into_iter()
                    .map(|v| evaluator::conform(v, spec.kind))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let option = ConfigOption {
            key,
            subkey,
            kind: spec.kind,
            value: default.clone(),
            default,
            locked: spec.locked,
            description: spec.description,
            alternatives,
        };

        if !option.accepts(&option.default) {
            return Err(Error::NotAllowed {
                value: option.default.to_string(),
                accepted: option.accepted_values(),
                key: option.key,
                subkey: option.subkey,
            });
        }

        debug!(key = %option.key, subkey = %option.subkey, kind = %option.kind, "registered option");
        self.options.push(option);
        Ok(())
    }

    /// Registers `spec` unless its pair is already present.
    ///
    /// Returns whether a new option was added.
    pub fn register_if_absent(&mut self, spec: OptionSpec) -> Result<bool, Error> {
        if !self.open || self.contains(&spec.key, &spec.subkey) {
            return Ok(false);
        }
        self.register(spec)?;
        Ok(true)
    }

    /// Removes an option. Does nothing when the registry is frozen.
    pub fn unregister(&mut self, key: &str, subkey: &str) -> Result<(), Error> {
        let (key, subkey) = normalize(key, subkey);
        let idx = self.must_exist(&key, &subkey)?;
        if !self.open {
            debug!(%key, %subkey, "registry frozen, skipping unregistration");
            return Ok(());
        }
        self.options.remove(idx);
        Ok(())
    }

    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the pair is not registered
    /// - [`Error::UnsetPath`] if the option is an unset input path; use
    ///   [`get_allow_unset`](Registry::get_allow_unset) to read those
    pub fn get(&self, key: &str, subkey: &str) -> Result<OptionValue, Error> {
        let option = self.entry(key, subkey)?;
        if option.kind == OptionKind::PathIn && option.value.is_unset_path() {
            return Err(Error::UnsetPath {
                key: option.key.clone(),
                subkey: option.subkey.clone(),
            });
        }
        Ok(option.value.clone())
    }

    /// Like [`get`](Registry::get), but returns unset input paths as
    /// `OptionValue::Path(None)`.
    pub fn get_allow_unset(&self, key: &str, subkey: &str) -> Result<OptionValue, Error> {
        Ok(self.entry(key, subkey)?.value.clone())
    }

    /// Returns the current value converted to a Rust type.
    ///
    /// ```rust
    /// # use next_options::{OptionKind, OptionSpec, Registry};
    /// # let mut registry = Registry::new();
    /// # registry.register(OptionSpec::new("net", "port", 8080, OptionKind::Int, "")).unwrap();
    /// let port: i64 = registry.get_as("net", "port").unwrap();
    /// assert_eq!(port, 8080);
    /// ```
    pub fn get_as<T>(&self, key: &str, subkey: &str) -> Result<T, Error>
    where
        T: TryFrom<OptionValue, Error = Error>,
    {
        T::try_from(self.get(key, subkey)?)
    }

    pub fn get_default(&self, key: &str, subkey: &str) -> Result<OptionValue, Error> {
        Ok(self.entry(key, subkey)?.default.clone())
    }

    pub fn get_description(&self, key: &str, subkey: &str) -> Result<String, Error> {
        Ok(self.entry(key, subkey)?.description.clone())
    }

    pub fn get_type(&self, key: &str, subkey: &str) -> Result<OptionKind, Error> {
        Ok(self.entry(key, subkey)?.kind)
    }

    pub fn get_alternatives(
        &self,
        key: &str,
        subkey: &str,
    ) -> Result<Option<Vec<OptionValue>>, Error> {
        Ok(self.entry(key, subkey)?.alternatives.clone())
    }

    pub fn is_locked(&self, key: &str, subkey: &str) -> Result<bool, Error> {
        Ok(self.entry(key, subkey)?.locked)
    }

    /// Sets the current value.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the pair is not registered
    /// - [`Error::Locked`] if the option is locked
    /// - [`Error::TypeMismatch`] / [`Error::PathNotFound`] for a value of
    ///   the wrong kind or a missing input path
    /// - [`Error::NotAllowed`] if the value is not among the alternatives
    ///
    /// On error the option is left unchanged.
    pub fn set(
        &mut self,
        key: &str,
        subkey: &str,
        value: impl Into<OptionValue>,
    ) -> Result<(), Error> {
        let (key, subkey) = normalize(key, subkey);
        let idx = self.must_exist(&key, &subkey)?;
        let option = &mut self.options[idx];

        if option.locked {
            return Err(Error::locked(&key, &subkey));
        }

        let value = evaluator::conform(value.into(), option.kind)?;
        if !option.accepts(&value) {
            return Err(Error::NotAllowed {
                key,
                subkey,
                value: value.to_string(),
                accepted: option.accepted_values(),
            });
        }

        option.value = value;
        Ok(())
    }

    /// Reports whether `value` would be accepted by the option's
    /// alternatives, without mutating anything.
    ///
    /// Returns `true` when the option has no alternatives. Lock state is not
    /// considered.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown pair, and the type errors of
    /// [`set`](Registry::set) for a value of the wrong kind.
    pub fn check(
        &self,
        key: &str,
        subkey: &str,
        value: impl Into<OptionValue>,
    ) -> Result<bool, Error> {
        let option = self.entry(key, subkey)?;
        let value = evaluator::conform(value.into(), option.kind)?;
        Ok(option.accepts(&value))
    }

    /// Restores the default value.
    ///
    /// Fails with [`Error::NotFound`] or [`Error::Locked`] like
    /// [`set`](Registry::set).
    pub fn reset(&mut self, key: &str, subkey: &str) -> Result<(), Error> {
        let (key, subkey) = normalize(key, subkey);
        let idx = self.must_exist(&key, &subkey)?;
        let option = &mut self.options[idx];
        if option.locked {
            return Err(Error::locked(&key, &subkey));
        }
        option.value = option.default.clone();
        Ok(())
    }

    /// Locks an option. There is no way back: a locked option can still be
    /// read but never set or reset.
    pub fn lock(&mut self, key: &str, subkey: &str) -> Result<(), Error> {
        let (key, subkey) = normalize(key, subkey);
        let idx = self.must_exist(&key, &subkey)?;
        self.options[idx].locked = true;
        debug!(%key, %subkey, "locked option");
        Ok(())
    }

    /// Freezes the schema: later registrations and unregistrations are
    /// ignored.
    pub fn freeze(&mut self) {
        self.open = false;
        debug!(options = self.options.len(), "registry frozen");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn contains(&self, key: &str, subkey: &str) -> bool {
        let (key, subkey) = normalize(key, subkey);
        self.position(&key, &subkey).is_some()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns a copy of every option, or of those under `key`, in
    /// registration order.
    pub fn list(&self, key: Option<&str>) -> Vec<ConfigOption> {
        let key = key.map(str::to_lowercase);
        self.options
            .iter()
            .filter(|o| key.as_ref().is_none_or(|k| &o.key == k))
            .cloned()
            .collect()
    }

    pub(crate) fn options(&self) -> &[ConfigOption] {
        &self.options
    }

    /// Global reset.
    ///
    /// With `empty`, every option is dropped. Otherwise every value goes
    /// back to its default, locked options included.
    pub fn reset_all(&mut self, empty: bool) {
        if empty {
            self.options.clear();
        } else {
            for option in &mut self.options {
                option.value = option.default.clone();
            }
        }
    }
}
