//! Temporary, scoped changes to option values.
//!
//! An override snapshots the current values of the options it targets,
//! applies new ones, and puts the snapshot back when the scope ends, no
//! matter how it ends.
//!
//! ```rust
//! use next_options::{OptionKind, OptionSpec, OptionValue, Override, Registry};
//!
//! # fn main() -> Result<(), next_options::Error> {
//! let mut registry = Registry::new();
//! registry.register(OptionSpec::new("net", "port", 8080, OptionKind::Int, "listen port"))?;
//!
//! registry.with_overrides(vec![Override::new("net", "port", 9999)], |registry| {
//!     assert_eq!(registry.get("net", "port")?, OptionValue::Int(9999));
//!     Ok(())
//! })?;
//!
//! assert_eq!(registry.get("net", "port")?, OptionValue::Int(8080));
//! # Ok(())
//! # }
//! ```
use std::ops::{Deref, DerefMut};

use tracing::{error, warn};

use crate::{error::Error, registry::Registry, value::OptionValue};

/// A single `(key, subkey, value)` override.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub key: String,
    pub subkey: String,
    pub value: OptionValue,
}

impl Override {
    pub fn new(key: impl Into<String>, subkey: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            key: key.into(),
            subkey: subkey.into(),
            value: value.into(),
        }
    }

    /// Splits a flat `key, subkey, value, key, subkey, value, ...` sequence.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOverrides`] if the sequence is empty, its length is
    /// not a multiple of 3, or a key or subkey is not text.
    pub fn from_flat(values: Vec<OptionValue>) -> Result<Vec<Override>, Error> {
        let len = values.len();
        if len == 0 || len % 3 != 0 {
            return Err(Error::InvalidOverrides(len));
        }

        let mut overrides = Vec::with_capacity(len / 3);
        let mut values = values.into_iter();
        while let (Some(key), Some(subkey), Some(value)) = (values.next(), values.next(), values.next()) {
            match (key, subkey) {
                (OptionValue::Text(key), OptionValue::Text(subkey)) => {
                    overrides.push(Override { key, subkey, value });
                }
                _ => return Err(Error::InvalidOverrides(len)),
            }
        }
        Ok(overrides)
    }
}

/// Restores overridden values when dropped.
///
/// Dereferences to the [`Registry`], so the overridden registry can be used
/// while the guard is alive. Prefer [`restore`](OverrideGuard::restore) to
/// observe restoration errors; a guard dropped without it (early return,
/// panic) still restores and logs any failure.
pub struct OverrideGuard<'a> {
    registry: &'a mut Registry,

    /// Values captured before the overrides were applied.
    saved: Vec<Override>,

    restored: bool,
}

impl OverrideGuard<'_> {
    /// Puts back the saved values.
    ///
    /// Every saved value is attempted; the first failure is returned, e.g.
    /// [`Error::Locked`] when an option was locked inside the scope.
    pub fn restore(mut self) -> Result<(), Error> {
        self.restore_saved()
    }

    fn restore_saved(&mut self) -> Result<(), Error> {
        self.restored = true;
        restore_values(self.registry, &self.saved)
    }
}

impl Deref for OverrideGuard<'_> {
    type Target = Registry;

    fn deref(&self) -> &Self::Target {
        self.registry
    }
}

impl DerefMut for OverrideGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registry
    }
}

impl Drop for OverrideGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(err) = self.restore_saved() {
            error!(error = %err, "failed to restore overridden options");
        }
    }
}

/// Sets every saved value back, newest first, so repeated targets end up at
/// their oldest snapshot.
fn restore_values(registry: &mut Registry, saved: &[Override]) -> Result<(), Error> {
    let mut first_err = None;
    for o in saved.iter().rev() {
        if let Err(err) = registry.set(&o.key, &o.subkey, o.value.clone()) {
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

impl Registry {
    /// Applies `overrides` and returns a guard that restores the previous
    /// values.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOverrides`] if `overrides` is empty
    /// - any error of [`get`](Registry::get) or [`set`](Registry::set) for a
    ///   target; overrides applied before the failing one are rolled back
    pub fn override_values(&mut self, overrides: Vec<Override>) -> Result<OverrideGuard<'_>, Error> {
        if overrides.is_empty() {
            return Err(Error::InvalidOverrides(0));
        }

        let saved = overrides
            .iter()
            .map(|o| {
                Ok(Override {
                    key: o.key.clone(),
                    subkey: o.subkey.clone(),
                    value: self.get_allow_unset(&o.key, &o.subkey)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        for (applied, o) in overrides.into_iter().enumerate() {
            if let Err(err) = self.set(&o.key, &o.subkey, o.value) {
                if let Err(rollback) = restore_values(self, &saved[..applied]) {
                    warn!(error = %rollback, "failed to roll back partial overrides");
                }
                return Err(err);
            }
        }

        Ok(OverrideGuard {
            registry: self,
            saved,
            restored: false,
        })
    }

    /// Runs `f` with `overrides` applied, then restores the previous values.
    ///
    /// Restoration happens whether `f` succeeds, fails or panics. A
    /// restoration failure is returned even when `f` succeeded; when both
    /// fail, the restoration error wins and the error of `f` is logged.
    pub fn with_overrides<R, F>(&mut self, overrides: Vec<Override>, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut Registry) -> Result<R, Error>,
    {
        let mut guard = self.override_values(overrides)?;
        let result = f(&mut *guard);
        match (result, guard.restore()) {
            (result, Ok(())) => result,
            (Ok(_), Err(err)) => Err(err),
            (Err(block_err), Err(err)) => {
                warn!(error = %block_err, "override block failed before restoration failed");
                Err(err)
            }
        }
    }
}
