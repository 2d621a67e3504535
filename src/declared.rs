use tracing::debug;

use crate::{error::Error, option::OptionSpec, registry::Registry};

/// A set of options declared at compile time with
/// [`declare_options!`](crate::declare_options).
pub struct DeclaredOptions {
    pub options: fn() -> Vec<OptionSpec>,
}

impl DeclaredOptions {
    pub const fn new(options: fn() -> Vec<OptionSpec>) -> Self {
        Self { options }
    }
}

inventory::collect!(DeclaredOptions);

/// Declares options that [`Registry::register_declared`] picks up.
///
/// ```rust
/// use next_options::{OptionKind, OptionSpec, Registry, declare_options};
///
/// fn network_options() -> Vec<OptionSpec> {
///     vec![OptionSpec::new("net", "port", 8080, OptionKind::Int, "listen port")]
/// }
///
/// declare_options!(network_options);
///
/// fn main() {
///     let mut registry = Registry::new();
///     registry.register_declared().unwrap();
///     assert!(registry.contains("net", "port"));
/// }
/// ```
#[macro_export]
macro_rules! declare_options {
    ($options:path) => {
        $crate::inventory::submit! {
            $crate::DeclaredOptions::new($options)
        }
    };
}

impl Registry {
    /// Registers every declared option that is not registered yet.
    ///
    /// Declarations may be collected more than once; existing options are
    /// kept as they are. Returns how many options were added.
    pub fn register_declared(&mut self) -> Result<usize, Error> {
        let mut added = 0;
        for declared in inventory::iter::<DeclaredOptions> {
            for spec in (declared.options)() {
                if self.register_if_absent(spec)? {
                    added += 1;
                }
            }
        }
        debug!(added, "registered declared options");
        Ok(added)
    }
}
