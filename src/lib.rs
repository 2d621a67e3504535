pub mod error;
pub mod evaluator;
pub mod format;
pub mod locator;
pub mod mapping;
pub mod option;
pub mod overrides;
pub mod registry;
pub mod value;

mod declared;
mod docs;

pub use declared::DeclaredOptions;
pub use error::Error;
pub use format::Format;
pub use locator::{Locator, locate};
pub use mapping::{OptionMap, RawOptionMap};
pub use option::{ConfigOption, OptionSpec, OptionSpecBuilder};
pub use overrides::{Override, OverrideGuard};
pub use registry::Registry;
pub use value::{OptionKind, OptionValue};

// re-exported for `declare_options!`
#[doc(hidden)]
pub use inventory;
