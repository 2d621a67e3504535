use derive_builder::Builder;

use crate::{
    error::Error,
    value::{OptionKind, OptionValue},
};

/// Definition of an option, handed to [`Registry::register`](crate::Registry::register).
///
/// # Example
///
/// ```rust
/// use next_options::{OptionKind, OptionSpec};
///
/// let spec = OptionSpec::builder()
///     .key("net")
///     .subkey("port")
///     .default_value(8080)
///     .kind(OptionKind::Int)
///     .description("listen port")
///     .build()?;
/// assert_eq!(spec.key, "net");
/// # Ok::<(), next_options::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(pattern = "owned", build_fn(error = "Error"))]
pub struct OptionSpec {
    #[builder(setter(into))]
    pub key: String,
    #[builder(setter(into))]
    pub subkey: String,
    #[builder(setter(into))]
    pub default_value: OptionValue,
    pub kind: OptionKind,
    #[builder(setter(into), default)]
    pub description: String,
    #[builder(setter(custom), default)]
    pub alternatives: Option<Vec<OptionValue>>,
    #[builder(default)]
    pub locked: bool,
}

impl OptionSpec {
    pub fn builder() -> OptionSpecBuilder {
        OptionSpecBuilder::default()
    }

    /// Shorthand for the common case of an unconstrained, unlocked option.
    pub fn new(
        key: impl Into<String>,
        subkey: impl Into<String>,
        default_value: impl Into<OptionValue>,
        kind: OptionKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            subkey: subkey.into(),
            default_value: default_value.into(),
            kind,
            description: description.into(),
            alternatives: None,
            locked: false,
        }
    }

    pub fn with_alternatives<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.alternatives = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

impl OptionSpecBuilder {
    /// Restricts the option to the given values.
    pub fn alternatives<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.alternatives = Some(Some(values.into_iter().map(Into::into).collect()));
        self
    }
}

/// A registered option, as returned by [`Registry::list`](crate::Registry::list).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOption {
    pub key: String,
    pub subkey: String,
    pub kind: OptionKind,
    pub value: OptionValue,
    pub default: OptionValue,
    pub locked: bool,
    pub description: String,
    pub alternatives: Option<Vec<OptionValue>>,
}

impl ConfigOption {
    pub(crate) fn matches(&self, key: &str, subkey: &str) -> bool {
        self.key == key && self.subkey == subkey
    }

    /// Whether `value` is permitted by the alternatives, if any.
    pub fn accepts(&self, value: &OptionValue) -> bool {
        self.alternatives
            .as_ref()
            .is_none_or(|alternatives| alternatives.contains(value))
    }

    pub(crate) fn accepted_values(&self) -> String {
        self.alternatives
            .iter()
            .flatten()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
