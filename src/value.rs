use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Serialize, Serializer};

use crate::error::Error;

/// Tags accepted by [`OptionKind::from_str`], in declaration order.
pub const ACCEPTED_KINDS: &[&str] = &[
    "int", "float", "bool", "text", "string", "path_in", "path_out",
];

/// The declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Int,
    Float,
    Bool,
    /// Free text, conventionally paired with a list of alternatives.
    Text,
    String,
    /// A path that must exist as a file or directory, or be unset.
    PathIn,
    /// A path that is not checked for existence.
    PathOut,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Int => "int",
            OptionKind::Float => "float",
            OptionKind::Bool => "bool",
            OptionKind::Text => "text",
            OptionKind::String => "string",
            OptionKind::PathIn => "path_in",
            OptionKind::PathOut => "path_out",
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self, OptionKind::PathIn | OptionKind::PathOut)
    }
}

impl FromStr for OptionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" => Ok(OptionKind::Int),
            "float" => Ok(OptionKind::Float),
            "bool" => Ok(OptionKind::Bool),
            "text" => Ok(OptionKind::Text),
            "string" => Ok(OptionKind::String),
            "path_in" => Ok(OptionKind::PathIn),
            "path_out" => Ok(OptionKind::PathOut),
            other => Err(Error::UnknownKind {
                name: other.to_string(),
                accepted: ACCEPTED_KINDS.join(","),
            }),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registry-native option value.
///
/// Serializes as the bare scalar, so a mapping of values renders as plain
/// YAML/JSON/TOML. An unset path serializes as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Path(Option<PathBuf>),
}

impl OptionValue {
    /// Name of the variant, used in type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::Bool(_) => "bool",
            OptionValue::Text(_) => "text",
            OptionValue::Path(_) => "path",
        }
    }

    pub fn is_unset_path(&self) -> bool {
        matches!(self, OptionValue::Path(None))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            OptionValue::Path(Some(p)) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::Bool(v) => write!(f, "{v}"),
            OptionValue::Text(v) => f.write_str(v),
            OptionValue::Path(Some(p)) => write!(f, "{}", p.display()),
            OptionValue::Path(None) => f.write_str("<unset>"),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Int(v) => serializer.serialize_i64(*v),
            OptionValue::Float(v) => serializer.serialize_f64(*v),
            OptionValue::Bool(v) => serializer.serialize_bool(*v),
            OptionValue::Text(v) => serializer.serialize_str(v),
            OptionValue::Path(Some(p)) => serializer.serialize_str(&p.to_string_lossy()),
            OptionValue::Path(None) => serializer.serialize_none(),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OptionValue {
                fn from(v: $ty) -> Self {
                    OptionValue::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        OptionValue::Float(f64::from(v))
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Text(v)
    }
}

impl From<&String> for OptionValue {
    fn from(v: &String) -> Self {
        OptionValue::Text(v.clone())
    }
}

impl From<PathBuf> for OptionValue {
    fn from(v: PathBuf) -> Self {
        OptionValue::Path(Some(v))
    }
}

impl From<&Path> for OptionValue {
    fn from(v: &Path) -> Self {
        OptionValue::Path(Some(v.to_path_buf()))
    }
}

impl From<Option<PathBuf>> for OptionValue {
    fn from(v: Option<PathBuf>) -> Self {
        OptionValue::Path(v)
    }
}

impl TryFrom<OptionValue> for i64 {
    type Error = Error;

    fn try_from(value: OptionValue) -> Result<Self, Self::Error> {
        value
            .as_i64()
            .ok_or_else(|| Error::type_mismatch("int", &value))
    }
}

impl TryFrom<OptionValue> for f64 {
    type Error = Error;

    fn try_from(value: OptionValue) -> Result<Self, Self::Error> {
        value
            .as_f64()
            .ok_or_else(|| Error::type_mismatch("float", &value))
    }
}

impl TryFrom<OptionValue> for bool {
    type Error = Error;

    fn try_from(value: OptionValue) -> Result<Self, Self::Error> {
        value
            .as_bool()
            .ok_or_else(|| Error::type_mismatch("bool", &value))
    }
}

impl TryFrom<OptionValue> for String {
    type Error = Error;

    fn try_from(value: OptionValue) -> Result<Self, Self::Error> {
        match value {
            OptionValue::Text(v) => Ok(v),
            other => Err(Error::type_mismatch("text", &other)),
        }
    }
}

impl TryFrom<OptionValue> for PathBuf {
    type Error = Error;

    fn try_from(value: OptionValue) -> Result<Self, Self::Error> {
        match value {
            OptionValue::Path(Some(p)) => Ok(p),
            other => Err(Error::type_mismatch("path", &other)),
        }
    }
}

impl TryFrom<OptionValue> for Option<PathBuf> {
    type Error = Error;

    fn try_from(value: OptionValue) -> Result<Self, Self::Error> {
        match value {
            OptionValue::Path(p) => Ok(p),
            other => Err(Error::type_mismatch("path", &other)),
        }
    }
}
