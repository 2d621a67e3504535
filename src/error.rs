use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization: {0}")]
    Serialization(#[from] serde_value::SerializerError),

    #[error("Deserialization: {0}")]
    Deserialization(#[from] serde_value::DeserializerError),

    #[error("TOML Serialization: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    #[error("TOML Deserialization: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The `(key, subkey)` pair is not present in the registry.
    #[error("Option {key}.{subkey} not registered")]
    NotFound { key: String, subkey: String },

    /// Registration was attempted for a pair that already exists.
    #[error("Option {key}.{subkey} already registered")]
    AlreadyExists { key: String, subkey: String },

    /// Mutation attempted on a locked option.
    #[error("Option {key}.{subkey} is locked")]
    Locked { key: String, subkey: String },

    #[error("Value {value} must be an instance of {kind}")]
    TypeMismatch { kind: String, value: String },

    /// An input path that is set but exists neither as a file nor as a
    /// directory.
    #[error("Path {0} not found")]
    PathNotFound(PathBuf),

    #[error("Option {key}.{subkey} is an unset input path")]
    UnsetPath { key: String, subkey: String },

    /// The value is not one of the option's alternatives.
    #[error("Option {key}.{subkey} does not accept {value}; accepted values are: {accepted}")]
    NotAllowed {
        key: String,
        subkey: String,
        value: String,
        accepted: String,
    },

    #[error("{name} is not a known value type; accepted are {accepted}")]
    UnknownKind { name: String, accepted: String },

    #[error("Unknown format {0}; accepted are yaml, json, toml")]
    InvalidFormat(String),

    /// Flat override sequences must hold a non-zero multiple of 3 values.
    #[error("Overrides must be (key, subkey, value) triples, got {0} values")]
    InvalidOverrides(usize),

    #[error("The input data has to be a mapping of mappings: {0}")]
    InvalidStructure(String),

    #[error("File {0} not found")]
    FileNotFound(PathBuf),

    #[error("Incomplete option definition: {0}")]
    Builder(String),
}

impl Error {
    pub(crate) fn not_found(key: &str, subkey: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
            subkey: subkey.to_string(),
        }
    }

    pub(crate) fn already_exists(key: &str, subkey: &str) -> Self {
        Self::AlreadyExists {
            key: key.to_string(),
            subkey: subkey.to_string(),
        }
    }

    pub(crate) fn locked(key: &str, subkey: &str) -> Self {
        Self::Locked {
            key: key.to_string(),
            subkey: subkey.to_string(),
        }
    }

    pub(crate) fn type_mismatch(kind: impl ToString, value: impl ToString) -> Self {
        Self::TypeMismatch {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_path_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound(_))
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::Builder(err.to_string())
    }
}
