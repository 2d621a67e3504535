use std::{fmt, path::Path, str::FromStr};

use serde_value::Value;

use crate::{error::Error, mapping::OptionMap};

/// On-disk representation of an [`OptionMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Block-style YAML.
    Yaml,
    /// JSON with 2-space indentation.
    Json,
    /// TOML, one table per key. Unset paths are omitted.
    Toml,
}

impl Format {
    /// Infers the format from a file extension (`yaml`, `yml`, `json`,
    /// `toml`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") => Ok(Format::Yaml),
            Some(ext) => ext.parse(),
            None => Err(Error::InvalidFormat(path.display().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    pub(crate) fn encode(&self, map: &OptionMap) -> Result<String, Error> {
        match self {
            Format::Yaml => Ok(serde_yaml::to_string(map)?),
            Format::Json => Ok(serde_json::to_string_pretty(map)?),
            Format::Toml => {
                let mut map = map.clone();
                for subkeys in map.values_mut() {
                    subkeys.retain(|_, value| !value.is_unset_path());
                }
                Ok(toml::to_string_pretty(&map)?)
            }
        }
    }

    pub(crate) fn decode(&self, text: &str) -> Result<Value, Error> {
        if text.trim().is_empty() {
            return Ok(Value::Unit);
        }
        match self {
            Format::Yaml => Ok(serde_yaml::from_str(text)?),
            Format::Json => Ok(serde_json::from_str(text)?),
            Format::Toml => Ok(toml::from_str(text)?),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
