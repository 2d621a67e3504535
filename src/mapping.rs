//! Projection of the registry to plain nested mappings, and bulk loading
//! from them.
//!
//! The canonical on-disk shape is `{key: {subkey: value}}`: values only, no
//! kind, description or lock metadata. Loading such a mapping is an
//! overlay: it only ever changes values of options that are already
//! registered.
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Component, Path, PathBuf},
};

use serde_value::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{
    error::Error,
    evaluator,
    format::Format,
    registry::{Registry, normalize},
    value::OptionValue,
};

/// Current values keyed by key, then subkey.
pub type OptionMap = BTreeMap<String, BTreeMap<String, OptionValue>>;

/// Loosely typed values as read from a file.
pub type RawOptionMap = BTreeMap<String, BTreeMap<String, Value>>;

impl Registry {
    /// Projects the registry to a `{key: {subkey: value}}` mapping.
    pub fn to_mapping(&self) -> OptionMap {
        let mut map = OptionMap::new();
        for option in self.options() {
            map.entry(option.key.clone())
                .or_default()
                .insert(option.subkey.clone(), option.value.clone());
        }
        map
    }

    /// Overlays the values of `map` on the registry.
    ///
    /// Pairs that are not registered are ignored, values equal to the
    /// current one are skipped, and locked options are left untouched. When
    /// an input path does not exist and `base_dir` is given, the path is
    /// retried relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Type errors, values outside the alternatives, and input paths that
    /// cannot be found even after relocation. Values applied before the
    /// failing one stay applied.
    pub fn load_mapping(&mut self, map: &RawOptionMap, base_dir: Option<&Path>) -> Result<(), Error> {
        for (key, subkeys) in map {
            for (subkey, raw) in subkeys {
                self.load_value(key, subkey, raw.clone(), base_dir)?;
            }
        }
        Ok(())
    }

    /// [`load_mapping`](Registry::load_mapping) for already typed values.
    pub fn load_options(&mut self, map: &OptionMap, base_dir: Option<&Path>) -> Result<(), Error> {
        let raw = serde_value::to_value(map)?.deserialize_into::<RawOptionMap>()?;
        self.load_mapping(&raw, base_dir)
    }

    /// Loads an arbitrary decoded document, which must be a mapping of
    /// mappings. An empty document loads nothing.
    pub fn load_document(&mut self, document: Value, base_dir: Option<&Path>) -> Result<(), Error> {
        if matches!(document, Value::Unit | Value::Option(None)) {
            return Ok(());
        }
        let map = document
            .deserialize_into::<RawOptionMap>()
            .map_err(|e| Error::InvalidStructure(e.to_string()))?;
        self.load_mapping(&map, base_dir)
    }

    fn load_value(
        &mut self,
        key: &str,
        subkey: &str,
        raw: Value,
        base_dir: Option<&Path>,
    ) -> Result<(), Error> {
        let (key, subkey) = normalize(key, subkey);
        let Ok(option) = self.entry(&key, &subkey) else {
            debug!(%key, %subkey, "ignoring unregistered option");
            return Ok(());
        };

        let value = evaluator::cast(raw, option.kind)?;
        if value == option.value {
            return Ok(());
        }

        match self.set(&key, &subkey, value.clone()) {
            Ok(()) => Ok(()),
            Err(err) if err.is_locked() => {
                debug!(%key, %subkey, "skipping locked option");
                Ok(())
            }
            Err(Error::PathNotFound(path)) => {
                let Some(base_dir) = base_dir else {
                    return Err(Error::PathNotFound(path));
                };
                let relocated = normalize_path(&base_dir.join(&path));
                debug!(%key, %subkey, path = %relocated.display(), "retrying path relative to base directory");
                self.set(&key, &subkey, relocated).map_err(|err| {
                    warn!(%key, %subkey, error = %err, "input path not found");
                    err
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Serializes the current values in `format`.
    pub fn to_string(&self, format: Format) -> Result<String, Error> {
        format.encode(&self.to_mapping())
    }

    /// Decodes `text` as `format` and overlays it on the registry.
    pub fn load_from_str(
        &mut self,
        text: &str,
        format: Format,
        base_dir: Option<&Path>,
    ) -> Result<(), Error> {
        let document = format.decode(text)?;
        self.load_document(document, base_dir)
    }

    /// Writes the current values to `path`.
    ///
    /// The file is replaced atomically: the contents go to a temporary file
    /// in the same directory, which is then renamed over `path`.
    pub fn write_to_file(&self, path: impl AsRef<Path>, format: Format) -> Result<(), Error> {
        let path = path.as_ref();
        let contents = self.to_string(format)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), %format, "wrote options file");
        Ok(())
    }

    /// Overlays the values stored in `path`.
    ///
    /// Relative input paths that do not resolve from the working directory
    /// are retried relative to the file's directory.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] if `path` is not a file, decoding errors,
    /// and any error of [`load_mapping`](Registry::load_mapping).
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, format: Format) -> Result<(), Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let base_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        self.load_from_str(&contents, format, base_dir)?;
        debug!(path = %path.display(), %format, "loaded options file");
        Ok(())
    }
}

/// Lexically resolves `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}
