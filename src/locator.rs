//! Discovery of options files.
//!
//! A file name is looked up in three places, first match wins:
//!
//! ```text
//! 1. <current dir>/<name>     local
//! 2. <repository root>/<name> project (enclosing git working tree)
//! 3. <home dir>/<name>        user
//! ```
//!
//! Nothing is ever created.
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::{error::Error, format::Format, registry::Registry};

/// Three-tier lookup of a named options file.
///
/// # Example
///
/// ```rust,no_run
/// use next_options::Locator;
///
/// let locator = Locator::new()?;
/// if let Some(path) = locator.locate(".myapp.yaml") {
///     println!("using {}", path.display());
/// }
/// # Ok::<(), next_options::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Locator {
    current_dir: PathBuf,
    home_dir: Option<PathBuf>,
}

impl Locator {
    /// Creates a locator for the process' working directory and the user's
    /// home directory.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            current_dir: std::env::current_dir()?,
            home_dir: dirs::home_dir(),
        })
    }

    #[must_use]
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Skips the user tier.
    #[must_use]
    pub fn without_home_dir(mut self) -> Self {
        self.home_dir = None;
        self
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Root of the git working tree enclosing the current directory.
    ///
    /// Bare repositories and any discovery failure yield `None`.
    pub fn project_root(&self) -> Option<PathBuf> {
        match Repository::discover(&self.current_dir) {
            Ok(repo) => repo.workdir().map(Path::to_path_buf),
            Err(err) => {
                debug!(dir = %self.current_dir.display(), error = %err, "no enclosing repository");
                None
            }
        }
    }

    /// Finds `filename` in the local, project and user tiers, in that order.
    pub fn locate(&self, filename: impl AsRef<Path>) -> Option<PathBuf> {
        let filename = filename.as_ref();

        let local = self.current_dir.join(filename);
        if local.is_file() {
            debug!(path = %local.display(), "found local options file");
            return Some(local);
        }

        if let Some(root) = self.project_root() {
            let project = root.join(filename);
            if project.is_file() {
                debug!(path = %project.display(), "found project options file");
                return Some(project);
            }
        }

        let user = self.home_dir.as_ref()?.join(filename);
        if user.is_file() {
            debug!(path = %user.display(), "found user options file");
            return Some(user);
        }

        None
    }
}

/// Looks `filename` up from the process' working and home directories.
pub fn locate(filename: impl AsRef<Path>) -> Result<Option<PathBuf>, Error> {
    Ok(Locator::new()?.locate(filename))
}

impl Registry {
    /// Locates `filename` and overlays its values, inferring the format from
    /// the extension.
    ///
    /// Returns the path that was loaded, or `None` if no tier has the file.
    pub fn load_located(
        &mut self,
        locator: &Locator,
        filename: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>, Error> {
        let format = Format::from_path(filename.as_ref())?;
        let Some(path) = locator.locate(filename) else {
            return Ok(None);
        };
        self.load_from_file(&path, format)?;
        Ok(Some(path))
    }
}
