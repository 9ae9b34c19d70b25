//! Storage root confinement
//!
//! Every path handed out for reading is resolved with `canonicalize` and
//! compared component-wise against the canonical storage root, so `..`
//! segments, absolute names and symlinks pointing outside the root are all
//! rejected the same way.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::error::FileError;

/// Resolves system filenames to paths that are guaranteed to live under the
/// storage root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for an existing directory. The root is canonicalized
    /// once here; later comparisons use the canonical form.
    pub fn new(root: &Path) -> io::Result<Self> {
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("storage root is not a directory: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Canonical storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a file that is about to be created.
    ///
    /// Only the lexical check applies since the entry does not exist yet; the
    /// name must be a single normal component directly under the root.
    pub fn candidate(&self, system_filename: &str) -> Result<PathBuf, FileError> {
        ensure_single_segment(system_filename)?;
        Ok(self.root.join(system_filename))
    }

    /// Resolve an existing stored file to its verified absolute path.
    ///
    /// # Errors
    /// - `PathEscape` if the name is not a single segment or the resolved
    ///   path lies outside the root
    /// - `FileMissingOnDisk` if nothing exists at the resolved location
    pub fn resolve(&self, system_filename: &str) -> Result<PathBuf, FileError> {
        ensure_single_segment(system_filename)?;

        let resolved = match self.root.join(system_filename).canonicalize() {
            Ok(path) => path,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FileError::FileMissingOnDisk(system_filename.to_string()));
            }
            Err(e) => return Err(FileError::Io(e)),
        };

        if resolved == self.root || !resolved.starts_with(&self.root) {
            return Err(FileError::PathEscape(system_filename.to_string()));
        }

        Ok(resolved)
    }
}

fn ensure_single_segment(system_filename: &str) -> Result<(), FileError> {
    let mut components = Path::new(system_filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) if segment == system_filename => Ok(()),
        _ => Err(FileError::PathEscape(system_filename.to_string())),
    }
}
