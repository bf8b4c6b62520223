//! Filesystem asset loader.
//!
//! Identifiers are relative paths under a root directory, e.g.
//! `forms/contact.json` or `styles/brand.css`.  Contents are returned
//! verbatim.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::application::ports::{AssetError, AssetLoader};

/// Reads assets from a directory tree.
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `identifier` below the root.  Absolute paths and `..`
    /// components never resolve.
    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        let relative = Path::new(identifier);
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        confined.then(|| self.root.join(relative))
    }
}

impl AssetLoader for FsAssetLoader {
    fn load_text(&self, identifier: &str) -> Result<String, AssetError> {
        let not_found = || AssetError::NotFound {
            identifier: identifier.to_owned(),
        };
        let path = self.resolve(identifier).ok_or_else(not_found)?;
        debug!(path = %path.display(), "loading asset");
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => not_found(),
            _ => AssetError::Io {
                identifier: identifier.to_owned(),
                source,
            },
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn loader_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FsAssetLoader) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        let loader = FsAssetLoader::new(dir.path());
        (dir, loader)
    }

    #[test]
    fn test_load_text_returns_contents_verbatim() {
        // Arrange
        let (_dir, loader) = loader_with(&[("forms/contact.json", "{\n  \"fields\": []\n}\n")]);

        // Act
        let text = loader.load_text("forms/contact.json").unwrap();

        // Assert
        assert_eq!(text, "{\n  \"fields\": []\n}\n");
    }

    #[test]
    fn test_missing_asset_is_not_found() {
        let (_dir, loader) = loader_with(&[]);

        let err = loader.load_text("forms/absent.json").unwrap_err();

        assert!(matches!(err, AssetError::NotFound { identifier } if identifier == "forms/absent.json"));
    }

    #[test]
    fn test_parent_components_do_not_escape_root() {
        let (_dir, loader) = loader_with(&[("a.css", "a")]);

        assert!(matches!(
            loader.load_text("../a.css"),
            Err(AssetError::NotFound { .. })
        ));
        assert!(matches!(
            loader.load_text("/etc/hostname"),
            Err(AssetError::NotFound { .. })
        ));
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let (_dir, loader) = loader_with(&[("forms/a.json", "{}")]);

        let err = loader.load_text("forms").unwrap_err();

        assert!(matches!(err, AssetError::Io { .. }));
    }
}
