//! Registries that font sources are registered against.

use crate::{FontError, FontFace, FontOrigin};
use std::sync::Arc;

/// Backend that makes a family available to a renderer.
pub trait FontRegistry: Send + Sync {
    /// Registers every face of `family`, or fails without registering any.
    fn register(&self, family: &str, faces: &[FontFace]) -> Result<(), FontError>;

    /// Whether faces with a remote origin can be registered at all. Sources with remote faces
    /// are skipped without a registration attempt when this is `false`.
    fn supports_remote(&self) -> bool {
        true
    }
}

impl<T: FontRegistry + ?Sized> FontRegistry for Arc<T> {
    fn register(&self, family: &str, faces: &[FontFace]) -> Result<(), FontError> {
        (**self).register(family, faces)
    }

    fn supports_remote(&self) -> bool {
        (**self).supports_remote()
    }
}

/// Accepts font files present on the local filesystem.
///
/// Remote sources are rejected: nothing in this workspace fetches over HTTP, so a chain
/// built from [`crate::default_chain`] settles on bundled files or the built-in family.
#[derive(Clone, Debug, Default)]
pub struct FileSystemRegistry;

impl FileSystemRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl FontRegistry for FileSystemRegistry {
    fn register(&self, family: &str, faces: &[FontFace]) -> Result<(), FontError> {
        if faces.is_empty() {
            return Err(FontError::NoFaces(family.to_string()));
        }

        for face in faces {
            match &face.origin {
                FontOrigin::Remote(url) => return Err(FontError::RemoteUnsupported(url.clone())),
                FontOrigin::Local(path) => {
                    let metadata = std::fs::metadata(path).map_err(|source| {
                        if source.kind() == std::io::ErrorKind::NotFound {
                            FontError::MissingFile(path.clone())
                        } else {
                            FontError::Read {
                                path: path.clone(),
                                source,
                            }
                        }
                    })?;
                    if !metadata.is_file() || metadata.len() == 0 {
                        return Err(FontError::MissingFile(path.clone()));
                    }
                }
            }
        }

        tracing::debug!("{} faces of {} found on disk", faces.len(), family);
        Ok(())
    }

    fn supports_remote(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_chain, FallbackFontProvider, FontProvider, FontStyle, FontWeight};
    use std::fs;
    use tempfile::TempDir;

    fn write_bundled_fonts(dir: &TempDir) {
        for name in [
            "Roboto-Regular.ttf",
            "Roboto-Bold.ttf",
            "Roboto-Italic.ttf",
            "Roboto-BoldItalic.ttf",
        ] {
            fs::write(dir.path().join(name), b"\0\x01\0\0font").unwrap();
        }
    }

    #[test]
    fn rejects_remote_faces() {
        let face =
            FontFace::remote("https://example.org/a.ttf", FontWeight::Normal, FontStyle::Normal);
        let err = FileSystemRegistry::new().register("Roboto", &[face]).unwrap_err();
        assert!(matches!(err, FontError::RemoteUnsupported(_)));
    }

    #[test]
    fn rejects_missing_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let missing =
            FontFace::local(dir.path().join("nope.ttf"), FontWeight::Normal, FontStyle::Normal);
        let err = FileSystemRegistry::new().register("Roboto", &[missing]).unwrap_err();
        assert!(matches!(err, FontError::MissingFile(_)));

        let empty_path = dir.path().join("empty.ttf");
        fs::write(&empty_path, b"").unwrap();
        let empty = FontFace::local(empty_path, FontWeight::Normal, FontStyle::Normal);
        let err = FileSystemRegistry::new().register("Roboto", &[empty]).unwrap_err();
        assert!(matches!(err, FontError::MissingFile(_)));
    }

    #[test]
    fn default_chain_settles_on_bundled_files() {
        let dir = TempDir::new().unwrap();
        write_bundled_fonts(&dir);
        let provider =
            FallbackFontProvider::new(FileSystemRegistry::new(), default_chain(dir.path()));
        let typeface = provider.ensure_registered();
        assert_eq!(typeface.family, "Roboto");
        assert_eq!(typeface.source, "bundled");
        assert!(typeface.italic);
    }

    #[test]
    fn filesystem_registry_is_local_only() {
        assert!(!FileSystemRegistry::new().supports_remote());
        assert!(!Arc::new(FileSystemRegistry::new()).supports_remote());
    }

    #[test]
    fn default_chain_without_files_uses_builtin() {
        let dir = TempDir::new().unwrap();
        let provider =
            FallbackFontProvider::new(FileSystemRegistry::new(), default_chain(dir.path()));
        let typeface = provider.ensure_registered();
        assert!(typeface.is_builtin());
        assert!(!typeface.italic);
    }
}
