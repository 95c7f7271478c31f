//! # Report fonts
//!
//! Font provisioning for report renderers.
//!
//! A renderer needs a Unicode-capable font family for Cyrillic report text. Registration is
//! attempted against an ordered chain of sources, falling back to weaker ones, and finally to
//! a built-in family that always works. The outcome is settled once per provider and shared
//! by every caller; failures are logged and never returned.
//!
//! **No rendering here**: this crate only decides which family a renderer should use.

pub mod registry;

pub use registry::{FileSystemRegistry, FontRegistry};

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Family used when every source in the chain fails. Has no italic face.
pub const BUILTIN_FAMILY: &str = "Helvetica";

/// Family registered by the default chain.
pub const UNICODE_FAMILY: &str = "Roboto";

const CDN_BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs/ink/3.1.10/fonts/Roboto";
const GOOGLE_FONTS_REGULAR: &str =
    "https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Mu4mxKKTU1Kg.woff2";

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("remote font sources are not supported by this registry: {0}")]
    RemoteUnsupported(String),
    #[error("font file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to read font file {path}: {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font source {0} has no faces")]
    NoFaces(String),
    #[error("font registration rejected: {0}")]
    Rejected(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

/// Where a face is loaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    Remote(String),
    Local(PathBuf),
}

/// One face of a family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFace {
    pub origin: FontOrigin,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontFace {
    pub fn remote(url: impl Into<String>, weight: FontWeight, style: FontStyle) -> Self {
        Self {
            origin: FontOrigin::Remote(url.into()),
            weight,
            style,
        }
    }

    pub fn local(path: impl Into<PathBuf>, weight: FontWeight, style: FontStyle) -> Self {
        Self {
            origin: FontOrigin::Local(path.into()),
            weight,
            style,
        }
    }
}

/// A candidate family registration in the fallback chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSource {
    /// Short name used in logs and in the settled [`Typeface`].
    pub label: String,
    pub family: String,
    pub faces: Vec<FontFace>,
}

impl FontSource {
    fn has_italic(&self) -> bool {
        self.faces.iter().any(|face| face.style == FontStyle::Italic)
    }

    fn is_remote(&self) -> bool {
        self.faces
            .iter()
            .any(|face| matches!(face.origin, FontOrigin::Remote(_)))
    }
}

/// The family a renderer should use, as settled by a [`FontProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typeface {
    pub family: String,
    /// Label of the source that succeeded, or `"builtin"`.
    pub source: String,
    pub italic: bool,
}

impl Typeface {
    pub fn builtin() -> Self {
        Self {
            family: BUILTIN_FAMILY.to_string(),
            source: "builtin".to_string(),
            italic: false,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.source == "builtin"
    }
}

/// Capability handed to renderers for font setup.
///
/// `ensure_registered` is idempotent and safe to call from many threads; every call returns
/// the same typeface.
pub trait FontProvider: Send + Sync {
    fn ensure_registered(&self) -> &Typeface;
}

/// The default chain: CDN Roboto, alternate remote Roboto, bundled Roboto files in `font_dir`.
pub fn default_chain(font_dir: &Path) -> Vec<FontSource> {
    use FontStyle::{Italic, Normal as Upright};
    use FontWeight::{Bold, Normal};

    vec![
        FontSource {
            label: "cdnjs".to_string(),
            family: UNICODE_FAMILY.to_string(),
            faces: vec![
                FontFace::remote(format!("{CDN_BASE}/roboto-regular-webfont.ttf"), Normal, Upright),
                FontFace::remote(format!("{CDN_BASE}/roboto-medium-webfont.ttf"), Bold, Upright),
                FontFace::remote(format!("{CDN_BASE}/roboto-italic-webfont.ttf"), Normal, Italic),
                FontFace::remote(
                    format!("{CDN_BASE}/roboto-bolditalic-webfont.ttf"),
                    Bold,
                    Italic,
                ),
            ],
        },
        FontSource {
            label: "google-fonts".to_string(),
            family: UNICODE_FAMILY.to_string(),
            faces: vec![FontFace::remote(GOOGLE_FONTS_REGULAR, Normal, Upright)],
        },
        FontSource {
            label: "bundled".to_string(),
            family: UNICODE_FAMILY.to_string(),
            faces: vec![
                FontFace::local(font_dir.join("Roboto-Regular.ttf"), Normal, Upright),
                FontFace::local(font_dir.join("Roboto-Bold.ttf"), Bold, Upright),
                FontFace::local(font_dir.join("Roboto-Italic.ttf"), Normal, Italic),
                FontFace::local(font_dir.join("Roboto-BoldItalic.ttf"), Bold, Italic),
            ],
        },
    ]
}

/// Walks a chain of sources once and remembers the outcome.
pub struct FallbackFontProvider<R> {
    registry: R,
    chain: Vec<FontSource>,
    settled: OnceLock<Typeface>,
}

impl<R: FontRegistry> FallbackFontProvider<R> {
    pub fn new(registry: R, chain: Vec<FontSource>) -> Self {
        Self {
            registry,
            chain,
            settled: OnceLock::new(),
        }
    }

    /// Returns the settled typeface without triggering registration.
    pub fn settled(&self) -> Option<&Typeface> {
        self.settled.get()
    }

    fn resolve(&self) -> Typeface {
        for source in &self.chain {
            if source.faces.is_empty() {
                let err = FontError::NoFaces(source.label.clone());
                tracing::warn!("font source {} skipped: {}", source.label, err);
                continue;
            }
            if source.is_remote() && !self.registry.supports_remote() {
                tracing::debug!("font source {} skipped: registry is local-only", source.label);
                continue;
            }
            match self.registry.register(&source.family, &source.faces) {
                Ok(()) => {
                    tracing::info!("++ Registered font {} from {}", source.family, source.label);
                    return Typeface {
                        family: source.family.clone(),
                        source: source.label.clone(),
                        italic: source.has_italic(),
                    };
                }
                Err(e) => {
                    tracing::warn!("font source {} failed: {}", source.label, e);
                }
            }
        }

        tracing::warn!(
            "no font source succeeded, using built-in {}; Cyrillic may not display correctly",
            BUILTIN_FAMILY
        );
        Typeface::builtin()
    }
}

impl<R: FontRegistry> FontProvider for FallbackFontProvider<R> {
    fn ensure_registered(&self) -> &Typeface {
        self.settled.get_or_init(|| self.resolve())
    }
}
