//! # Report Core
//!
//! Clinical report pipeline for the patient intake portal.
//!
//! This crate turns a patient/visit field record plus an AI-generated diagnostic narrative
//! into a [`Document`] tree for a renderer:
//! - text sanitisation ([`sanitize`])
//! - block and inline parsing of the narrative dialect ([`markdown`], [`inline`])
//! - document assembly with section visibility and placeholders ([`document`])
//!
//! Every pipeline step is a pure function over its inputs: no I/O, no shared state, no errors.
//! Documents can be built concurrently on any number of threads.
//!
//! **No output encoding**: binary (PDF) rendering and file handling belong to renderers that
//! implement [`render::Renderer`].

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod inline;
pub mod locale;
pub mod markdown;
pub mod record;
pub mod render;
pub mod sanitize;
pub mod text;

pub use config::ReportConfig;
pub use document::{
    assemble, assemble_at, AnalysisPart, Document, FieldEntry, Footer, Header, ReportKind,
    ReportRequest, Section, SectionKind,
};
pub use error::{ReportError, ReportResult};
pub use inline::{inline_parse, strip_markers, Run};
pub use locale::{locale_from_env_value, Locale};
pub use markdown::{
    classify_line, parse_analysis, parse_blocks, Block, BlockStyle, LineKind, ListItem,
};
pub use record::{FieldKey, FieldRecord};
pub use render::{Renderer, TextRenderer};
pub use sanitize::{normalize, normalize_bytes, normalize_utf16};
pub use text::NonEmptyText;

use chrono::{DateTime, FixedOffset};

/// Builds report documents from a configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct ReportService {
    config: ReportConfig,
}

impl ReportService {
    /// Creates a new `ReportService` around `config`.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Assembles a document for `request`, dated now in local time.
    pub fn assemble(&self, request: &ReportRequest<'_>) -> Document {
        self.assemble_at(request, &document::local_now())
    }

    /// Assembles a document for `request` as of `now`.
    pub fn assemble_at(
        &self,
        request: &ReportRequest<'_>,
        now: &DateTime<FixedOffset>,
    ) -> Document {
        let document = assemble_at(&self.config, request, now);
        tracing::debug!(
            "assembled {} report: {} sections ({} visible), {} analysis blocks",
            document.kind,
            document.sections.len(),
            document.visible_sections().count(),
            document.analysis_blocks().len()
        );
        document
    }

    /// Assembles a document and serialises it as pretty JSON for a renderer.
    pub fn assemble_json(&self, request: &ReportRequest<'_>) -> ReportResult<String> {
        let document = self.assemble(request);
        serde_json::to_string_pretty(&document).map_err(ReportError::Serialization)
    }
}
