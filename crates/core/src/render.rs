//! Renderer contract and a plain-text renderer.
//!
//! Binary output belongs to external renderers; they implement [`Renderer`] and receive the
//! font capability alongside the document. [`TextRenderer`] is the in-tree implementation,
//! used for terminal previews.

use crate::constants::PAGE_NUMBER_PLACEHOLDER;
use crate::document::{Document, FieldEntry, Section};
use crate::inline::{runs_text, strip_markers, Run};
use crate::markdown::{Block, BlockStyle};
use report_fonts::FontProvider;
use std::fmt::Write;

/// Turns a [`Document`] into output.
pub trait Renderer {
    type Output;

    fn render(&self, document: &Document, fonts: &dyn FontProvider) -> Self::Output;
}

/// Renders a document as readable plain text on a single page.
///
/// Bold runs are written back as `**text**`. Italic text (the missing-value placeholder and
/// the analysis note) is wrapped in `_` only when the typeface has an italic face.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, document: &Document, fonts: &dyn FontProvider) -> String {
        let italic = fonts.ensure_registered().italic;
        let mut out = String::new();

        let header = &document.header;
        let _ = writeln!(out, "[logo: {}]", header.logo_ref);
        let _ = writeln!(out, "{}", header.brand);
        let _ = writeln!(out, "{}", header.title);
        if let Some(subtitle) = &header.subtitle {
            let _ = writeln!(out, "{subtitle}");
        }
        let _ = writeln!(out, "{} {}", header.date_caption, header.date);

        for section in document.visible_sections() {
            out.push('\n');
            write_section(&mut out, section, italic);
        }

        if let Some(analysis) = &document.analysis {
            out.push('\n');
            underline(&mut out, &analysis.title, '=');
            let _ = writeln!(out, "{}", emphasize(&analysis.note, italic));
            for block in &analysis.blocks {
                out.push('\n');
                write_block(&mut out, block);
            }
        }

        let footer = &document.footer;
        let page = footer.page_placeholder.replace(PAGE_NUMBER_PLACEHOLDER, "1/1");
        let _ = writeln!(out, "\n{} • {} • {}", footer.generated_by, footer.date, page);
        out
    }
}

fn write_section(out: &mut String, section: &Section, italic: bool) {
    underline(out, &section.title, '-');
    for entry in &section.fields {
        write_field(out, entry, italic);
    }
}

fn write_field(out: &mut String, entry: &FieldEntry, italic: bool) {
    let value = if entry.is_present() {
        entry.rendered_value().to_string()
    } else {
        emphasize(entry.rendered_value(), italic)
    };
    let _ = writeln!(out, "{}: {}", entry.label, value);
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { runs, .. } => {
            let text = strip_markers(&runs_text(runs));
            let rule = match block.style() {
                BlockStyle::MainHeading => '=',
                _ => '-',
            };
            underline(out, &text, rule);
        }
        Block::ListGroup { ordered, items } => {
            for (index, item) in items.iter().enumerate() {
                let marker = if *ordered {
                    format!("{}.", index + 1)
                } else {
                    "•".to_string()
                };
                let _ = writeln!(out, "  {} {}", marker, styled(&item.runs));
            }
        }
        Block::Paragraph { runs } => {
            let _ = writeln!(out, "{}", styled(runs));
        }
    }
}

fn styled(runs: &[Run]) -> String {
    runs.iter()
        .map(|run| match run {
            Run::Plain { text } => text.clone(),
            Run::Bold { text } => format!("**{text}**"),
        })
        .collect()
}

fn emphasize(text: &str, italic: bool) -> String {
    if italic {
        format!("_{text}_")
    } else {
        text.to_string()
    }
}

fn underline(out: &mut String, text: &str, rule: char) {
    let width = text.chars().count().max(1);
    let _ = writeln!(out, "{text}");
    let _ = writeln!(out, "{}", rule.to_string().repeat(width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::constants::{ANALYSIS_NOTE, ANALYSIS_TITLE, QUESTIONNAIRE_TITLE, REPORT_SUBTITLE};
    use crate::document::{assemble_at, ReportKind, ReportRequest};
    use crate::record::FieldRecord;
    use chrono::DateTime;
    use report_fonts::Typeface;

    struct FixedFonts(Typeface);

    impl FontProvider for FixedFonts {
        fn ensure_registered(&self) -> &Typeface {
            &self.0
        }
    }

    fn roboto() -> FixedFonts {
        FixedFonts(Typeface {
            family: "Roboto".into(),
            source: "bundled".into(),
            italic: true,
        })
    }

    fn document(analysis: &str) -> Document {
        let record = FieldRecord {
            full_name: Some("Ivanov I.".into()),
            ..FieldRecord::default()
        };
        let at = DateTime::parse_from_rfc3339("2026-10-17T09:30:00+05:00").unwrap();
        assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&record, analysis),
            &at,
        )
    }

    #[test]
    fn renders_fields_with_placeholder() {
        let text = TextRenderer::new().render(&document(""), &roboto());
        assert!(text.contains("Ф.И.О: Ivanov I.\n"));
        assert!(text.contains("Паспорт: _—_\n"));
    }

    #[test]
    fn builtin_typeface_drops_italics() {
        let text = TextRenderer::new().render(&document(""), &FixedFonts(Typeface::builtin()));
        assert!(text.contains("Паспорт: —\n"));
        assert!(text.contains(&format!("{ANALYSIS_NOTE}\n")));
    }

    #[test]
    fn hidden_sections_are_skipped() {
        let text = TextRenderer::new().render(&document(""), &roboto());
        assert!(text.contains("Личные данные\n"));
        assert!(!text.contains("Обращение в клинику"));
        assert!(text.contains("Анамнез жизни\n"));
    }

    #[test]
    fn renders_analysis_blocks() {
        let analysis = "# Итог\n## **Диагноз**\n1. First\n2. Second\n- a\n\nConclusion **text**.";
        let text = TextRenderer::new().render(&document(analysis), &roboto());
        assert!(text.contains("Итог\n====\n"));
        assert!(text.contains("Диагноз\n-------\n"));
        assert!(text.contains("  1. First\n  2. Second\n"));
        assert!(text.contains("  • a\n"));
        assert!(text.contains("Conclusion **text**.\n"));
    }

    #[test]
    fn footer_resolves_page_placeholder() {
        let text = TextRenderer::new().render(&document(""), &roboto());
        assert!(text.ends_with("Сгенерировано системой AviShifo • 17.10.2026 • 1/1\n"));
    }

    #[test]
    fn questionnaire_renders_all_sections_and_no_analysis() {
        let record = FieldRecord::default();
        let request = ReportRequest {
            kind: ReportKind::Questionnaire,
            ..ReportRequest::new(&record, "# Итог")
        };
        let at = DateTime::parse_from_rfc3339("2026-10-17T09:30:00+05:00").unwrap();
        let document = assemble_at(&ReportConfig::default(), &request, &at);
        let text = TextRenderer::new().render(&document, &roboto());

        assert!(text.contains(&format!("{QUESTIONNAIRE_TITLE}\n")));
        assert!(!text.contains(REPORT_SUBTITLE));
        assert!(text.contains("2. Обращение в клинику\n"));
        assert!(!text.contains(ANALYSIS_TITLE));
        assert!(!text.contains("Итог"));
    }
}
