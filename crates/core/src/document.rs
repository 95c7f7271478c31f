//! Document assembly.
//!
//! Merges a [`FieldRecord`] with the parsed analysis narrative into one [`Document`] tree for
//! a renderer. Assembly is a pure structural merge: no I/O, no errors. Missing field values
//! stay absent in the tree and are shown with [`MISSING_VALUE_PLACEHOLDER`].
//!
//! Two report kinds share the tree: the analysis report (questionnaire sections followed by
//! the analysis narrative) and the questionnaire-only report (numbered sections, all shown).

use crate::config::ReportConfig;
use crate::constants::{
    ANALYSIS_NOTE, ANALYSIS_TITLE, EXAMINATION_TITLE_NOTE, GENERATED_BY_PREFIX,
    MISSING_VALUE_PLACEHOLDER, PAGE_NUMBER_PLACEHOLDER, QUESTIONNAIRE_DATE_CAPTION,
    QUESTIONNAIRE_TITLE, REPORT_DATE_CAPTION, REPORT_SUBTITLE, REPORT_TITLE,
};
use crate::error::ReportError;
use crate::locale::Locale;
use crate::markdown::{parse_analysis, Block};
use crate::record::{FieldKey, FieldRecord};
use crate::sanitize::normalize;
use crate::text::NonEmptyText;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which report a document is assembled as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Questionnaire sections plus the analysis narrative.
    #[default]
    Analysis,
    /// Questionnaire sections only, every section shown.
    Questionnaire,
}

impl ReportKind {
    pub fn tag(self) -> &'static str {
        match self {
            ReportKind::Analysis => "analysis",
            ReportKind::Questionnaire => "questionnaire",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" => Ok(ReportKind::Analysis),
            "questionnaire" => Ok(ReportKind::Questionnaire),
            _ => Err(ReportError::InvalidInput(format!("unknown report kind: {s}"))),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub key: FieldKey,
    pub label: String,
    pub value: Option<NonEmptyText>,
    /// The value as shown: the text itself, or the placeholder when absent.
    pub display: String,
}

impl FieldEntry {
    fn from_record(record: &FieldRecord, key: FieldKey) -> Self {
        let value = normalize(record.value(key));
        let value = NonEmptyText::from_optional(Some(&value));
        let display = value
            .as_ref()
            .map_or(MISSING_VALUE_PLACEHOLDER, NonEmptyText::as_str)
            .to_string();
        Self {
            key,
            label: key.label().to_string(),
            value,
            display,
        }
    }

    /// The value as shown in the report, or the placeholder when absent.
    pub fn rendered_value(&self) -> &str {
        self.value
            .as_ref()
            .map_or(MISSING_VALUE_PLACEHOLDER, NonEmptyText::as_str)
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// The fixed field groups of a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    PersonalData,
    ClinicVisit,
    LifeHistory,
    Examination,
}

impl SectionKind {
    /// All sections in report order.
    pub const ALL: [SectionKind; 4] = [
        SectionKind::PersonalData,
        SectionKind::ClinicVisit,
        SectionKind::LifeHistory,
        SectionKind::Examination,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::PersonalData => "Личные данные",
            SectionKind::ClinicVisit => "Обращение в клинику",
            SectionKind::LifeHistory => "Анамнез жизни",
            SectionKind::Examination => "Объективное обследование",
        }
    }

    pub fn fields(self) -> &'static [FieldKey] {
        match self {
            SectionKind::PersonalData => &[
                FieldKey::FullName,
                FieldKey::Passport,
                FieldKey::BirthDate,
                FieldKey::Gender,
                FieldKey::MaritalStatus,
                FieldKey::Education,
                FieldKey::Job,
                FieldKey::Address,
            ],
            SectionKind::ClinicVisit => &[
                FieldKey::AdmissionDate,
                FieldKey::ReferralDiagnosis,
                FieldKey::MainComplaints,
                FieldKey::MainComplaintsDetail,
                FieldKey::GeneralComplaints,
                FieldKey::AdditionalComplaints,
                FieldKey::FirstSymptomsDate,
                FieldKey::FirstSymptoms,
                FieldKey::Triggers,
                FieldKey::SymptomsDynamic,
                FieldKey::PreviousDiagnosis,
                FieldKey::CurrentState,
            ],
            SectionKind::LifeHistory => &[
                FieldKey::BadHabits,
                FieldKey::FamilyHistory,
                FieldKey::Allergies,
                FieldKey::PastDiseases,
            ],
            SectionKind::Examination => &[
                FieldKey::GeneralExamination,
                FieldKey::HeadNeck,
                FieldKey::Skin,
                FieldKey::Respiratory,
                FieldKey::Cardiovascular,
                FieldKey::Abdomen,
                FieldKey::Musculoskeletal,
                FieldKey::LymphNodes,
                FieldKey::AbdomenPalpation,
                FieldKey::Percussion,
                FieldKey::LungAuscultation,
                FieldKey::HeartAuscultation,
                FieldKey::AbdomenAuscultation,
            ],
        }
    }

    /// Fields that decide visibility. `None` means the section is always shown.
    pub fn governing_fields(self) -> Option<&'static [FieldKey]> {
        match self {
            SectionKind::ClinicVisit => Some(&[
                FieldKey::AdmissionDate,
                FieldKey::ReferralDiagnosis,
                FieldKey::MainComplaints,
            ]),
            SectionKind::PersonalData | SectionKind::LifeHistory | SectionKind::Examination => {
                None
            }
        }
    }
}

/// A titled group of field entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub fields: Vec<FieldEntry>,
    pub visible: bool,
}

impl Section {
    fn build(
        kind: SectionKind,
        record: &FieldRecord,
        report: ReportKind,
        ordinal: usize,
    ) -> Self {
        let fields: Vec<FieldEntry> = kind
            .fields()
            .iter()
            .map(|key| FieldEntry::from_record(record, *key))
            .collect();

        let visible = match (report, kind.governing_fields()) {
            (ReportKind::Analysis, Some(governing)) => fields
                .iter()
                .any(|entry| entry.is_present() && governing.contains(&entry.key)),
            _ => true,
        };

        let title = match (report, kind) {
            (ReportKind::Analysis, _) => kind.title().to_string(),
            (ReportKind::Questionnaire, SectionKind::Examination) => {
                format!("{ordinal}. {} {EXAMINATION_TITLE_NOTE}", kind.title())
            }
            (ReportKind::Questionnaire, _) => format!("{ordinal}. {}", kind.title()),
        };

        Self {
            kind,
            title,
            fields,
            visible,
        }
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldEntry> {
        self.fields.iter().find(|entry| entry.key == key)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Asset handle for the logo; passed through to the renderer unloaded.
    pub logo_ref: String,
    pub brand: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub date_caption: String,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub generated_by: String,
    pub date: String,
    /// Resolved by the renderer once pagination is known.
    pub page_placeholder: String,
}

/// The assembled report, ready for a renderer.
/// The narrative part of an analysis report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPart {
    pub title: String,
    pub note: String,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub kind: ReportKind,
    pub locale: Locale,
    pub header: Header,
    pub sections: Vec<Section>,
    /// Absent for the questionnaire-only report.
    pub analysis: Option<AnalysisPart>,
    pub footer: Footer,
}

impl Document {
    /// Blocks of the analysis narrative; empty when the document has no analysis part.
    pub fn analysis_blocks(&self) -> &[Block] {
        match &self.analysis {
            Some(analysis) => &analysis.blocks,
            None => &[],
        }
    }

    pub fn visible_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|section| section.visible)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

/// Inputs for one report.
#[derive(Clone, Copy, Debug)]
pub struct ReportRequest<'a> {
    pub kind: ReportKind,
    pub record: &'a FieldRecord,
    pub analysis_text: Option<&'a str>,
    /// Overrides the configured locale.
    pub locale: Option<Locale>,
    /// Overrides the configured logo handle.
    pub logo_ref: Option<&'a str>,
}

impl<'a> ReportRequest<'a> {
    pub fn new(record: &'a FieldRecord, analysis_text: &'a str) -> Self {
        Self {
            kind: ReportKind::Analysis,
            record,
            analysis_text: Some(analysis_text),
            locale: None,
            logo_ref: None,
        }
    }
}

/// Assembles a document for `request` as of `now`.
pub fn assemble_at(
    config: &ReportConfig,
    request: &ReportRequest<'_>,
    now: &DateTime<FixedOffset>,
) -> Document {
    let locale = request.locale.unwrap_or(config.locale());
    let logo_ref = request
        .logo_ref
        .map(str::trim)
        .filter(|logo| !logo.is_empty())
        .unwrap_or(config.logo_ref());

    let sections: Vec<Section> = SectionKind::ALL
        .iter()
        .enumerate()
        .map(|(index, kind)| Section::build(*kind, request.record, request.kind, index + 1))
        .collect();
    for hidden in sections.iter().filter(|section| !section.visible) {
        tracing::debug!("section {:?} hidden: governing fields empty", hidden.kind);
    }

    let (title, subtitle, date_caption, analysis) = match request.kind {
        ReportKind::Analysis => (
            REPORT_TITLE,
            Some(REPORT_SUBTITLE.to_string()),
            REPORT_DATE_CAPTION,
            Some(AnalysisPart {
                title: ANALYSIS_TITLE.to_string(),
                note: ANALYSIS_NOTE.to_string(),
                blocks: parse_analysis(request.analysis_text),
            }),
        ),
        ReportKind::Questionnaire => (QUESTIONNAIRE_TITLE, None, QUESTIONNAIRE_DATE_CAPTION, None),
    };

    Document {
        kind: request.kind,
        locale,
        header: Header {
            logo_ref: logo_ref.to_string(),
            brand: config.brand().to_string(),
            title: title.to_string(),
            subtitle,
            date_caption: date_caption.to_string(),
            date: locale.format_long(now),
        },
        sections,
        analysis,
        footer: Footer {
            generated_by: format!("{} {}", GENERATED_BY_PREFIX, config.brand()),
            date: locale.format_short(now),
            page_placeholder: PAGE_NUMBER_PLACEHOLDER.to_string(),
        },
    }
}

/// Assembles a document with the default configuration, dated now in local time.
pub fn assemble(record: &FieldRecord, analysis_text: &str, locale: Locale) -> Document {
    let request = ReportRequest {
        locale: Some(locale),
        ..ReportRequest::new(record, analysis_text)
    };
    assemble_at(&ReportConfig::default(), &request, &local_now())
}

pub(crate) fn local_now() -> DateTime<FixedOffset> {
    let now = Local::now();
    now.with_timezone(now.offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LOGO_REF;
    use crate::inline::Run;

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-17T09:30:00+05:00").unwrap()
    }

    fn record() -> FieldRecord {
        FieldRecord {
            full_name: Some("Ivanov I.".into()),
            passport: None,
            gender: Some("   ".into()),
            ..FieldRecord::default()
        }
    }

    #[test]
    fn absent_and_blank_values_render_placeholder() {
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&record(), ""),
            &at(),
        );
        let personal = document.section(SectionKind::PersonalData).unwrap();
        assert_eq!(
            personal.field(FieldKey::FullName).unwrap().rendered_value(),
            "Ivanov I."
        );
        assert_eq!(
            personal.field(FieldKey::Passport).unwrap().rendered_value(),
            MISSING_VALUE_PLACEHOLDER
        );
        assert_eq!(
            personal.field(FieldKey::Gender).unwrap().rendered_value(),
            MISSING_VALUE_PLACEHOLDER
        );
    }

    #[test]
    fn field_values_are_sanitised() {
        let record = FieldRecord {
            full_name: Some("\u{feff}Ivanov\u{0} I.".into()),
            ..FieldRecord::default()
        };
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&record, ""),
            &at(),
        );
        let entry = document.sections[0].field(FieldKey::FullName).unwrap();
        assert_eq!(entry.rendered_value(), "Ivanov I.");
    }

    #[test]
    fn clinic_visit_hidden_without_governing_fields() {
        let record = FieldRecord {
            triggers: Some("stress".into()),
            ..FieldRecord::default()
        };
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&record, ""),
            &at(),
        );
        assert!(!document.section(SectionKind::ClinicVisit).unwrap().visible);
        assert!(document.section(SectionKind::PersonalData).unwrap().visible);
        assert!(document.section(SectionKind::LifeHistory).unwrap().visible);
        assert!(document.section(SectionKind::Examination).unwrap().visible);
        assert_eq!(document.visible_sections().count(), 3);
    }

    #[test]
    fn clinic_visit_shown_with_any_governing_field() {
        for record in [
            FieldRecord {
                admission_date: Some("2026-10-01".into()),
                ..FieldRecord::default()
            },
            FieldRecord {
                referral_diagnosis: Some("K29".into()),
                ..FieldRecord::default()
            },
            FieldRecord {
                main_complaints: Some("боль".into()),
                ..FieldRecord::default()
            },
        ] {
            let document = assemble_at(
                &ReportConfig::default(),
                &ReportRequest::new(&record, ""),
                &at(),
            );
            assert!(document.section(SectionKind::ClinicVisit).unwrap().visible);
        }
    }

    #[test]
    fn sections_follow_schema_order_and_sizes() {
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&FieldRecord::default(), ""),
            &at(),
        );
        let sizes: Vec<(SectionKind, usize)> = document
            .sections
            .iter()
            .map(|s| (s.kind, s.fields.len()))
            .collect();
        assert_eq!(
            sizes,
            vec![
                (SectionKind::PersonalData, 8),
                (SectionKind::ClinicVisit, 12),
                (SectionKind::LifeHistory, 4),
                (SectionKind::Examination, 13),
            ]
        );
    }

    #[test]
    fn header_and_footer_metadata() {
        let record = FieldRecord::default();
        let request = ReportRequest {
            locale: Some(Locale::En),
            ..ReportRequest::new(&record, "")
        };
        let document = assemble_at(&ReportConfig::default(), &request, &at());
        assert_eq!(document.locale, Locale::En);
        assert_eq!(document.header.logo_ref, DEFAULT_LOGO_REF);
        assert_eq!(document.header.brand, "AviShifo");
        assert_eq!(document.header.title, REPORT_TITLE);
        assert_eq!(document.header.date, "October 17, 2026, 09:30 AM");
        assert_eq!(document.footer.generated_by, "Сгенерировано системой AviShifo");
        assert_eq!(document.footer.date, "10/17/2026");
        assert_eq!(document.footer.page_placeholder, PAGE_NUMBER_PLACEHOLDER);
    }

    #[test]
    fn request_logo_overrides_config() {
        let record = FieldRecord::default();
        let request = ReportRequest {
            logo_ref: Some("asset://clinic-logo"),
            ..ReportRequest::new(&record, "")
        };
        let document = assemble_at(&ReportConfig::default(), &request, &at());
        assert_eq!(document.header.logo_ref, "asset://clinic-logo");
    }

    #[test]
    fn analysis_is_sanitised_and_parsed() {
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&FieldRecord::default(), "\u{feff}**Итог**: норма"),
            &at(),
        );
        assert_eq!(
            document.analysis_blocks(),
            [Block::Paragraph {
                runs: vec![Run::bold("Итог"), Run::plain(": норма")]
            }]
        );
    }

    #[test]
    fn missing_analysis_yields_no_blocks() {
        let record = FieldRecord::default();
        let request = ReportRequest {
            analysis_text: None,
            ..ReportRequest::new(&record, "")
        };
        let document = assemble_at(&ReportConfig::default(), &request, &at());
        let analysis = document.analysis.as_ref().unwrap();
        assert!(analysis.blocks.is_empty());
        assert_eq!(analysis.title, ANALYSIS_TITLE);
        assert_eq!(analysis.note, ANALYSIS_NOTE);
    }

    #[test]
    fn assemble_uses_requested_locale() {
        let document = assemble(&record(), "text", Locale::Uz);
        assert_eq!(document.locale, Locale::Uz);
        assert_eq!(document.analysis_blocks().len(), 1);
    }

    #[test]
    fn missing_values_serialise_with_display_text() {
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&record(), ""),
            &at(),
        );
        let json = serde_json::to_value(&document).unwrap();
        let passport = &json["sections"][0]["fields"][1];
        assert_eq!(passport["key"], "passport");
        assert!(passport["value"].is_null());
        assert_eq!(passport["display"], MISSING_VALUE_PLACEHOLDER);
        assert_eq!(json["sections"][0]["fields"][0]["display"], "Ivanov I.");
    }

    fn questionnaire(record: &FieldRecord) -> Document {
        let request = ReportRequest {
            kind: ReportKind::Questionnaire,
            ..ReportRequest::new(record, "# ignored")
        };
        assemble_at(&ReportConfig::default(), &request, &at())
    }

    #[test]
    fn questionnaire_has_no_analysis_part() {
        let document = questionnaire(&record());
        assert_eq!(document.kind, ReportKind::Questionnaire);
        assert!(document.analysis.is_none());
        assert!(document.analysis_blocks().is_empty());
        assert_eq!(document.header.title, QUESTIONNAIRE_TITLE);
        assert_eq!(document.header.subtitle, None);
        assert_eq!(document.header.date_caption, QUESTIONNAIRE_DATE_CAPTION);
    }

    #[test]
    fn questionnaire_shows_every_section_with_numbered_titles() {
        let document = questionnaire(&FieldRecord::default());
        assert_eq!(document.visible_sections().count(), 4);
        let titles: Vec<&str> = document.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "1. Личные данные",
                "2. Обращение в клинику",
                "3. Анамнез жизни",
                "4. Объективное обследование (заполняется врачом)",
            ]
        );
    }

    #[test]
    fn analysis_report_keeps_plain_titles_and_subtitle() {
        let document = assemble_at(
            &ReportConfig::default(),
            &ReportRequest::new(&FieldRecord::default(), ""),
            &at(),
        );
        assert_eq!(document.kind, ReportKind::Analysis);
        assert_eq!(document.sections[0].title, "Личные данные");
        assert_eq!(document.header.subtitle.as_deref(), Some(REPORT_SUBTITLE));
    }

    #[test]
    fn report_kind_parses_case_insensitively() {
        assert_eq!(" Questionnaire ".parse::<ReportKind>().unwrap(), ReportKind::Questionnaire);
        assert_eq!("analysis".parse::<ReportKind>().unwrap(), ReportKind::Analysis);
        assert!("summary".parse::<ReportKind>().is_err());
    }
}
