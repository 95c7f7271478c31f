//! Constants used throughout the report core crate.
//!
//! Fixed report wording lives here so that the assembler and the text renderer agree on it.
//! Report content is in Russian; only dates follow the requested locale.

/// Rendered in place of a missing or empty field value.
pub const MISSING_VALUE_PLACEHOLDER: &str = "—";

/// Version of the field record schema accepted from the form subsystem.
pub const FIELD_RECORD_VERSION: u32 = 1;

/// Default brand name shown under the logo.
pub const DEFAULT_BRAND: &str = "AviShifo";

/// Asset handle used when the caller does not supply a logo.
pub const DEFAULT_LOGO_REF: &str = "/logologin.png";

/// Default directory holding bundled font files.
pub const DEFAULT_FONT_DIR: &str = "fonts";

/// Report title in the header.
pub const REPORT_TITLE: &str = "Результаты анализа медицинской анкеты";

/// Report subtitle in the header.
pub const REPORT_SUBTITLE: &str = "Анализ данных пациента с использованием ИИ";

/// Caption preceding the header date.
pub const REPORT_DATE_CAPTION: &str = "Дата анализа:";

/// Title of the questionnaire-only report.
pub const QUESTIONNAIRE_TITLE: &str = "Медицинская анкета пациента";

/// Caption preceding the header date of the questionnaire-only report.
pub const QUESTIONNAIRE_DATE_CAPTION: &str = "Дата заполнения:";

/// Appended to the examination section title in the questionnaire-only report.
pub const EXAMINATION_TITLE_NOTE: &str = "(заполняется врачом)";

/// Title above the analysis blocks.
pub const ANALYSIS_TITLE: &str = "Результаты анализа данных пациента";

/// Note shown under the analysis title.
pub const ANALYSIS_NOTE: &str = "Анализ выполнен с использованием искусственного интеллекта (ИИ)";

/// Footer attribution; the brand name is appended by the assembler.
pub const GENERATED_BY_PREFIX: &str = "Сгенерировано системой";

/// Page-number placeholder resolved by the renderer.
pub const PAGE_NUMBER_PLACEHOLDER: &str = "{page}/{pages}";
