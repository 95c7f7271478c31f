//! Structured patient/visit record supplied by the form subsystem.
//!
//! The record is a closed set of optional text fields. Values are kept exactly as received;
//! sanitising and placeholder handling happen when the document is assembled.

use crate::constants::FIELD_RECORD_VERSION;
use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};

/// Patient identity, visit, history and examination answers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRecord {
    /// Schema version of the record; must equal [`FIELD_RECORD_VERSION`].
    pub version: u32,

    // Personal data
    pub full_name: Option<String>,
    pub passport: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub education: Option<String>,
    pub job: Option<String>,
    pub address: Option<String>,

    // Clinic visit
    pub admission_date: Option<String>,
    pub referral_diagnosis: Option<String>,
    pub main_complaints: Option<String>,
    pub main_complaints_detail: Option<String>,
    pub general_complaints: Option<String>,
    pub additional_complaints: Option<String>,
    pub first_symptoms_date: Option<String>,
    pub first_symptoms: Option<String>,
    pub triggers: Option<String>,
    pub symptoms_dynamic: Option<String>,
    pub previous_diagnosis: Option<String>,
    pub current_state: Option<String>,

    // Life history
    pub bad_habits: Option<String>,
    pub family_history: Option<String>,
    pub allergies: Option<String>,
    pub past_diseases: Option<String>,

    // Objective examination
    pub general_examination: Option<String>,
    pub head_neck: Option<String>,
    pub skin: Option<String>,
    pub respiratory: Option<String>,
    pub cardiovascular: Option<String>,
    pub abdomen: Option<String>,
    pub musculoskeletal: Option<String>,
    pub lymph_nodes: Option<String>,
    pub abdomen_palpation: Option<String>,
    pub percussion: Option<String>,
    pub lung_auscultation: Option<String>,
    pub heart_auscultation: Option<String>,
    pub abdomen_auscultation: Option<String>,
}

/// Identifies one field of a [`FieldRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    Passport,
    BirthDate,
    Gender,
    MaritalStatus,
    Education,
    Job,
    Address,
    AdmissionDate,
    ReferralDiagnosis,
    MainComplaints,
    MainComplaintsDetail,
    GeneralComplaints,
    AdditionalComplaints,
    FirstSymptomsDate,
    FirstSymptoms,
    Triggers,
    SymptomsDynamic,
    PreviousDiagnosis,
    CurrentState,
    BadHabits,
    FamilyHistory,
    Allergies,
    PastDiseases,
    GeneralExamination,
    HeadNeck,
    Skin,
    Respiratory,
    Cardiovascular,
    Abdomen,
    Musculoskeletal,
    LymphNodes,
    AbdomenPalpation,
    Percussion,
    LungAuscultation,
    HeartAuscultation,
    AbdomenAuscultation,
}

impl FieldKey {
    /// Label printed next to the value in the report.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::FullName => "Ф.И.О",
            FieldKey::Passport => "Паспорт",
            FieldKey::BirthDate => "Дата рождения",
            FieldKey::Gender => "Пол",
            FieldKey::MaritalStatus => "Семейное положение",
            FieldKey::Education => "Образование",
            FieldKey::Job => "Место работы, специальность, должность",
            FieldKey::Address => "Домашний адрес и телефон",
            FieldKey::AdmissionDate => "Дата поступления",
            FieldKey::ReferralDiagnosis => "Диагноз направившего учреждения",
            FieldKey::MainComplaints => "Основные жалобы",
            FieldKey::MainComplaintsDetail => "Детализация основных жалоб",
            FieldKey::GeneralComplaints => "Общие жалобы",
            FieldKey::AdditionalComplaints => "Дополнительные жалобы",
            FieldKey::FirstSymptomsDate => "Когда впервые появились жалобы",
            FieldKey::FirstSymptoms => "Какие жалобы появились первыми",
            FieldKey::Triggers => "Что способствовало появлению симптомов",
            FieldKey::SymptomsDynamic => "Динамика симптомов",
            FieldKey::PreviousDiagnosis => "Предыдущие диагнозы и лечение",
            FieldKey::CurrentState => "Клинические проявления в момент обращения",
            FieldKey::BadHabits => "Хронические интоксикации",
            FieldKey::FamilyHistory => "Наследственный анамнез",
            FieldKey::Allergies => "Аллергологический анамнез",
            FieldKey::PastDiseases => "Перенесённые заболевания / операции / прививки",
            FieldKey::GeneralExamination => "Общий осмотр",
            FieldKey::HeadNeck => "Голова и шея",
            FieldKey::Skin => "Кожа и подкожная клетчатка",
            FieldKey::Respiratory => "Органы дыхания (осмотр)",
            FieldKey::Cardiovascular => "Сердечно-сосудистая система",
            FieldKey::Abdomen => "ЖКТ (живот)",
            FieldKey::Musculoskeletal => "Опорно-двигательная система",
            FieldKey::LymphNodes => "Пальпация лимфоузлов",
            FieldKey::AbdomenPalpation => "Пальпация живота",
            FieldKey::Percussion => "Перкуссия",
            FieldKey::LungAuscultation => "Аускультация лёгких",
            FieldKey::HeartAuscultation => "Аускультация сердца",
            FieldKey::AbdomenAuscultation => "Аускультация живота",
        }
    }
}

impl FieldRecord {
    /// Returns the raw value stored for `key`.
    pub fn value(&self, key: FieldKey) -> Option<&str> {
        let value = match key {
            FieldKey::FullName => &self.full_name,
            FieldKey::Passport => &self.passport,
            FieldKey::BirthDate => &self.birth_date,
            FieldKey::Gender => &self.gender,
            FieldKey::MaritalStatus => &self.marital_status,
            FieldKey::Education => &self.education,
            FieldKey::Job => &self.job,
            FieldKey::Address => &self.address,
            FieldKey::AdmissionDate => &self.admission_date,
            FieldKey::ReferralDiagnosis => &self.referral_diagnosis,
            FieldKey::MainComplaints => &self.main_complaints,
            FieldKey::MainComplaintsDetail => &self.main_complaints_detail,
            FieldKey::GeneralComplaints => &self.general_complaints,
            FieldKey::AdditionalComplaints => &self.additional_complaints,
            FieldKey::FirstSymptomsDate => &self.first_symptoms_date,
            FieldKey::FirstSymptoms => &self.first_symptoms,
            FieldKey::Triggers => &self.triggers,
            FieldKey::SymptomsDynamic => &self.symptoms_dynamic,
            FieldKey::PreviousDiagnosis => &self.previous_diagnosis,
            FieldKey::CurrentState => &self.current_state,
            FieldKey::BadHabits => &self.bad_habits,
            FieldKey::FamilyHistory => &self.family_history,
            FieldKey::Allergies => &self.allergies,
            FieldKey::PastDiseases => &self.past_diseases,
            FieldKey::GeneralExamination => &self.general_examination,
            FieldKey::HeadNeck => &self.head_neck,
            FieldKey::Skin => &self.skin,
            FieldKey::Respiratory => &self.respiratory,
            FieldKey::Cardiovascular => &self.cardiovascular,
            FieldKey::Abdomen => &self.abdomen,
            FieldKey::Musculoskeletal => &self.musculoskeletal,
            FieldKey::LymphNodes => &self.lymph_nodes,
            FieldKey::AbdomenPalpation => &self.abdomen_palpation,
            FieldKey::Percussion => &self.percussion,
            FieldKey::LungAuscultation => &self.lung_auscultation,
            FieldKey::HeartAuscultation => &self.heart_auscultation,
            FieldKey::AbdomenAuscultation => &self.abdomen_auscultation,
        };
        value.as_deref()
    }

    /// Decodes a record from the form subsystem's JSON.
    ///
    /// A missing `version` is read as the current schema version.
    pub fn from_json(input: &str) -> ReportResult<Self> {
        let record: FieldRecord = serde_json::from_str(input).map_err(ReportError::RecordJson)?;
        record.checked()
    }

    /// Decodes a record from YAML. The document must be a mapping.
    pub fn from_yaml(input: &str) -> ReportResult<Self> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let value: serde_yaml::Value =
            serde_yaml::from_str(input).map_err(ReportError::RecordYaml)?;
        if !matches!(value, serde_yaml::Value::Mapping(_)) {
            return Err(ReportError::RecordNotMapping);
        }
        let record: FieldRecord =
            serde_yaml::from_value(value).map_err(ReportError::RecordYaml)?;
        record.checked()
    }

    fn checked(mut self) -> ReportResult<Self> {
        if self.version == 0 {
            self.version = FIELD_RECORD_VERSION;
        }
        if self.version != FIELD_RECORD_VERSION {
            return Err(ReportError::UnsupportedRecordVersion {
                found: self.version,
                expected: FIELD_RECORD_VERSION,
            });
        }
        Ok(self)
    }
}
