//! Bulk evaluation import from the managers' spreadsheet export.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{BodyType, Education, Gender, Hobby, JobCategory, Labelled, Mbti, PersonId};
use super::scoring::Evaluation;

#[derive(Debug)]
pub enum EvaluationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for EvaluationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationImportError::Io(err) => write!(f, "failed to read evaluation export: {}", err),
            EvaluationImportError::Csv(err) => write!(f, "invalid evaluation CSV data: {}", err),
            EvaluationImportError::InvalidField { line, field, value } => write!(
                f,
                "line {}: unrecognised {} value '{}'",
                line, field, value
            ),
        }
    }
}

impl std::error::Error for EvaluationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationImportError::Io(err) => Some(err),
            EvaluationImportError::Csv(err) => Some(err),
            EvaluationImportError::InvalidField { .. } => None,
        }
    }
}

impl From<std::io::Error> for EvaluationImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for EvaluationImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Evaluation parsed from one CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEvaluation {
    pub line: u64,
    pub person_id: PersonId,
    pub evaluation: Evaluation,
}

pub struct EvaluationImporter;

impl EvaluationImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<ImportedEvaluation>, EvaluationImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ImportedEvaluation>, EvaluationImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut imported = Vec::new();

        while csv_reader.read_record(&mut record)? {
            let row: EvaluationRow = record.deserialize(Some(&headers))?;
            let line = record.position().map_or(0, |position| position.line());
            imported.push(row.into_evaluation(line)?);
        }

        Ok(imported)
    }
}

#[derive(Debug, Deserialize)]
struct EvaluationRow {
    person_id: String,
    gender: String,
    face_score: f64,
    height_cm: u16,
    body_type: String,
    age: u8,
    personality_rank: u8,
    values_rank: u8,
    smoker: String,
    hobby: String,
    wants_children: String,
    mbti: String,
    job: String,
    annual_income: u32,
    education: String,
    net_assets: u64,
}

impl EvaluationRow {
    fn into_evaluation(self, line: u64) -> Result<ImportedEvaluation, EvaluationImportError> {
        let evaluation = Evaluation {
            gender: label::<Gender>(line, "gender", &self.gender)?,
            face_score: self.face_score,
            height_cm: self.height_cm,
            body_type: label::<BodyType>(line, "body_type", &self.body_type)?,
            age: self.age,
            personality_rank: self.personality_rank,
            values_rank: self.values_rank,
            smoker: flag(line, "smoker", &self.smoker)?,
            hobby: label::<Hobby>(line, "hobby", &self.hobby)?,
            wants_children: flag(line, "wants_children", &self.wants_children)?,
            mbti: label::<Mbti>(line, "mbti", &self.mbti)?,
            job: label::<JobCategory>(line, "job", &self.job)?,
            annual_income: self.annual_income,
            education: label::<Education>(line, "education", &self.education)?,
            net_assets: self.net_assets,
        };

        Ok(ImportedEvaluation {
            line,
            person_id: PersonId(self.person_id),
            evaluation,
        })
    }
}

fn label<T: Labelled>(line: u64, field: &'static str, raw: &str) -> Result<T, EvaluationImportError> {
    T::parse_label(raw).ok_or_else(|| EvaluationImportError::InvalidField {
        line,
        field,
        value: raw.to_string(),
    })
}

fn flag(line: u64, field: &'static str, raw: &str) -> Result<bool, EvaluationImportError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(EvaluationImportError::InvalidField {
            line,
            field,
            value: raw.to_string(),
        }),
    }
}
