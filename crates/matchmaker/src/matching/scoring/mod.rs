mod rules;
pub mod tables;
pub mod weights;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{BodyType, Education, Gender, Hobby, JobCategory, Mbti, PersonId};
use super::grade::Grade;
use super::priority::Category;

/// Manager-submitted evaluation of one person.
///
/// Monetary amounts are in units of ten thousand of the local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub gender: Gender,
    /// Manager-assigned face score, 0-100.
    pub face_score: f64,
    pub height_cm: u16,
    pub body_type: BodyType,
    pub age: u8,
    /// Where the person ranks personality among their ideals (1-6).
    pub personality_rank: u8,
    /// Where the person ranks shared values among their ideals (1-6).
    pub values_rank: u8,
    pub smoker: bool,
    pub hobby: Hobby,
    pub wants_children: bool,
    pub mbti: Mbti,
    pub job: JobCategory,
    pub annual_income: u32,
    pub education: Education,
    pub net_assets: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub appearance: f64,
    pub personality: f64,
    pub job: f64,
    pub education: f64,
    pub economics: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Appearance => self.appearance,
            Category::Personality => self.personality,
            Category::Job => self.job,
            Category::Education => self.education,
            Category::Economics => self.economics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGrades {
    pub appearance: Grade,
    pub personality: Grade,
    pub job: Grade,
    pub education: Grade,
    pub economics: Grade,
}

impl CategoryGrades {
    pub fn get(&self, category: Category) -> Grade {
        match category {
            Category::Appearance => self.appearance,
            Category::Personality => self.personality,
            Category::Job => self.job,
            Category::Education => self.education,
            Category::Economics => self.economics,
        }
    }

    fn from_scores(scores: &CategoryScores) -> Self {
        Self {
            appearance: Grade::from_score(scores.appearance),
            personality: Grade::from_score(scores.personality),
            job: Grade::from_score(scores.job),
            education: Grade::from_score(scores.education),
            economics: Grade::from_score(scores.economics),
        }
    }
}

/// Category scores, the weighted average, and their grades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub scores: CategoryScores,
    pub average: f64,
    pub grades: CategoryGrades,
    pub overall_grade: Grade,
}

/// Stored score for a person. The current record is overwritten on every
/// evaluation; each version is also appended to the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub person_id: PersonId,
    #[serde(flatten)]
    pub card: ScoreCard,
    pub evaluated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluator: Option<String>,
}

impl ScoreRecord {
    pub fn average(&self) -> f64 {
        self.card.average
    }

    pub fn overall_grade(&self) -> Grade {
        self.card.overall_grade
    }

    pub fn grade_for(&self, category: Category) -> Grade {
        self.card.grades.get(category)
    }
}

/// Evaluation rejected before scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidEvaluation {
    #[error("face score must be a number between 0 and 100 (found {0})")]
    FaceScoreOutOfRange(f64),
    #[error("{field} rank must be between 1 and 6 (found {rank})")]
    RankOutOfRange { field: &'static str, rank: u8 },
    #[error("height of {0}cm is not plausible")]
    ImplausibleHeight(u16),
}

/// Stateless scorer turning an evaluation into a score card.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryScorer;

impl CategoryScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, evaluation: &Evaluation) -> Result<(), InvalidEvaluation> {
        if !evaluation.face_score.is_finite() || !(0.0..=100.0).contains(&evaluation.face_score)
        {
            return Err(InvalidEvaluation::FaceScoreOutOfRange(evaluation.face_score));
        }
        for (field, rank) in [
            ("personality", evaluation.personality_rank),
            ("values", evaluation.values_rank),
        ] {
            if !(1..=6).contains(&rank) {
                return Err(InvalidEvaluation::RankOutOfRange { field, rank });
            }
        }
        if evaluation.height_cm == 0 || evaluation.height_cm > 250 {
            return Err(InvalidEvaluation::ImplausibleHeight(evaluation.height_cm));
        }
        Ok(())
    }

    pub fn score(&self, evaluation: &Evaluation) -> ScoreCard {
        let scores = CategoryScores {
            appearance: rules::appearance(evaluation),
            personality: rules::personality(evaluation),
            job: rules::job(evaluation),
            education: rules::education(evaluation),
            economics: rules::economics(evaluation),
        };
        let average = rules::overall(&scores);

        ScoreCard {
            grades: CategoryGrades::from_scores(&scores),
            overall_grade: Grade::from_score(average),
            scores,
            average,
        }
    }

    /// Validate, score, and stamp an evaluation as a storable record.
    pub fn record(
        &self,
        person_id: PersonId,
        evaluation: &Evaluation,
        evaluator: Option<String>,
        evaluated_at: DateTime<Utc>,
    ) -> Result<ScoreRecord, InvalidEvaluation> {
        self.validate(evaluation)?;
        Ok(ScoreRecord {
            person_id,
            card: self.score(evaluation),
            evaluated_at,
            evaluator,
        })
    }
}
