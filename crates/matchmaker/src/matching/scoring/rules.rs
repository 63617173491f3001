use super::tables::{
    age_score, body_type_score, economics_job_score, education_score, height_score,
    hobby_score, ideal_rank_score, job_category_score, mbti_score, score_by_range, ASSET_RANGES,
    SALARY_RANGES,
};
use super::weights::{
    APPEARANCE_WEIGHTS, ECONOMICS_WEIGHTS, IDEAL_RANK_BLEND, JOB_WEIGHTS, OVERALL_WEIGHTS,
    PERSONALITY_WEIGHTS,
};
use super::{CategoryScores, Evaluation};

pub(crate) fn appearance(evaluation: &Evaluation) -> f64 {
    let face = evaluation.face_score.clamp(0.0, 100.0);
    face * APPEARANCE_WEIGHTS.face
        + height_score(evaluation.gender, evaluation.height_cm) * APPEARANCE_WEIGHTS.height
        + body_type_score(evaluation.body_type) * APPEARANCE_WEIGHTS.body_type
        + age_score(evaluation.gender, evaluation.age) * APPEARANCE_WEIGHTS.age
}

pub(crate) fn personality(evaluation: &Evaluation) -> f64 {
    let ideal = ideal_rank_score(evaluation.personality_rank) * IDEAL_RANK_BLEND.0
        + ideal_rank_score(evaluation.values_rank) * IDEAL_RANK_BLEND.1;
    let smoking = if evaluation.smoker { 50.0 } else { 100.0 };
    let children = if evaluation.wants_children { 100.0 } else { 70.0 };

    ideal * PERSONALITY_WEIGHTS.ideal
        + smoking * PERSONALITY_WEIGHTS.smoking
        + hobby_score(evaluation.hobby) * PERSONALITY_WEIGHTS.hobby
        + children * PERSONALITY_WEIGHTS.children
        + mbti_score(evaluation.mbti) * PERSONALITY_WEIGHTS.mbti
}

/// No employer-prestige source exists yet, so the term always scores zero.
pub(crate) fn employer_prestige(_evaluation: &Evaluation) -> f64 {
    0.0
}

pub(crate) fn job(evaluation: &Evaluation) -> f64 {
    job_category_score(evaluation.job) * JOB_WEIGHTS.category
        + salary(evaluation) * JOB_WEIGHTS.salary
        + employer_prestige(evaluation) * JOB_WEIGHTS.employer_prestige
}

pub(crate) fn education(evaluation: &Evaluation) -> f64 {
    education_score(evaluation.education)
}

pub(crate) fn economics(evaluation: &Evaluation) -> f64 {
    score_by_range(ASSET_RANGES, evaluation.net_assets) * ECONOMICS_WEIGHTS.assets
        + economics_job_score(evaluation.job) * ECONOMICS_WEIGHTS.job_category
        + salary(evaluation) * ECONOMICS_WEIGHTS.salary
}

pub(crate) fn overall(scores: &CategoryScores) -> f64 {
    scores.appearance * OVERALL_WEIGHTS.appearance
        + scores.personality * OVERALL_WEIGHTS.personality
        + scores.job * OVERALL_WEIGHTS.job
        + scores.education * OVERALL_WEIGHTS.education
        + scores.economics * OVERALL_WEIGHTS.economics
}

fn salary(evaluation: &Evaluation) -> f64 {
    score_by_range(SALARY_RANGES, u64::from(evaluation.annual_income))
}
