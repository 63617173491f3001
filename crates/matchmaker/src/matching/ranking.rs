use serde::Serialize;

use super::eligibility::EligibleCandidate;
use super::priority::PriorityList;

/// Weight of each priority position; positions past the end weigh nothing.
pub const PRIORITY_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate: EligibleCandidate,
    pub batch: u32,
    pub compatibility_score: f64,
    /// 1-based position in the ranked output.
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct CompatibilityRanker {
    weights: Vec<f64>,
}

impl Default for CompatibilityRanker {
    fn default() -> Self {
        Self::new(PRIORITY_WEIGHTS.to_vec())
    }
}

impl CompatibilityRanker {
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn compatibility(&self, priorities: &PriorityList, candidate: &EligibleCandidate) -> f64 {
        priorities
            .categories()
            .iter()
            .zip(&self.weights)
            .map(|(category, weight)| {
                candidate.score.grade_for(*category).compatibility_points() * weight
            })
            .sum()
    }

    /// Order by batch, then the candidate's own overall grade, then
    /// compatibility. The sort is stable so remaining ties keep input order.
    pub fn rank(
        &self,
        priorities: &PriorityList,
        candidates: Vec<EligibleCandidate>,
        batch: u32,
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|candidate| RankedCandidate {
                compatibility_score: self.compatibility(priorities, &candidate),
                candidate,
                batch,
                position: 0,
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.batch
                .cmp(&b.batch)
                .then_with(|| {
                    a.candidate
                        .score
                        .overall_grade()
                        .rank()
                        .cmp(&b.candidate.score.overall_grade().rank())
                })
                .then_with(|| b.compatibility_score.total_cmp(&a.compatibility_score))
        });

        for (index, entry) in ranked.iter_mut().enumerate() {
            entry.position = index + 1;
        }
        ranked
    }
}
