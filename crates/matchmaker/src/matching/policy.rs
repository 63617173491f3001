use serde::{Deserialize, Serialize};

use super::domain::ProposalStatus;
use super::ranking::PRIORITY_WEIGHTS;
use super::stratify::BandQuotas;

/// Tunable knobs for one deployment's recommendation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    pub quotas: BandQuotas,
    /// Below this many stratified candidates the relaxed pool is consulted.
    pub minimum_recommendations: usize,
    /// Upper bound on rows pulled from the candidate pool per run.
    pub candidate_limit: usize,
    /// Proposals in these states exclude both parties from each other's lists.
    /// Only a refusal frees the pair up again.
    pub proposal_exclusion: Vec<ProposalStatus>,
    pub priority_weights: Vec<f64>,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            quotas: BandQuotas::default(),
            minimum_recommendations: 10,
            candidate_limit: 500,
            proposal_exclusion: vec![
                ProposalStatus::Pending,
                ProposalStatus::Accepted,
                ProposalStatus::Cancelled,
            ],
            priority_weights: PRIORITY_WEIGHTS.to_vec(),
        }
    }
}
