use std::collections::HashSet;

use super::domain::{
    CandidateRecord, Gender, MatchRequest, PersonId, Preference, Profile, Proposal,
    ProposalStatus, RequestId,
};
use super::persist::RecommendationEntry;
use super::scoring::ScoreRecord;

/// Hints passed to the candidate pool query. Stores may over-return; the
/// eligibility filter is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateQuery {
    pub gender: Option<Gender>,
    /// Ids the run can never use. Stores skip them before applying `limit`
    /// so earlier batches do not crowd out the rest of the pool.
    pub exclude: HashSet<PersonId>,
    pub limit: usize,
}

impl CandidateQuery {
    /// Whether a profile should count towards `limit`.
    pub fn admits(&self, profile: &Profile) -> bool {
        self.gender.map_or(true, |gender| profile.gender == gender)
            && !self.exclude.contains(&profile.id)
    }
}

/// Read-only view over profiles, preferences, scores, requests and proposals.
pub trait ProfileStore: Send + Sync {
    fn fetch_request(&self, id: &RequestId) -> Result<Option<MatchRequest>, StoreError>;
    fn fetch_profile(&self, id: &PersonId) -> Result<Option<Profile>, StoreError>;
    fn fetch_preferences(&self, id: &PersonId) -> Result<Option<Preference>, StoreError>;
    fn fetch_score(&self, id: &PersonId) -> Result<Option<ScoreRecord>, StoreError>;
    fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRecord>, StoreError>;
    fn list_proposals(
        &self,
        person: &PersonId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError>;
}

/// Append-only recommendation log.
pub trait RecommendationStore: Send + Sync {
    fn list_recommendations(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<RecommendationEntry>, StoreError>;

    /// Insert a new entry. An existing `(request_id, candidate_id)` pair is
    /// rejected with [`StoreError::Duplicate`].
    fn append_recommendation(&self, entry: RecommendationEntry) -> Result<(), StoreError>;
}

pub trait ScoreStore: Send + Sync {
    fn put_score(&self, person: &PersonId, record: ScoreRecord) -> Result<(), StoreError>;
    fn append_score_history(&self, person: &PersonId, record: ScoreRecord)
        -> Result<(), StoreError>;
    fn score_history(&self, person: &PersonId) -> Result<Vec<ScoreRecord>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("candidate {candidate_id} is already recommended for request {request_id}")]
    Duplicate {
        request_id: RequestId,
        candidate_id: PersonId,
    },
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
