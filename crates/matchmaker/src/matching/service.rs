use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{PersonId, RequestId};
use super::eligibility::{ApplicantContext, EligibilityFilter, Exclusions, PreferenceMode};
use super::lock::RequestLocks;
use super::persist::{next_batch, BatchPersister, RecommendationEntry, WriteFailure};
use super::policy::RecommendationPolicy;
use super::ranking::CompatibilityRanker;
use super::repository::{
    CandidateQuery, ProfileStore, RecommendationStore, ScoreStore, StoreError,
};
use super::scoring::{CategoryScorer, Evaluation, InvalidEvaluation, ScoreRecord};
use super::stratify::GradeStratifier;

/// Applicant data that must resolve before a run can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantField {
    Request,
    Profile,
    Preferences,
    Score,
}

impl ApplicantField {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantField::Request => "request",
            ApplicantField::Profile => "profile",
            ApplicantField::Preferences => "preferences",
            ApplicantField::Score => "score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    /// Nothing was written because the applicant could not be resolved.
    MissingApplicantData { missing: ApplicantField },
    NoEligibleCandidates,
}

/// Report of one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRun {
    pub request_id: RequestId,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<u32>,
    pub entries: Vec<RecommendationEntry>,
    pub failed_writes: Vec<WriteFailure>,
}

impl RecommendationRun {
    fn empty(request_id: RequestId, status: RunStatus) -> Self {
        Self {
            request_id,
            status,
            batch: None,
            entries: Vec::new(),
            failed_writes: Vec::new(),
        }
    }

    pub fn persisted(&self) -> usize {
        self.entries.len()
    }

    pub fn failed(&self) -> usize {
        self.failed_writes.len()
    }
}

/// Service composing the scorer, filter, stratifier, ranker and persister
/// over injected stores.
pub struct MatchmakingService<P, R, S> {
    profiles: Arc<P>,
    recommendations: Arc<R>,
    scores: Arc<S>,
    scorer: CategoryScorer,
    filter: EligibilityFilter,
    stratifier: GradeStratifier,
    ranker: CompatibilityRanker,
    persister: BatchPersister,
    locks: RequestLocks,
    policy: RecommendationPolicy,
}

impl<P, R, S> MatchmakingService<P, R, S>
where
    P: ProfileStore + 'static,
    R: RecommendationStore + 'static,
    S: ScoreStore + 'static,
{
    pub fn new(
        profiles: Arc<P>,
        recommendations: Arc<R>,
        scores: Arc<S>,
        policy: RecommendationPolicy,
    ) -> Self {
        Self {
            profiles,
            recommendations,
            scores,
            scorer: CategoryScorer::new(),
            filter: EligibilityFilter::new(),
            stratifier: GradeStratifier::new(policy.quotas, policy.minimum_recommendations),
            ranker: CompatibilityRanker::new(policy.priority_weights.clone()),
            persister: BatchPersister::new(),
            locks: RequestLocks::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    pub fn submit_evaluation(
        &self,
        person_id: PersonId,
        evaluation: &Evaluation,
        evaluator: Option<String>,
    ) -> Result<ScoreRecord, MatchingServiceError> {
        self.submit_evaluation_at(person_id, evaluation, evaluator, Utc::now())
    }

    /// Score an evaluation, overwrite the current score, and append it to
    /// the person's history.
    pub fn submit_evaluation_at(
        &self,
        person_id: PersonId,
        evaluation: &Evaluation,
        evaluator: Option<String>,
        evaluated_at: DateTime<Utc>,
    ) -> Result<ScoreRecord, MatchingServiceError> {
        let record = self
            .scorer
            .record(person_id.clone(), evaluation, evaluator, evaluated_at)?;

        self.scores.put_score(&person_id, record.clone())?;
        self.scores.append_score_history(&person_id, record.clone())?;

        info!(
            person_id = %person_id,
            average = record.average(),
            grade = record.overall_grade().label(),
            "evaluation scored"
        );
        Ok(record)
    }

    pub fn score_history(&self, person_id: &PersonId) -> Result<Vec<ScoreRecord>, MatchingServiceError> {
        Ok(self.scores.score_history(person_id)?)
    }

    pub fn recommend(&self, request_id: &RequestId) -> Result<RecommendationRun, MatchingServiceError> {
        self.recommend_at(request_id, Utc::now())
    }

    /// Compute and persist the next recommendation batch for a request.
    ///
    /// Runs for the same request are serialized. Missing applicant data
    /// yields an empty run without writes; only store failures are errors.
    pub fn recommend_at(
        &self,
        request_id: &RequestId,
        now: DateTime<Utc>,
    ) -> Result<RecommendationRun, MatchingServiceError> {
        let _guard = self.locks.acquire(request_id);

        let applicant = match self.resolve_applicant(request_id)? {
            Ok(applicant) => applicant,
            Err(missing) => {
                warn!(
                    request_id = %request_id,
                    missing = missing.label(),
                    "applicant data unavailable; skipping run"
                );
                return Ok(RecommendationRun::empty(
                    request_id.clone(),
                    RunStatus::MissingApplicantData { missing },
                ));
            }
        };

        let existing = self.recommendations.list_recommendations(request_id)?;
        let exclusions = self.exclusions(&applicant, &existing)?;

        let mut exclude: HashSet<PersonId> = exclusions
            .already_recommended
            .union(&exclusions.proposal_linked)
            .cloned()
            .collect();
        exclude.insert(applicant.id().clone());
        let pool = self.profiles.list_candidates(&CandidateQuery {
            gender: Some(applicant.profile.gender.opposite()),
            exclude,
            limit: self.policy.candidate_limit,
        })?;

        let strict = self
            .filter
            .apply(&applicant, &pool, &exclusions, PreferenceMode::Strict);
        let eligible = strict.len();
        let mut selection = self
            .stratifier
            .stratify(applicant.score.overall_grade(), strict);

        let mut supplemented = 0;
        if self.stratifier.shortfall(&selection) > 0 {
            let relaxed = self
                .filter
                .apply(&applicant, &pool, &exclusions, PreferenceMode::Relaxed);
            supplemented = self.stratifier.supplement(&mut selection, relaxed);
        }

        if selection.is_empty() {
            info!(request_id = %request_id, pool = pool.len(), "no eligible candidates");
            return Ok(RecommendationRun::empty(
                request_id.clone(),
                RunStatus::NoEligibleCandidates,
            ));
        }

        let batch = next_batch(&existing);
        let ranked = self.ranker.rank(
            &applicant.preference.priorities,
            selection.into_ordered(),
            batch,
        );
        let outcome = self.persister.persist(
            self.recommendations.as_ref(),
            request_id,
            &ranked,
            &existing,
            now,
        );

        info!(
            request_id = %request_id,
            batch = outcome.batch,
            pool = pool.len(),
            eligible,
            supplemented,
            persisted = outcome.persisted.len(),
            failed = outcome.failures.len(),
            "recommendation batch written"
        );

        Ok(RecommendationRun {
            request_id: request_id.clone(),
            status: RunStatus::Completed,
            batch: Some(outcome.batch),
            entries: outcome.persisted,
            failed_writes: outcome.failures,
        })
    }

    /// Current log for a request, ordered by rank.
    pub fn recommendations(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<RecommendationEntry>, MatchingServiceError> {
        let mut entries = self.recommendations.list_recommendations(request_id)?;
        entries.sort_by_key(|entry| entry.rank);
        Ok(entries)
    }

    fn resolve_applicant(
        &self,
        request_id: &RequestId,
    ) -> Result<Result<ApplicantContext, ApplicantField>, StoreError> {
        let Some(request) = self.profiles.fetch_request(request_id)? else {
            return Ok(Err(ApplicantField::Request));
        };
        let Some(profile) = self.profiles.fetch_profile(&request.applicant)? else {
            return Ok(Err(ApplicantField::Profile));
        };
        let Some(preference) = self.profiles.fetch_preferences(&request.applicant)? else {
            return Ok(Err(ApplicantField::Preferences));
        };
        let Some(score) = self.profiles.fetch_score(&request.applicant)? else {
            return Ok(Err(ApplicantField::Score));
        };

        Ok(Ok(ApplicantContext {
            request,
            profile,
            preference,
            score,
        }))
    }

    fn exclusions(
        &self,
        applicant: &ApplicantContext,
        existing: &[RecommendationEntry],
    ) -> Result<Exclusions, StoreError> {
        let already_recommended: HashSet<PersonId> = existing
            .iter()
            .map(|entry| entry.candidate_id.clone())
            .collect();

        let proposal_linked = self
            .profiles
            .list_proposals(applicant.id(), &self.policy.proposal_exclusion)?
            .iter()
            .filter(|proposal| self.policy.proposal_exclusion.contains(&proposal.status))
            .filter_map(|proposal| proposal.counterpart_of(applicant.id()).cloned())
            .collect();

        Ok(Exclusions {
            already_recommended,
            proposal_linked,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    InvalidEvaluation(#[from] InvalidEvaluation),
    #[error(transparent)]
    Store(#[from] StoreError),
}
