//! Candidate scoring, eligibility, stratification, ranking and batch
//! persistence for match-seeking requests.

pub mod domain;
pub mod eligibility;
pub mod grade;
pub mod import;
pub(crate) mod lock;
pub mod persist;
pub mod policy;
pub mod priority;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod stratify;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountState, AccountStatus, BodyType, CandidateRecord, DrinkingHabit, Education, Gender,
    Hobby, JobCategory, Labelled, MatchRequest, Mbti, PersonId, Preference, Profile, Proposal,
    ProposalStatus, RangePreference, RequestId, SmokingHabit,
};
pub use eligibility::{
    ApplicantContext, EligibilityFilter, EligibleCandidate, Exclusions, Ineligibility,
    PreferenceMode,
};
pub use grade::Grade;
pub use import::{EvaluationImportError, EvaluationImporter, ImportedEvaluation};
pub use persist::{BatchOutcome, BatchPersister, RecommendationEntry, WriteFailure};
pub use policy::RecommendationPolicy;
pub use priority::{Category, PriorityList};
pub use ranking::{CompatibilityRanker, RankedCandidate};
pub use repository::{
    CandidateQuery, ProfileStore, RecommendationStore, ScoreStore, StoreError,
};
pub use router::{matchmaking_router, EvaluationSubmission};
pub use scoring::{CategoryScorer, Evaluation, InvalidEvaluation, ScoreCard, ScoreRecord};
pub use service::{
    ApplicantField, MatchingServiceError, MatchmakingService, RecommendationRun, RunStatus,
};
pub use stratify::{BandQuotas, GradeStratifier, StratifiedSelection};
