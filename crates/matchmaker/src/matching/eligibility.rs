use std::collections::HashSet;

use serde::Serialize;

use super::domain::{
    AccountStatus, CandidateRecord, MatchRequest, PersonId, Preference, Profile,
};
use super::scoring::ScoreRecord;

/// Fully resolved applicant for one recommendation run.
#[derive(Debug, Clone)]
pub struct ApplicantContext {
    pub request: MatchRequest,
    pub profile: Profile,
    pub preference: Preference,
    pub score: ScoreRecord,
}

impl ApplicantContext {
    pub fn id(&self) -> &PersonId {
        &self.profile.id
    }
}

/// Candidates that must not be recommended again for this request.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    pub already_recommended: HashSet<PersonId>,
    pub proposal_linked: HashSet<PersonId>,
}

impl Exclusions {
    pub fn contains(&self, id: &PersonId) -> bool {
        self.already_recommended.contains(id) || self.proposal_linked.contains(id)
    }
}

/// How strictly the applicant's partner preferences are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceMode {
    Strict,
    /// Ignore age, height and region preferences. Account and exclusion
    /// rules still apply.
    Relaxed,
}

/// Candidate that passed the filter, carrying the score it was judged on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibleCandidate {
    pub profile: Profile,
    pub score: ScoreRecord,
}

impl EligibleCandidate {
    pub fn id(&self) -> &PersonId {
        &self.profile.id
    }
}

/// Reason a candidate was dropped, in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    Applicant,
    Unscored,
    InactiveAccount(AccountStatus),
    Deleted,
    OutsideAgeRange,
    OutsideHeightRange,
    OutsideRegion,
    AlreadyRecommended,
    ProposalLinked,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityFilter;

impl EligibilityFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn check(
        &self,
        applicant: &ApplicantContext,
        candidate: &CandidateRecord,
        exclusions: &Exclusions,
        mode: PreferenceMode,
    ) -> Result<(), Ineligibility> {
        let profile = &candidate.profile;
        if &profile.id == applicant.id() {
            return Err(Ineligibility::Applicant);
        }
        if candidate.score.is_none() {
            return Err(Ineligibility::Unscored);
        }
        if !candidate.account.status.is_recommendable() {
            return Err(Ineligibility::InactiveAccount(candidate.account.status));
        }
        if candidate.account.is_deleted() {
            return Err(Ineligibility::Deleted);
        }

        if mode == PreferenceMode::Strict {
            let preference = &applicant.preference;
            if !preference.age.admits(profile.age) {
                return Err(Ineligibility::OutsideAgeRange);
            }
            if !preference.height_cm.admits(profile.height_cm) {
                return Err(Ineligibility::OutsideHeightRange);
            }
            if !preference.admits_region(&profile.region) {
                return Err(Ineligibility::OutsideRegion);
            }
        }

        if exclusions.already_recommended.contains(&profile.id) {
            return Err(Ineligibility::AlreadyRecommended);
        }
        if exclusions.proposal_linked.contains(&profile.id) {
            return Err(Ineligibility::ProposalLinked);
        }
        Ok(())
    }

    /// Keep the candidates that pass every check. Input order is preserved
    /// but callers should not rely on it.
    pub fn apply(
        &self,
        applicant: &ApplicantContext,
        pool: &[CandidateRecord],
        exclusions: &Exclusions,
        mode: PreferenceMode,
    ) -> Vec<EligibleCandidate> {
        pool.iter()
            .filter(|candidate| {
                self.check(applicant, candidate, exclusions, mode)
                    .is_ok()
            })
            .filter_map(|candidate| {
                candidate.score.clone().map(|score| EligibleCandidate {
                    profile: candidate.profile.clone(),
                    score,
                })
            })
            .collect()
    }
}
