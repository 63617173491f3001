use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::matching::domain::{
    AccountState, BodyType, CandidateRecord, DrinkingHabit, Education, Gender, Hobby,
    JobCategory, MatchRequest, Mbti, PersonId, Preference, Profile, Proposal, ProposalStatus,
    RangePreference, RequestId, SmokingHabit,
};
use crate::matching::eligibility::{ApplicantContext, EligibleCandidate};
use crate::matching::grade::Grade;
use crate::matching::persist::RecommendationEntry;
use crate::matching::priority::{Category, PriorityList};
use crate::matching::repository::{
    CandidateQuery, ProfileStore, RecommendationStore, ScoreStore, StoreError,
};
use crate::matching::scoring::{CategoryGrades, CategoryScores, Evaluation, ScoreCard, ScoreRecord};
use crate::matching::{MatchmakingService, RecommendationPolicy};

pub(super) const APPLICANT: &str = "applicant";
pub(super) const REQUEST: &str = "req-1";

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn person(id: &str) -> PersonId {
    PersonId(id.to_string())
}

pub(super) fn request_id() -> RequestId {
    RequestId(REQUEST.to_string())
}

pub(super) fn profile(id: &str, gender: Gender, age: u8, height_cm: u16, region: &str) -> Profile {
    Profile {
        id: person(id),
        gender,
        age,
        height_cm,
        body_type: BodyType::Average,
        region: region.to_string(),
        job: JobCategory::MidsizeCompany,
        education: Education::Bachelor,
        religion: None,
        smoking: SmokingHabit::NonSmoker,
        drinking: DrinkingHabit::Social,
        interests: vec!["hiking".to_string()],
        annual_income: 5_000,
        net_assets: 10_000,
        introduction: String::new(),
        photos: Vec::new(),
    }
}

/// Score whose five categories all sit at `average`.
pub(super) fn score(id: &str, average: f64) -> ScoreRecord {
    let grade = Grade::from_score(average);
    graded_score(id, average, [grade; 5])
}

/// Score with explicit category grades in appearance, personality, job,
/// education, economics order.
pub(super) fn graded_score(id: &str, average: f64, grades: [Grade; 5]) -> ScoreRecord {
    ScoreRecord {
        person_id: person(id),
        card: ScoreCard {
            scores: CategoryScores {
                appearance: average,
                personality: average,
                job: average,
                education: average,
                economics: average,
            },
            average,
            grades: CategoryGrades {
                appearance: grades[0],
                personality: grades[1],
                job: grades[2],
                education: grades[3],
                economics: grades[4],
            },
            overall_grade: Grade::from_score(average),
        },
        evaluated_at: now(),
        evaluator: Some("manager-7".to_string()),
    }
}

/// Active, scored candidate inside the default applicant's preferences.
pub(super) fn candidate(id: &str, average: f64) -> CandidateRecord {
    CandidateRecord {
        profile: profile(id, Gender::Female, 29, 163, "Seoul"),
        account: AccountState::active(),
        score: Some(score(id, average)),
    }
}

pub(super) fn eligible(id: &str, average: f64) -> EligibleCandidate {
    EligibleCandidate {
        profile: profile(id, Gender::Female, 29, 163, "Seoul"),
        score: score(id, average),
    }
}

pub(super) fn preference() -> Preference {
    Preference {
        person_id: person(APPLICANT),
        age: RangePreference::between(25, 35),
        height_cm: RangePreference::between(155, 175),
        regions: vec!["Seoul".to_string()],
        priorities: PriorityList::new([Category::Appearance, Category::Job]),
    }
}

pub(super) fn match_request() -> MatchRequest {
    MatchRequest {
        id: request_id(),
        applicant: person(APPLICANT),
        created_at: now(),
    }
}

/// Male applicant graded B (average 80).
pub(super) fn applicant() -> ApplicantContext {
    ApplicantContext {
        request: match_request(),
        profile: profile(APPLICANT, Gender::Male, 33, 178, "Seoul"),
        preference: preference(),
        score: score(APPLICANT, 80.0),
    }
}

pub(super) fn evaluation() -> Evaluation {
    Evaluation {
        gender: Gender::Male,
        face_score: 80.0,
        height_cm: 185,
        body_type: BodyType::Athletic,
        age: 32,
        personality_rank: 1,
        values_rank: 2,
        smoker: false,
        hobby: Hobby::Reading,
        wants_children: true,
        mbti: Mbti::Enfj,
        job: JobCategory::Engineer,
        annual_income: 7_200,
        education: Education::Master,
        net_assets: 40_000,
    }
}

pub(super) fn entry(candidate: &str, batch: u32, rank: u32) -> RecommendationEntry {
    RecommendationEntry {
        request_id: request_id(),
        candidate_id: person(candidate),
        recommendation_count: batch,
        rank,
        compatibility_score: 50.0,
        personal_score: 80.0,
        grade: Grade::B,
        created_at: now() + chrono::Duration::seconds(i64::from(rank)),
    }
}

#[derive(Default)]
struct MemoryState {
    requests: HashMap<RequestId, MatchRequest>,
    profiles: HashMap<PersonId, Profile>,
    accounts: HashMap<PersonId, AccountState>,
    preferences: HashMap<PersonId, Preference>,
    scores: HashMap<PersonId, ScoreRecord>,
    history: HashMap<PersonId, Vec<ScoreRecord>>,
    proposals: Vec<Proposal>,
    recommendations: Vec<RecommendationEntry>,
    failing_inserts: HashSet<PersonId>,
}

/// Single in-memory backend implementing every store trait.
#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Store holding the default applicant, their open request and `pool`.
    pub(super) fn seeded(pool: Vec<CandidateRecord>) -> Self {
        let store = Self::default();
        let applicant = applicant();
        store.add_person(
            applicant.profile,
            AccountState::active(),
            Some(applicant.score),
        );
        store.set_preferences(applicant.preference);
        store.add_request(applicant.request);
        for record in pool {
            store.add_candidate(record);
        }
        store
    }

    pub(super) fn add_person(&self, profile: Profile, account: AccountState, score: Option<ScoreRecord>) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let id = profile.id.clone();
        state.accounts.insert(id.clone(), account);
        if let Some(score) = score {
            state.scores.insert(id.clone(), score);
        }
        state.profiles.insert(id, profile);
    }

    pub(super) fn add_candidate(&self, record: CandidateRecord) {
        self.add_person(record.profile, record.account, record.score);
    }

    pub(super) fn add_request(&self, request: MatchRequest) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.requests.insert(request.id.clone(), request);
    }

    pub(super) fn set_preferences(&self, preference: Preference) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.preferences.insert(preference.person_id.clone(), preference);
    }

    pub(super) fn remove_score(&self, id: &str) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.scores.remove(&person(id));
    }

    pub(super) fn add_proposal(&self, proposer: &str, recipient: &str, status: ProposalStatus) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let id = format!("proposal-{}", state.proposals.len() + 1);
        state.proposals.push(Proposal {
            id,
            proposer: person(proposer),
            recipient: person(recipient),
            status,
            created_at: now(),
        });
    }

    pub(super) fn seed_recommendation(&self, entry: RecommendationEntry) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.recommendations.push(entry);
    }

    pub(super) fn fail_inserts_for(&self, id: &str) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.failing_inserts.insert(person(id));
    }

    pub(super) fn entries(&self) -> Vec<RecommendationEntry> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .recommendations
            .clone()
    }
}

impl ProfileStore for MemoryStore {
    fn fetch_request(&self, id: &RequestId) -> Result<Option<MatchRequest>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.requests.get(id).cloned())
    }

    fn fetch_profile(&self, id: &PersonId) -> Result<Option<Profile>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.profiles.get(id).cloned())
    }

    fn fetch_preferences(&self, id: &PersonId) -> Result<Option<Preference>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.preferences.get(id).cloned())
    }

    fn fetch_score(&self, id: &PersonId) -> Result<Option<ScoreRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.scores.get(id).cloned())
    }

    fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut pool: Vec<CandidateRecord> = state
            .profiles
            .values()
            .filter(|profile| query.admits(profile))
            .map(|profile| CandidateRecord {
                profile: profile.clone(),
                account: state
                    .accounts
                    .get(&profile.id)
                    .cloned()
                    .unwrap_or_else(AccountState::active),
                score: state.scores.get(&profile.id).cloned(),
            })
            .collect();
        pool.sort_by(|a, b| a.profile.id.cmp(&b.profile.id));
        pool.truncate(query.limit);
        Ok(pool)
    }

    fn list_proposals(
        &self,
        person: &PersonId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .proposals
            .iter()
            .filter(|proposal| proposal.counterpart_of(person).is_some())
            .filter(|proposal| statuses.contains(&proposal.status))
            .cloned()
            .collect())
    }
}

impl RecommendationStore for MemoryStore {
    fn list_recommendations(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<RecommendationEntry>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .recommendations
            .iter()
            .filter(|entry| &entry.request_id == request_id)
            .cloned()
            .collect())
    }

    fn append_recommendation(&self, entry: RecommendationEntry) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.failing_inserts.contains(&entry.candidate_id) {
            return Err(StoreError::Unavailable("insert rejected".to_string()));
        }
        let duplicate = state.recommendations.iter().any(|existing| {
            existing.request_id == entry.request_id && existing.candidate_id == entry.candidate_id
        });
        if duplicate {
            return Err(StoreError::Duplicate {
                request_id: entry.request_id,
                candidate_id: entry.candidate_id,
            });
        }
        state.recommendations.push(entry);
        Ok(())
    }
}

impl ScoreStore for MemoryStore {
    fn put_score(&self, person: &PersonId, record: ScoreRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.scores.insert(person.clone(), record);
        Ok(())
    }

    fn append_score_history(&self, person: &PersonId, record: ScoreRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.history.entry(person.clone()).or_default().push(record);
        Ok(())
    }

    fn score_history(&self, person: &PersonId) -> Result<Vec<ScoreRecord>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.history.get(person).cloned().unwrap_or_default())
    }
}

/// Backend whose every call fails as if the database were offline.
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("database offline".to_string()))
}

impl ProfileStore for UnavailableStore {
    fn fetch_request(&self, _id: &RequestId) -> Result<Option<MatchRequest>, StoreError> {
        offline()
    }

    fn fetch_profile(&self, _id: &PersonId) -> Result<Option<Profile>, StoreError> {
        offline()
    }

    fn fetch_preferences(&self, _id: &PersonId) -> Result<Option<Preference>, StoreError> {
        offline()
    }

    fn fetch_score(&self, _id: &PersonId) -> Result<Option<ScoreRecord>, StoreError> {
        offline()
    }

    fn list_candidates(&self, _query: &CandidateQuery) -> Result<Vec<CandidateRecord>, StoreError> {
        offline()
    }

    fn list_proposals(
        &self,
        _person: &PersonId,
        _statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError> {
        offline()
    }
}

impl RecommendationStore for UnavailableStore {
    fn list_recommendations(
        &self,
        _request_id: &RequestId,
    ) -> Result<Vec<RecommendationEntry>, StoreError> {
        offline()
    }

    fn append_recommendation(&self, _entry: RecommendationEntry) -> Result<(), StoreError> {
        offline()
    }
}

impl ScoreStore for UnavailableStore {
    fn put_score(&self, _person: &PersonId, _record: ScoreRecord) -> Result<(), StoreError> {
        offline()
    }

    fn append_score_history(&self, _person: &PersonId, _record: ScoreRecord) -> Result<(), StoreError> {
        offline()
    }

    fn score_history(&self, _person: &PersonId) -> Result<Vec<ScoreRecord>, StoreError> {
        offline()
    }
}

pub(super) type MemoryService = MatchmakingService<MemoryStore, MemoryStore, MemoryStore>;

pub(super) fn build_service(store: &MemoryStore) -> MemoryService {
    build_service_with(store, RecommendationPolicy::default())
}

pub(super) fn build_service_with(store: &MemoryStore, policy: RecommendationPolicy) -> MemoryService {
    let shared = Arc::new(store.clone());
    MatchmakingService::new(shared.clone(), shared.clone(), shared, policy)
}

pub(super) fn unavailable_service() -> MatchmakingService<UnavailableStore, UnavailableStore, UnavailableStore> {
    let store = Arc::new(UnavailableStore);
    MatchmakingService::new(
        store.clone(),
        store.clone(),
        store,
        RecommendationPolicy::default(),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
