use matchmaker::matching::{
    AccountState, CandidateQuery, CandidateRecord, MatchRequest, PersonId, Preference, Profile,
    ProfileStore, Proposal, ProposalStatus, RecommendationEntry, RecommendationStore, RequestId,
    ScoreRecord, ScoreStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct MatchTables {
    requests: HashMap<RequestId, MatchRequest>,
    profiles: Vec<(Profile, AccountState)>,
    preferences: HashMap<PersonId, Preference>,
    scores: HashMap<PersonId, ScoreRecord>,
    history: HashMap<PersonId, Vec<ScoreRecord>>,
    proposals: Vec<Proposal>,
    recommendations: Vec<RecommendationEntry>,
}

/// Process-local backing for all three matchmaking stores.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchStore {
    tables: Arc<Mutex<MatchTables>>,
}

impl InMemoryMatchStore {
    fn tables(&self) -> Result<MutexGuard<'_, MatchTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store poisoned".to_string()))
    }

    pub(crate) fn add_profile(
        &self,
        profile: Profile,
        account: AccountState,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.profiles.retain(|(existing, _)| existing.id != profile.id);
        tables.profiles.push((profile, account));
        Ok(())
    }

    pub(crate) fn set_preferences(&self, preference: Preference) -> Result<(), StoreError> {
        self.tables()?
            .preferences
            .insert(preference.person_id.clone(), preference);
        Ok(())
    }

    pub(crate) fn open_request(&self, request: MatchRequest) -> Result<(), StoreError> {
        self.tables()?.requests.insert(request.id.clone(), request);
        Ok(())
    }

    pub(crate) fn add_proposal(&self, proposal: Proposal) -> Result<(), StoreError> {
        self.tables()?.proposals.push(proposal);
        Ok(())
    }
}

impl ProfileStore for InMemoryMatchStore {
    fn fetch_request(&self, id: &RequestId) -> Result<Option<MatchRequest>, StoreError> {
        Ok(self.tables()?.requests.get(id).cloned())
    }

    fn fetch_profile(&self, id: &PersonId) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .tables()?
            .profiles
            .iter()
            .find(|(profile, _)| &profile.id == id)
            .map(|(profile, _)| profile.clone()))
    }

    fn fetch_preferences(&self, id: &PersonId) -> Result<Option<Preference>, StoreError> {
        Ok(self.tables()?.preferences.get(id).cloned())
    }

    fn fetch_score(&self, id: &PersonId) -> Result<Option<ScoreRecord>, StoreError> {
        Ok(self.tables()?.scores.get(id).cloned())
    }

    fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRecord>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .profiles
            .iter()
            .filter(|(profile, _)| query.admits(profile))
            .take(query.limit)
            .map(|(profile, account)| CandidateRecord {
                profile: profile.clone(),
                account: account.clone(),
                score: tables.scores.get(&profile.id).cloned(),
            })
            .collect())
    }

    fn list_proposals(
        &self,
        person: &PersonId,
        statuses: &[ProposalStatus],
    ) -> Result<Vec<Proposal>, StoreError> {
        Ok(self
            .tables()?
            .proposals
            .iter()
            .filter(|proposal| {
                proposal.counterpart_of(person).is_some() && statuses.contains(&proposal.status)
            })
            .cloned()
            .collect())
    }
}

impl RecommendationStore for InMemoryMatchStore {
    fn list_recommendations(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<RecommendationEntry>, StoreError> {
        Ok(self
            .tables()?
            .recommendations
            .iter()
            .filter(|entry| &entry.request_id == request_id)
            .cloned()
            .collect())
    }

    fn append_recommendation(&self, entry: RecommendationEntry) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let exists = tables.recommendations.iter().any(|existing| {
            existing.request_id == entry.request_id && existing.candidate_id == entry.candidate_id
        });
        if exists {
            return Err(StoreError::Duplicate {
                request_id: entry.request_id,
                candidate_id: entry.candidate_id,
            });
        }
        tables.recommendations.push(entry);
        Ok(())
    }
}

impl ScoreStore for InMemoryMatchStore {
    fn put_score(&self, person: &PersonId, record: ScoreRecord) -> Result<(), StoreError> {
        self.tables()?.scores.insert(person.clone(), record);
        Ok(())
    }

    fn append_score_history(
        &self,
        person: &PersonId,
        record: ScoreRecord,
    ) -> Result<(), StoreError> {
        self.tables()?
            .history
            .entry(person.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn score_history(&self, person: &PersonId) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(self
            .tables()?
            .history
            .get(person)
            .cloned()
            .unwrap_or_default())
    }
}

pub(crate) type InMemoryMatchmakingService = matchmaker::matching::MatchmakingService<
    InMemoryMatchStore,
    InMemoryMatchStore,
    InMemoryMatchStore,
>;

pub(crate) fn in_memory_service(
    store: &InMemoryMatchStore,
    policy: matchmaker::matching::RecommendationPolicy,
) -> InMemoryMatchmakingService {
    let shared = Arc::new(store.clone());
    matchmaker::matching::MatchmakingService::new(shared.clone(), shared.clone(), shared, policy)
}
