use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{PersonId, RequestId};
use super::grade::Grade;
use super::ranking::RankedCandidate;
use super::repository::RecommendationStore;

/// One row of the append-only recommendation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub request_id: RequestId,
    pub candidate_id: PersonId,
    /// Batch number this entry was written in, starting at 1.
    pub recommendation_count: u32,
    /// Global position across all batches of the request, starting at 1.
    pub rank: u32,
    pub compatibility_score: f64,
    pub personal_score: f64,
    pub grade: Grade,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub candidate_id: PersonId,
    pub reason: String,
}

/// Entries a persist call would write, computed without touching a store.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    pub batch: u32,
    pub entries: Vec<RecommendationEntry>,
    pub skipped_existing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub batch: u32,
    pub persisted: Vec<RecommendationEntry>,
    pub skipped_existing: usize,
    pub failures: Vec<WriteFailure>,
}

/// Batch number the next run writes, given the current log.
pub fn next_batch(existing: &[RecommendationEntry]) -> u32 {
    existing
        .iter()
        .map(|entry| entry.recommendation_count)
        .max()
        .map_or(1, |batch| batch + 1)
}

fn next_rank(existing: &[RecommendationEntry]) -> u32 {
    existing
        .iter()
        .map(|entry| entry.rank)
        .max()
        .map_or(1, |rank| rank + 1)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchPersister;

impl BatchPersister {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(
        &self,
        request_id: &RequestId,
        ranked: &[RankedCandidate],
        existing: &[RecommendationEntry],
        now: DateTime<Utc>,
    ) -> BatchPlan {
        let batch = next_batch(existing);
        let first_rank = next_rank(existing);
        let present: HashSet<&PersonId> = existing.iter().map(|entry| &entry.candidate_id).collect();

        // Every new timestamp sorts after the newest existing row.
        let base = existing
            .iter()
            .map(|entry| entry.created_at + Duration::microseconds(1))
            .max()
            .map_or(now, |floor| floor.max(now));

        let mut seen = HashSet::new();
        let mut skipped_existing = 0;
        let mut entries = Vec::with_capacity(ranked.len());
        for candidate in ranked {
            let id = candidate.candidate.id();
            if present.contains(id) || !seen.insert(id.clone()) {
                skipped_existing += 1;
                continue;
            }
            let offset = entries.len() as u32;
            entries.push(RecommendationEntry {
                request_id: request_id.clone(),
                candidate_id: id.clone(),
                recommendation_count: batch,
                rank: first_rank + offset,
                compatibility_score: candidate.compatibility_score,
                personal_score: candidate.candidate.score.average(),
                grade: candidate.candidate.score.overall_grade(),
                created_at: base + Duration::microseconds(i64::from(offset)),
            });
        }

        BatchPlan {
            batch,
            entries,
            skipped_existing,
        }
    }

    /// Write the planned entries one at a time. A failed insert is recorded
    /// and the remaining entries are still attempted.
    pub fn persist<S>(
        &self,
        store: &S,
        request_id: &RequestId,
        ranked: &[RankedCandidate],
        existing: &[RecommendationEntry],
        now: DateTime<Utc>,
    ) -> BatchOutcome
    where
        S: RecommendationStore + ?Sized,
    {
        let plan = self.plan(request_id, ranked, existing, now);
        let mut persisted = Vec::with_capacity(plan.entries.len());
        let mut failures = Vec::new();

        for entry in plan.entries {
            let candidate_id = entry.candidate_id.clone();
            match store.append_recommendation(entry.clone()) {
                Ok(()) => persisted.push(entry),
                Err(err) => {
                    warn!(
                        request_id = %request_id,
                        candidate_id = %candidate_id,
                        batch = plan.batch,
                        error = %err,
                        "recommendation insert failed"
                    );
                    failures.push(WriteFailure {
                        candidate_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        BatchOutcome {
            batch: plan.batch,
            persisted,
            skipped_existing: plan.skipped_existing,
            failures,
        }
    }
}
