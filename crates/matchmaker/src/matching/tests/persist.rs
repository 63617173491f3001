use chrono::Duration;

use super::common::*;
use crate::matching::persist::{next_batch, BatchPersister};
use crate::matching::priority::PriorityList;
use crate::matching::ranking::{CompatibilityRanker, RankedCandidate};
use crate::matching::repository::RecommendationStore;

fn ranked(ids: &[&str], batch: u32) -> Vec<RankedCandidate> {
    let candidates = ids.iter().map(|id| eligible(id, 80.0)).collect();
    CompatibilityRanker::default().rank(&PriorityList::default(), candidates, batch)
}

fn seeded_log(store: &MemoryStore, count: u32) {
    for rank in 1..=count {
        store.seed_recommendation(entry(&format!("old-{rank}"), 1, rank));
    }
}

#[test]
fn first_batch_starts_at_one() {
    let plan = BatchPersister::new().plan(&request_id(), &ranked(&["a", "b"], 1), &[], now());

    assert_eq!(plan.batch, 1);
    assert_eq!(
        plan.entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(plan.entries[0].created_at, now());
}

#[test]
fn second_batch_continues_ranks_and_leaves_history_untouched() {
    let store = MemoryStore::default();
    seeded_log(&store, 5);
    let before = store.entries();

    let outcome = BatchPersister::new().persist(
        &store,
        &request_id(),
        &ranked(&["n-1", "n-2", "n-3"], 2),
        &before,
        now(),
    );

    assert_eq!(outcome.batch, 2);
    assert!(outcome.failures.is_empty());
    assert_eq!(
        outcome
            .persisted
            .iter()
            .map(|e| (e.recommendation_count, e.rank))
            .collect::<Vec<_>>(),
        vec![(2, 6), (2, 7), (2, 8)]
    );

    let after = store.entries();
    assert_eq!(after.len(), 8);
    assert_eq!(&after[..5], &before[..]);
}

#[test]
fn timestamps_strictly_follow_existing_entries() {
    let store = MemoryStore::default();
    seeded_log(&store, 3);
    let existing = store.entries();
    let newest = existing
        .iter()
        .map(|e| e.created_at)
        .max()
        .expect("seeded entries");

    // A clock behind the log must not produce earlier rows.
    let plan = BatchPersister::new().plan(
        &request_id(),
        &ranked(&["n-1", "n-2"], 2),
        &existing,
        now() - Duration::hours(1),
    );

    assert!(plan.entries[0].created_at > newest);
    assert!(plan.entries[1].created_at > plan.entries[0].created_at);
}

#[test]
fn candidates_already_logged_are_skipped() {
    let store = MemoryStore::default();
    seeded_log(&store, 2);
    let existing = store.entries();

    let plan = BatchPersister::new().plan(
        &request_id(),
        &ranked(&["old-1", "fresh", "fresh"], 2),
        &existing,
        now(),
    );

    assert_eq!(plan.skipped_existing, 2);
    assert_eq!(plan.entries.len(), 1);
    assert_eq!(plan.entries[0].candidate_id, person("fresh"));
    assert_eq!(plan.entries[0].rank, 3);
}

#[test]
fn failed_inserts_are_reported_and_do_not_stop_the_batch() {
    let store = MemoryStore::default();
    store.fail_inserts_for("n-2");

    let outcome = BatchPersister::new().persist(
        &store,
        &request_id(),
        &ranked(&["n-1", "n-2", "n-3"], 1),
        &[],
        now(),
    );

    assert_eq!(outcome.persisted.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].candidate_id, person("n-2"));
    let stored: Vec<_> = store
        .list_recommendations(&request_id())
        .expect("list")
        .into_iter()
        .map(|e| e.candidate_id.0)
        .collect();
    assert_eq!(stored, vec!["n-1", "n-3"]);
}

#[test]
fn overlapping_runs_never_duplicate_a_pair() {
    let store = MemoryStore::default();
    let persister = BatchPersister::new();

    let first = store.entries();
    persister.persist(&store, &request_id(), &ranked(&["a", "b", "c"], 1), &first, now());
    let second = store.entries();
    persister.persist(&store, &request_id(), &ranked(&["b", "c", "d"], 2), &second, now());

    let mut ids: Vec<String> = store.entries().into_iter().map(|e| e.candidate_id.0).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[test]
fn next_batch_follows_the_highest_count() {
    assert_eq!(next_batch(&[]), 1);
    assert_eq!(next_batch(&[entry("a", 1, 1), entry("b", 3, 2)]), 4);
}
