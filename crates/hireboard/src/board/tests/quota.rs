use std::sync::Arc;
use std::thread;

use super::common::*;
use crate::board::plans::{PlanCatalog, UNLIMITED_POSTS};
use crate::board::quota::{QuotaError, QuotaLedger};
use crate::board::service::BoardError;

fn ledger_over(store: Arc<MemoryStore>) -> QuotaLedger<MemoryStore> {
    QuotaLedger::new(PlanCatalog::standard(), store)
}

#[test]
fn can_post_respects_plan_limit() {
    let store = Arc::new(MemoryStore::default());
    store.add_employer(employer("acme", "buzz", 1));
    let ledger = ledger_over(store.clone());

    assert!(ledger.can_post(&acme()).expect("ledger answers"));

    store.add_employer(employer("acme", "buzz", 2));
    assert!(!ledger.can_post(&acme()).expect("ledger answers"));
}

#[test]
fn record_post_refuses_at_limit_without_touching_counter() {
    let store = Arc::new(MemoryStore::default());
    store.add_employer(employer("acme", "buzz", 2));
    let ledger = ledger_over(store.clone());

    match ledger.record_post(&acme()) {
        Err(QuotaError::LimitReached { limit, plan_name }) => {
            assert_eq!(limit, 2);
            assert_eq!(plan_name, "Buzz Plan (Free)");
        }
        other => panic!("expected limit rejection, got {other:?}"),
    }
    assert_eq!(store.posts_used(&acme()), 2);
}

#[test]
fn release_slot_floors_at_zero() {
    let store = Arc::new(MemoryStore::default());
    store.add_employer(employer("acme", "buzz", 1));
    let ledger = ledger_over(store.clone());

    assert_eq!(ledger.release_slot(&acme()).expect("release"), 0);
    assert_eq!(ledger.release_slot(&acme()).expect("release again"), 0);
    assert_eq!(store.posts_used(&acme()), 0);
}

#[test]
fn unlimited_plan_always_answers_yes_but_still_counts() {
    let store = Arc::new(MemoryStore::default());
    store.add_employer(employer("mega", "swarm", UNLIMITED_POSTS + 5));
    let ledger = ledger_over(store.clone());

    assert!(ledger.can_post(&mega()).expect("unlimited can post"));
    let count = ledger.record_post(&mega()).expect("counter maintained");
    assert_eq!(count, UNLIMITED_POSTS + 6);
}

#[test]
fn unknown_plan_is_a_data_fault() {
    let store = Arc::new(MemoryStore::default());
    store.add_employer(employer("acme", "retired-tier", 0));
    let ledger = ledger_over(store);

    match ledger.can_post(&acme()) {
        Err(QuotaError::UnknownPlan(plan)) => assert_eq!(plan, "retired-tier"),
        other => panic!("expected unknown plan error, got {other:?}"),
    }
}

#[test]
fn counter_stays_within_bounds_across_post_delete_sequences() {
    let (service, store, _) = build_service();

    let first = service
        .post_job(&acme(), draft("Backend Engineer", &["rust"]))
        .expect("first post fits");
    let _second = service
        .post_job(&acme(), draft("Data Engineer", &["sql"]))
        .expect("second post fits");
    assert_eq!(store.posts_used(&acme()), 2);

    assert!(matches!(
        service.post_job(&acme(), draft("Third", &["go"])),
        Err(BoardError::QuotaExceeded { limit: 2, .. })
    ));
    assert_eq!(store.posts_used(&acme()), 2);

    assert_eq!(
        service.delete_job(&acme(), &first.id).expect("delete"),
        1
    );
    service
        .post_job(&acme(), draft("Replacement", &["go"]))
        .expect("slot released");
    assert_eq!(store.posts_used(&acme()), 2);
}

#[test]
fn concurrent_posts_at_last_slot_yield_exactly_one_success() {
    let (service, store, _) = build_service();
    service
        .post_job(&acme(), draft("Seat One", &["rust"]))
        .expect("first slot");

    let service = Arc::new(service);
    let mut handles = Vec::new();
    for index in 0..2 {
        let service = service.clone();
        handles.push(thread::spawn(move || {
            service.post_job(&acme(), draft(&format!("Racer {index}"), &["rust"]))
        }));
    }

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("racer thread"))
        .collect();

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let rejections = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(BoardError::QuotaExceeded { .. })))
        .count();
    assert_eq!(successes, 1, "exactly one racer may take the last slot");
    assert_eq!(rejections, 1, "the loser sees a clean quota rejection");

    assert_eq!(store.posts_used(&acme()), 2);
    assert_eq!(store.job_count(), 2, "no orphaned posting survives the race");
}
