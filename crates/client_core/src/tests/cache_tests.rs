use std::time::Duration;

use super::*;
use crate::test_support::{FakeLeaveTypeApi, Op};

fn sick() -> LeaveType {
    LeaveType::new("1", "Sick")
}

fn vacation() -> LeaveType {
    LeaveType::new("2", "Vacation")
}

#[tokio::test]
async fn view_is_empty_before_first_fetch() {
    let store = ResourceCacheStore::new(FakeLeaveTypeApi::with_rows(vec![sick()]));
    assert!(store.current_view().is_empty());
    assert_eq!(store.version(), 0);
    assert!(!store.is_loading());
    assert!(!store.snapshot().has_fetched());
}

#[tokio::test]
async fn each_fetch_replaces_the_whole_view() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick(), vacation()]);
    let store = ResourceCacheStore::new(api.clone());

    assert_eq!(
        store.request_fetch().await,
        FetchOutcome::Fetched { version: 1 }
    );
    assert_eq!(*store.current_view(), vec![sick(), vacation()]);

    api.set_rows(vec![LeaveType::new("3", "Parental")]);
    assert_eq!(
        store.request_fetch().await,
        FetchOutcome::Fetched { version: 2 }
    );
    assert_eq!(*store.current_view(), vec![LeaveType::new("3", "Parental")]);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn failed_fetch_keeps_last_view_and_clears_loading() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    let store = ResourceCacheStore::new(api.clone());
    store.request_fetch().await;

    let err = RequestError::status(503, None);
    api.fail(Op::List, err.clone());
    assert_eq!(store.request_fetch().await, FetchOutcome::Failed(err.clone()));

    let state = store.snapshot();
    assert_eq!(*state.data, vec![sick()]);
    assert_eq!(state.version, 1);
    assert!(!state.is_loading);
    assert_eq!(state.last_error, Some(err));

    api.clear_failures();
    store.request_fetch().await;
    assert_eq!(store.snapshot().last_error, None);
}

#[tokio::test]
async fn first_fetch_failure_leaves_view_empty() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    api.fail(Op::List, RequestError::without_message());
    let store = ResourceCacheStore::new(api.clone());

    assert!(matches!(
        store.request_fetch().await,
        FetchOutcome::Failed(_)
    ));
    assert!(store.current_view().is_empty());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn overlapping_requests_share_one_list_call_at_a_time() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    api.gate_lists();
    let store = Arc::new(ResourceCacheStore::new(api.clone()));

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.request_fetch().await }
    });
    api.wait_for_lists_started(1).await;
    assert!(store.is_loading());

    api.set_rows(vec![sick(), vacation()]);
    assert_eq!(store.request_fetch().await, FetchOutcome::Coalesced);
    assert_eq!(store.request_fetch().await, FetchOutcome::Coalesced);
    assert_eq!(api.lists_started(), 1);

    api.release_list();
    api.wait_for_lists_started(2).await;
    assert!(store.is_loading());
    api.release_list();

    assert_eq!(
        first.await.expect("fetch task"),
        FetchOutcome::Fetched { version: 2 }
    );
    assert_eq!(api.count(Op::List), 2);
    assert_eq!(*store.current_view(), vec![sick(), vacation()]);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn subscribers_observe_loading_and_new_versions() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    api.gate_lists();
    let store = Arc::new(ResourceCacheStore::new(api.clone()));
    let mut rx = store.subscribe();

    let task = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.request_fetch().await }
    });

    rx.changed().await.expect("loading change");
    assert!(rx.borrow_and_update().is_loading);

    api.release_list();
    rx.changed().await.expect("fetched change");
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.version, 1);
    assert_eq!(state.view(), &[sick()]);
    assert!(!state.is_loading);

    task.await.expect("fetch task");
}

#[tokio::test]
async fn dropped_fetch_does_not_leave_store_loading() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    api.gate_lists();
    let store = ResourceCacheStore::new(api.clone());

    let timed_out = tokio::time::timeout(Duration::from_millis(50), store.request_fetch()).await;
    assert!(timed_out.is_err());
    assert!(!store.is_loading());
    assert!(!store.snapshot().refetch_queued);

    api.release_list();
    assert_eq!(
        store.request_fetch().await,
        FetchOutcome::Fetched { version: 1 }
    );
    assert_eq!(*store.current_view(), vec![sick()]);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn dropped_fetch_discards_its_queued_follow_up() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    api.gate_lists();
    let store = Arc::new(ResourceCacheStore::new(api.clone()));

    let running = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.request_fetch().await }
    });
    api.wait_for_lists_started(1).await;
    assert_eq!(store.request_fetch().await, FetchOutcome::Coalesced);

    running.abort();
    assert!(running.await.expect_err("aborted").is_cancelled());
    assert!(!store.is_loading());
    store.wait_idle().await;
    assert_eq!(api.lists_started(), 1);
}

#[tokio::test]
async fn coalesced_refresh_waits_for_the_follow_up() {
    let api = FakeLeaveTypeApi::with_rows(vec![sick()]);
    api.gate_lists();
    let store = Arc::new(ResourceCacheStore::new(api.clone()));

    let running = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.request_fetch().await }
    });
    api.wait_for_lists_started(1).await;

    api.set_rows(vec![sick(), vacation()]);
    let waiting = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.refresh().await }
    });
    while !store.snapshot().refetch_queued {
        tokio::task::yield_now().await;
    }

    api.release_list();
    api.wait_for_lists_started(2).await;
    assert!(!waiting.is_finished());

    api.release_list();
    assert_eq!(
        waiting.await.expect("refresh task"),
        FetchOutcome::Fetched { version: 2 }
    );
    assert_eq!(
        running.await.expect("fetch task"),
        FetchOutcome::Fetched { version: 2 }
    );
    assert_eq!(*store.current_view(), vec![sick(), vacation()]);
}
