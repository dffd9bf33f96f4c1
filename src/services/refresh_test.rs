use super::*;
use crate::state::test_helpers::{beamline_service, test_app_state, widget};
use crate::channel::test_helpers::MockChannelService;
use std::sync::Arc;
use tokio::time::{Duration, timeout};

#[tokio::test]
async fn refresh_once_records_every_device() {
    let state = test_app_state(beamline_service()).await;
    let summary = refresh_once(&state).await;
    assert_eq!(summary.updated, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.stale, 0);

    let snapshot = state.live.snapshot().await;
    assert_eq!(snapshot["mono"].value, Some(10.0));
    assert_eq!(snapshot["long"].value, Some(20.0));
    assert_eq!(snapshot["current"].value, Some(0.5));
    assert!(snapshot.values().all(|v| v.generation == summary.generation));
}

#[tokio::test]
async fn refresh_once_picks_up_new_values() {
    let service = beamline_service();
    let state = test_app_state(service.clone()).await;
    refresh_once(&state).await;
    service.set("Bl201-beamstop:current", 0.75);
    refresh_once(&state).await;
    assert_eq!(state.live.get(&widget("current")).await.unwrap().value, Some(0.75));
}

#[tokio::test]
async fn failed_read_does_not_stop_cycle() {
    let service = beamline_service();
    let state = test_app_state(service.clone()).await;
    refresh_once(&state).await;

    service.take_offline("IOC:m1");
    let summary = refresh_once(&state).await;
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.updated, 2);

    let mono = state.live.get(&widget("mono")).await.unwrap();
    assert_eq!(mono.value, Some(10.0));
    assert!(mono.error.is_some());
}

#[tokio::test]
async fn non_retryable_failure_is_recorded_like_any_other() {
    let service = Arc::new(MockChannelService::with_channels(&[("IOC:m1", 10.0), ("IOC:m3", 20.0)]));
    let state = test_app_state(service).await;

    let summary = refresh_once(&state).await;
    assert_eq!((summary.updated, summary.failed), (2, 1));

    let current = state.live.get(&widget("current")).await.unwrap();
    assert_eq!(current.value, None);
    assert!(current.error.unwrap().contains("Bl201-beamstop:current"));
}

#[tokio::test]
async fn refresh_results_older_than_a_write_are_discarded() {
    let state = test_app_state(beamline_service()).await;

    // A write that started after the refresh cycle has already recorded.
    let write_generation = state.live.begin() + 1_000;
    state.live.record(&widget("mono"), write_generation, Ok(99.0)).await;

    let summary = refresh_once(&state).await;
    assert_eq!(summary.stale, 1);
    assert_eq!(state.live.get(&widget("mono")).await.unwrap().value, Some(99.0));
}

#[tokio::test]
async fn spawned_task_populates_values() {
    let state = test_app_state(beamline_service()).await;
    let handle = spawn_refresh_task(state.clone());

    let filled = timeout(Duration::from_secs(2), async {
        loop {
            if state.live.snapshot().await.len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    handle.abort();
    assert!(filled.is_ok(), "refresh task should fill all widgets");
}
