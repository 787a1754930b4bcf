//! Session runtime driven on tokio's paused test clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pomocycle_core::storage::TimerConfig;
use pomocycle_core::{
    Event, MemoryStore, Phase, SessionEngine, SessionHandle, SessionRuntime, Settings, SharedStore,
    StatsAggregator, Store,
};
use tokio::time::sleep;

fn quick_settings() -> Settings {
    Settings {
        focus_time: 3,
        short_break: 2,
        long_break: 4,
        ..Settings::default()
    }
}

fn spawn(settings: Settings) -> (SessionHandle, SharedStore) {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let engine = SessionEngine::new(settings, StatsAggregator::new(store.clone(), Arc::new(today)));
    let config = TimerConfig {
        tick_interval_ms: 1000,
        celebration_secs: 3,
    };
    let (handle, _task) = SessionRuntime::with_engine(engine, store.clone(), &config).spawn();
    (handle, store)
}

#[tokio::test(start_paused = true)]
async fn clock_counts_down_only_while_running() {
    let (handle, _) = spawn(quick_settings());

    sleep(Duration::from_millis(5500)).await;
    assert_eq!(handle.snapshot().await.unwrap().state.time_left, 3);

    handle.start().await.unwrap();
    sleep(Duration::from_millis(1500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert!(snap.state.is_running);
    assert_eq!(snap.state.time_left, 2);

    handle.pause().await.unwrap();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.snapshot().await.unwrap().state.time_left, 2);
}

#[tokio::test(start_paused = true)]
async fn focus_expiry_rolls_into_break() {
    let (handle, store) = spawn(quick_settings());
    let mut events = handle.subscribe();

    handle.start().await.unwrap();
    sleep(Duration::from_millis(3500)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state.current_phase, Phase::ShortBreak);
    assert_eq!(snap.state.time_left, 2);
    assert_eq!(snap.state.cycle_position, 1);
    assert!(snap.state.is_running);
    assert_eq!(store.load_stats().total_pomodoros, 1);

    assert!(matches!(events.recv().await.unwrap(), Event::TimerStarted { .. }));
    assert!(matches!(events.recv().await.unwrap(), Event::FocusCompleted { .. }));
    match events.recv().await.unwrap() {
        Event::PhaseEntered { phase, auto_started, .. } => {
            assert_eq!(phase, Phase::ShortBreak);
            assert!(auto_started);
        }
        other => panic!("Expected PhaseEntered, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn celebration_clears_after_timeout() {
    let (handle, _) = spawn(quick_settings());
    for _ in 0..7 {
        handle.skip().await.unwrap();
    }
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state.current_phase, Phase::LongBreak);
    assert!(snap.celebrating);

    // Pausing does not cancel the timeout.
    handle.pause().await.unwrap();
    sleep(Duration::from_millis(2500)).await;
    assert!(handle.snapshot().await.unwrap().celebrating);
    sleep(Duration::from_secs(1)).await;
    assert!(!handle.snapshot().await.unwrap().celebrating);
}

#[tokio::test(start_paused = true)]
async fn earlier_timeout_leaves_later_celebration() {
    let (handle, _) = spawn(quick_settings());
    for _ in 0..7 {
        handle.skip().await.unwrap();
    }
    sleep(Duration::from_secs(2)).await;
    for _ in 0..8 {
        handle.skip().await.unwrap();
    }
    assert!(handle.snapshot().await.unwrap().celebrating);

    // First timeout fires at 3s; the second celebration began at 2s.
    sleep(Duration::from_millis(1500)).await;
    assert!(handle.snapshot().await.unwrap().celebrating);
    sleep(Duration::from_secs(2)).await;
    assert!(!handle.snapshot().await.unwrap().celebrating);
}

#[tokio::test(start_paused = true)]
async fn settings_update_is_persisted_and_applied() {
    let (handle, store) = spawn(quick_settings());
    let updated = Settings {
        focus_time: 10,
        dark_mode: true,
        ..quick_settings()
    };
    handle.update_settings(updated).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state.time_left, 10);
    assert_eq!(snap.settings, updated);
    assert_eq!(store.load_settings(), updated);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_runtime() {
    let (handle, _) = spawn(quick_settings());
    handle.shutdown().await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert!(handle.snapshot().await.is_err());
}
