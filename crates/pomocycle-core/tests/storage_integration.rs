//! Persistence of settings and stats through the SQLite store.

use std::sync::Arc;

use chrono::NaiveDate;
use pomocycle_core::storage::{SETTINGS_KEY, STATS_KEY};
use pomocycle_core::{
    AppConfig, SessionEngine, Settings, SharedStore, SqliteStore, Stats, StatsAggregator, Store,
};
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        focus_time: 50 * 60,
        dark_mode: true,
        ..Settings::default()
    };
    {
        let store = SqliteStore::open_in(dir.path()).unwrap();
        store.save_settings(&settings).unwrap();
    }
    let store = SqliteStore::open_in(dir.path()).unwrap();
    assert_eq!(store.load_settings(), settings);
    assert_eq!(store.path(), Some(dir.path().join("pomocycle.db").as_path()));
}

#[test]
fn partial_records_merge_with_defaults() {
    let store = SqliteStore::open_memory().unwrap();
    store.set(SETTINGS_KEY, r#"{"focusTime": 600}"#).unwrap();
    store.set(STATS_KEY, r#"{"totalPomodoros": 7}"#).unwrap();

    let settings = store.load_settings();
    assert_eq!(settings.focus_time, 600);
    assert_eq!(settings.short_break, 300);
    assert!(settings.auto_start_breaks);

    let stats = store.load_stats();
    assert_eq!(stats.total_pomodoros, 7);
    assert_eq!(stats.last_session_date, None);
}

#[test]
fn corrupt_records_fall_back_to_defaults() {
    let store = SqliteStore::open_memory().unwrap();
    store.set(SETTINGS_KEY, "not json").unwrap();
    store.set(STATS_KEY, r#""stats""#).unwrap();
    assert_eq!(store.load_settings(), Settings::default());
    assert_eq!(store.load_stats(), Stats::default());
}

#[test]
fn stats_are_written_in_camel_case_with_iso_date() {
    let store: SharedStore = Arc::new(SqliteStore::open_memory().unwrap());
    StatsAggregator::new(store.clone(), Arc::new(day(18))).record_focus_completion();

    let raw = store.get(STATS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["todayPomodoros"], 1);
    assert_eq!(json["lastSessionDate"], "2026-10-18");
}

#[test]
fn day_rollover_across_engines() {
    let dir = TempDir::new().unwrap();
    let store: SharedStore = Arc::new(SqliteStore::open_in(dir.path()).unwrap());

    let mut monday = SessionEngine::new(
        Settings::default(),
        StatsAggregator::new(store.clone(), Arc::new(day(19))),
    );
    for _ in 0..6 {
        monday.skip();
    }
    let stats = store.load_stats();
    assert_eq!(stats.today_pomodoros, 3);
    assert_eq!(stats.current_streak, 3);

    let mut tuesday = SessionEngine::new(
        Settings::default(),
        StatsAggregator::new(store.clone(), Arc::new(day(20))),
    );
    assert_eq!(tuesday.stats().today_pomodoros, 0);
    assert_eq!(tuesday.stats().total_pomodoros, 3);

    tuesday.skip();
    let stats = store.load_stats();
    assert_eq!(stats.today_pomodoros, 1);
    assert_eq!(stats.total_pomodoros, 4);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.longest_streak, 3);
    assert_eq!(stats.last_session_date, Some(day(20)));
}

#[test]
fn config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let created = AppConfig::load_from(&path).unwrap();
    assert!(path.exists());
    assert_eq!(created, AppConfig::default());

    let mut config = created;
    config.set("timer.tick_interval_ms", "250").unwrap();
    config.set("sound.backend", "bell").unwrap();
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded.get("timer.tick_interval_ms").as_deref(), Some("250"));
    assert_eq!(loaded.get("sound.backend").as_deref(), Some("bell"));
}
