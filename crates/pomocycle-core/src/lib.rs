//! # Pomocycle Core Library
//!
//! This library provides the core logic for the Pomocycle Pomodoro timer.
//! The `pomocycle` CLI binary is a thin terminal layer over it.
//!
//! ## Architecture
//!
//! - **Timer**: Phase policy, the session state machine, and a tokio runtime
//!   that drives it with a one-second clock
//! - **Stats**: Daily, streak and cycle counters updated on each completed
//!   focus session
//! - **Storage**: SQLite key-value store for settings and stats, plus the
//!   TOML application configuration
//! - **Effects**: Desktop notifications and tones triggered by session events
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core timer state machine
//! - [`SessionRuntime`]: Clock-driven event loop around the engine
//! - [`StatsAggregator`]: Statistics persistence
//! - [`AppConfig`]: Application configuration management

pub mod effects;
pub mod error;
pub mod events;
pub mod notify;
pub mod settings;
pub mod sound;
pub mod stats;
pub mod storage;
pub mod timer;

pub use effects::Effects;
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use notify::{NotificationContent, Notifier, Permission};
pub use settings::{DurationField, Settings};
pub use sound::{SoundPlayer, Tone};
pub use stats::{Stats, StatsAggregator, Today};
pub use storage::{AppConfig, MemoryStore, SharedStore, SqliteStore, Store};
pub use timer::{
    Command, Phase, RuntimeSnapshot, SessionEngine, SessionHandle, SessionRuntime, SessionState,
};
