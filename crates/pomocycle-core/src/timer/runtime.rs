//! Single-task driver for a [`SessionEngine`].
//!
//! One tokio task owns the engine and processes commands, clock ticks and
//! celebration timeouts strictly in sequence, so a phase transition is never
//! interleaved with a manual operation. Events go out on a broadcast
//! channel.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::clock::Clock;
use super::engine::{SessionEngine, SessionState};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::settings::Settings;
use crate::stats::{Stats, StatsAggregator};
use crate::storage::{SharedStore, TimerConfig};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Requests accepted by the runtime.
#[derive(Debug)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    ResetCycle,
    Skip,
    /// Apply and persist new settings.
    UpdateSettings(Settings),
    Snapshot(oneshot::Sender<RuntimeSnapshot>),
    Shutdown,
}

/// Everything a control surface needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
    pub state: SessionState,
    pub settings: Settings,
    pub stats: Stats,
    pub celebrating: bool,
}

/// Cloneable client side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoreError::Custom("session runtime has stopped".to_string()))
    }

    pub async fn start(&self) -> Result<()> {
        self.send(Command::Start).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(Command::Pause).await
    }

    pub async fn toggle(&self) -> Result<()> {
        self.send(Command::Toggle).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.send(Command::Reset).await
    }

    pub async fn reset_cycle(&self) -> Result<()> {
        self.send(Command::ResetCycle).await
    }

    pub async fn skip(&self) -> Result<()> {
        self.send(Command::Skip).await
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<()> {
        self.send(Command::UpdateSettings(settings)).await
    }

    pub async fn snapshot(&self) -> Result<RuntimeSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx)).await?;
        rx.await
            .map_err(|_| CoreError::Custom("session runtime dropped snapshot request".to_string()))
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

pub struct SessionRuntime {
    engine: SessionEngine,
    store: SharedStore,
    clock: Clock,
    events: broadcast::Sender<Event>,
    celebrating: bool,
    celebration_generation: u64,
    celebration_duration: Duration,
    clear_tx: mpsc::UnboundedSender<u64>,
    clear_rx: mpsc::UnboundedReceiver<u64>,
}

impl SessionRuntime {
    /// Runtime over the settings and stats held in `store`, dated with the
    /// local calendar day.
    pub fn new(store: SharedStore, config: &TimerConfig) -> Self {
        let settings = store.load_settings();
        let engine = SessionEngine::new(settings, StatsAggregator::with_local_today(store.clone()));
        Self::with_engine(engine, store, config)
    }

    pub fn with_engine(engine: SessionEngine, store: SharedStore, config: &TimerConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (clear_tx, clear_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            store,
            clock: Clock::new(config.tick_interval()),
            events,
            celebrating: false,
            celebration_generation: 0,
            celebration_duration: config.celebration_duration(),
            clear_tx,
            clear_rx,
        }
    }

    /// Move the runtime onto its own task.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = SessionHandle {
            commands: commands_tx,
            events: self.events.clone(),
        };
        let task = tokio::spawn(self.run(commands_rx));
        (handle, task)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        tracing::debug!(period_ms = self.clock.period().as_millis() as u64, "session runtime started");
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(generation) = self.clear_rx.recv() => self.clear_celebration(generation),
                _ = self.clock.tick() => {
                    let events = self.engine.tick();
                    self.publish(events);
                }
            }
            self.clock.follow(self.engine.is_running());
        }
        tracing::debug!("session runtime stopped");
    }

    /// Returns false when the runtime should stop.
    fn handle(&mut self, command: Command) -> bool {
        let events = match command {
            Command::Start => self.engine.start(),
            Command::Pause => self.engine.pause(),
            Command::Toggle => self.engine.toggle(),
            Command::Reset => self.engine.reset(),
            Command::ResetCycle => self.engine.reset_cycle(),
            Command::Skip => self.engine.skip(),
            Command::UpdateSettings(settings) => {
                if let Err(e) = self.store.save_settings(&settings) {
                    tracing::warn!(error = %e, "failed to persist settings");
                }
                self.engine.update_settings(settings)
            }
            Command::Snapshot(reply) => {
                // The requester may have given up waiting.
                let _ = reply.send(self.snapshot());
                Vec::new()
            }
            Command::Shutdown => return false,
        };
        self.publish(events);
        true
    }

    fn snapshot(&self) -> RuntimeSnapshot {
        RuntimeSnapshot {
            state: self.engine.snapshot(),
            settings: *self.engine.settings(),
            stats: self.engine.stats(),
            celebrating: self.celebrating,
        }
    }

    fn publish(&mut self, events: Vec<Event>) {
        for event in events {
            if matches!(event, Event::CycleCompleted { .. }) {
                self.begin_celebration();
            }
            if self.events.send(event).is_err() {
                tracing::trace!("no event subscribers");
            }
        }
    }

    fn begin_celebration(&mut self) {
        self.celebrating = true;
        self.celebration_generation += 1;
        let generation = self.celebration_generation;
        let delay = self.celebration_duration;
        let tx = self.clear_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(generation);
        });
    }

    /// Only the timeout of the latest celebration clears the flag.
    fn clear_celebration(&mut self, generation: u64) {
        if generation == self.celebration_generation {
            self.celebrating = false;
        }
    }
}
