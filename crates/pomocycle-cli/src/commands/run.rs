//! Interactive timer.

use std::io;
use std::time::Duration;

use pomocycle_core::notify::default_notifier;
use pomocycle_core::sound::player_for;
use pomocycle_core::{AppConfig, Effects, SessionHandle, SessionRuntime};

use super::open_store;
use crate::ui::{self, App, Intent, TerminalGuard};

const REDRAW_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(session(config))
}

async fn dispatch(handle: &SessionHandle, intent: Intent) -> pomocycle_core::Result<()> {
    match intent {
        Intent::Toggle => handle.toggle().await,
        Intent::Reset => handle.reset().await,
        Intent::ResetCycle => handle.reset_cycle().await,
        Intent::Skip => handle.skip().await,
        Intent::Apply(settings) => handle.update_settings(settings).await,
        Intent::Quit => Ok(()),
    }
}

async fn session(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let notifier = default_notifier(&config.notifications);
    let effects = Effects::new(notifier.clone(), player_for(&config.sound));

    let (handle, runtime_task) = SessionRuntime::new(store, &config.timer).spawn();
    let effects_task = effects.spawn(handle.subscribe());
    tracing::info!(tick_ms = config.timer.tick_interval_ms, "session started");

    let mut app = App::new(notifier);
    let mut keys = ui::terminal::spawn_key_reader()?;
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let mut input_failure: Option<io::Error> = None;

    {
        let mut terminal = TerminalGuard::enter()?;
        loop {
            tokio::select! {
                key = keys.recv() => {
                    let key = match key {
                        Some(Ok(key)) => key,
                        Some(Err(e)) => {
                            input_failure = Some(e);
                            break;
                        }
                        None => {
                            input_failure = Some(io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                "keyboard input stopped",
                            ));
                            break;
                        }
                    };
                    let current = handle.snapshot().await?.settings;
                    match app.handle_key(key, &current) {
                        Some(Intent::Quit) => break,
                        Some(intent) => dispatch(&handle, intent).await?,
                        None => {}
                    }
                }
                _ = redraw.tick() => {}
            }
            let snapshot = handle.snapshot().await?;
            ui::render::draw(terminal.out(), &snapshot, &app)?;
        }
    }

    handle.shutdown().await?;
    drop(handle);
    if let Err(e) = runtime_task.await {
        tracing::warn!(error = %e, "session runtime ended abnormally");
    }
    // Finishes once the remaining events are handled.
    if let Err(e) = effects_task.await {
        tracing::warn!(error = %e, "effects task ended abnormally");
    }
    match input_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
