use std::io::{self, Stdout};
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use tokio::sync::mpsc;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Raw mode on the alternate screen for as long as the guard lives.
pub struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self { out })
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show, LeaveAlternateScreen) {
            tracing::warn!(error = %e, "failed to leave alternate screen");
        }
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "failed to disable raw mode");
        }
    }
}

/// Forward key presses from a reader thread until the receiver is dropped.
///
/// A terminal failure is delivered as the last item before the channel
/// closes.
pub fn spawn_key_reader() -> io::Result<mpsc::Receiver<io::Result<KeyEvent>>> {
    let (tx, rx) = mpsc::channel(16);
    thread::Builder::new()
        .name("pomocycle-keys".to_string())
        .spawn(move || pump(next_event, tx))?;
    Ok(rx)
}

fn next_event() -> io::Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

fn pump(
    mut next: impl FnMut() -> io::Result<Option<Event>>,
    tx: mpsc::Sender<io::Result<KeyEvent>>,
) {
    while !tx.is_closed() {
        match next() {
            Ok(Some(Event::Key(key))) => {
                if tx.blocking_send(Ok(key)).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to read terminal events");
                let _ = tx.blocking_send(Err(e));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn keys_are_forwarded_and_errors_end_the_stream() {
        let mut script = vec![
            Ok(Some(Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)))),
            Ok(None),
            Ok(Some(Event::FocusGained)),
            Ok(Some(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))),
            Err(io::Error::new(io::ErrorKind::Other, "tty gone")),
        ]
        .into_iter();
        let (tx, mut rx) = mpsc::channel(16);
        pump(move || script.next().unwrap_or(Ok(None)), tx);

        assert_eq!(rx.blocking_recv().unwrap().unwrap().code, KeyCode::Char(' '));
        assert_eq!(rx.blocking_recv().unwrap().unwrap().code, KeyCode::Char('q'));
        let err = rx.blocking_recv().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "tty gone");
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn failing_terminal_is_reported_not_dropped() {
        let (tx, mut rx) = mpsc::channel(16);
        pump(
            || Err(io::Error::new(io::ErrorKind::BrokenPipe, "poll failed")),
            tx,
        );
        assert!(matches!(rx.blocking_recv(), Some(Err(_))));
        assert!(rx.blocking_recv().is_none());
    }
}
