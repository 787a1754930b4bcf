use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, SetTitle};
use crossterm::queue;
use pomocycle_core::timer::{duration_of, CYCLE_LENGTH};
use pomocycle_core::{DurationField, RuntimeSnapshot, Settings};

use super::app::{App, Overlay};

const BAR_WIDTH: usize = 30;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn progress_bar(snapshot: &RuntimeSnapshot) -> String {
    let total = duration_of(snapshot.state.current_phase, &snapshot.settings).max(1);
    let elapsed = total.saturating_sub(snapshot.state.time_left);
    let filled = (elapsed as usize * BAR_WIDTH / total as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn cycle_markers(position: u8) -> String {
    (0..CYCLE_LENGTH)
        .map(|i| if i < position { '●' } else { '○' })
        .collect()
}

fn duration_line(overlay: &Overlay, key: char, field: DurationField) -> String {
    let value = match &overlay.editing {
        Some(text) if text.field == field => format!("{}_", text.buffer),
        _ => overlay.draft.minutes(field).to_string(),
    };
    format!("  {key}  {}: {value}", field.label())
}

fn overlay_lines(overlay: &Overlay) -> Vec<String> {
    let d: &Settings = &overlay.draft;
    vec![
        "Settings".to_string(),
        duration_line(overlay, 'F', DurationField::Focus),
        duration_line(overlay, 'B', DurationField::ShortBreak),
        duration_line(overlay, 'L', DurationField::LongBreak),
        format!("  M  Sound: {}", on_off(d.sound_enabled)),
        format!("  N  Notifications: {}", on_off(d.notifications_enabled)),
        format!("  A  Auto-start breaks: {}", on_off(d.auto_start_breaks)),
        format!("  P  Auto-start pomodoros: {}", on_off(d.auto_start_pomodoros)),
        format!("  D  Dark mode: {}", on_off(d.dark_mode)),
        if overlay.editing.is_some() {
            "  Enter accept   Esc cancel".to_string()
        } else {
            "  Enter save   Esc close".to_string()
        },
    ]
}

/// Text of one frame, top to bottom.
pub fn frame_lines(snapshot: &RuntimeSnapshot, app: &App) -> Vec<String> {
    let state = &snapshot.state;
    let stats = &snapshot.stats;
    let mut lines = vec![
        state.title(),
        String::new(),
        format!(
            "{} {}  {}",
            state.current_phase.emoji(),
            state.current_phase.label(),
            if state.is_running { "running" } else { "paused" }
        ),
        format!("{}  {}", state.clock(), progress_bar(snapshot)),
        format!(
            "Cycle {}  {}/{}   Completed this session: {}",
            cycle_markers(state.cycle_position),
            state.cycle_position,
            CYCLE_LENGTH,
            state.completed_pomodoros
        ),
        format!(
            "Today {}   Streak {} (best {})   Cycles {}   Total {}",
            stats.today_pomodoros,
            stats.current_streak,
            stats.longest_streak,
            stats.completed_cycles,
            stats.total_pomodoros
        ),
    ];
    if snapshot.celebrating {
        lines.push("🎉 Cycle complete! Great work!".to_string());
    }
    lines.push(String::new());

    match app.overlay() {
        Some(overlay) => lines.extend(overlay_lines(overlay)),
        None => lines.push(
            "Space start/pause   R reset   S skip   C reset cycle   , settings   Q quit".to_string(),
        ),
    }
    if let Some(alert) = app.alert() {
        lines.push(String::new());
        lines.push(format!("! {alert}"));
    }
    lines
}

/// Redraw the whole screen.
pub fn draw(out: &mut impl Write, snapshot: &RuntimeSnapshot, app: &App) -> io::Result<()> {
    let (fg, bg) = if snapshot.settings.dark_mode {
        (Color::Grey, Color::Black)
    } else {
        (Color::Black, Color::White)
    };
    queue!(
        out,
        SetTitle(snapshot.state.title()),
        SetForegroundColor(fg),
        SetBackgroundColor(bg)
    )?;
    for (row, line) in frame_lines(snapshot, app).iter().enumerate() {
        queue!(
            out,
            MoveTo(0, row as u16),
            Print(line),
            Clear(ClearType::UntilNewLine)
        )?;
    }
    queue!(out, Clear(ClearType::FromCursorDown), ResetColor)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pomocycle_core::notify::NullNotifier;
    use pomocycle_core::{SessionState, Stats};

    fn snapshot() -> RuntimeSnapshot {
        let settings = Settings::default();
        RuntimeSnapshot {
            state: SessionState::initial(&settings),
            settings,
            stats: Stats::default(),
            celebrating: false,
        }
    }

    #[test]
    fn frame_starts_with_title() {
        let app = App::new(Arc::new(NullNotifier));
        let lines = frame_lines(&snapshot(), &app);
        assert_eq!(lines[0], "🍅 25:00 - Pomodoro Timer");
        assert!(lines.iter().any(|l| l.contains("paused")));
        assert!(!lines.iter().any(|l| l.contains("Cycle complete")));
    }

    #[test]
    fn markers_follow_cycle_position() {
        assert_eq!(cycle_markers(0), "○○○○");
        assert_eq!(cycle_markers(3), "●●●○");
    }

    #[test]
    fn progress_bar_fills_with_elapsed_time() {
        let mut snap = snapshot();
        assert_eq!(progress_bar(&snap), format!("[{}]", "-".repeat(BAR_WIDTH)));
        snap.state.time_left = 750;
        assert_eq!(
            progress_bar(&snap),
            format!("[{}{}]", "#".repeat(15), "-".repeat(15))
        );
    }

    #[test]
    fn celebration_banner_shown() {
        let app = App::new(Arc::new(NullNotifier));
        let mut snap = snapshot();
        snap.celebrating = true;
        assert!(frame_lines(&snap, &app).iter().any(|l| l.contains("Cycle complete")));
    }
}
