//! Audible cues for phase changes and completed cycles.
//!
//! Playback is best effort: players report errors, and callers log them
//! without touching the timer.

#[cfg(feature = "audio")]
mod device;
pub mod synth;

#[cfg(feature = "audio")]
pub use device::DevicePlayer;

use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{SoundBackend, SoundConfig};
use crate::timer::Phase;

/// Tone families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Rising tone announcing focus.
    Focus,
    /// Falling tone announcing any break.
    Break,
    /// Arpeggio played when a full cycle completes.
    Success,
}

impl Tone {
    /// Tone announcing the start of `phase`.
    pub fn entering(phase: Phase) -> Tone {
        if phase.is_break() {
            Tone::Break
        } else {
            Tone::Focus
        }
    }
}

pub trait SoundPlayer: Send + Sync {
    fn play(&self, tone: Tone) -> Result<()>;
}

/// Plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, _tone: Tone) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell once per tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellPlayer;

impl SoundPlayer for BellPlayer {
    fn play(&self, _tone: Tone) -> Result<()> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Player for the configured backend.
///
/// `auto` uses the audio device when built with the `audio` feature and
/// falls back to the bell.
pub fn player_for(config: &SoundConfig) -> Arc<dyn SoundPlayer> {
    match config.backend {
        SoundBackend::Silent => Arc::new(SilentPlayer),
        SoundBackend::Bell => Arc::new(BellPlayer),
        SoundBackend::Auto => {
            #[cfg(feature = "audio")]
            {
                Arc::new(DevicePlayer::new(config.volume))
            }
            #[cfg(not(feature = "audio"))]
            {
                Arc::new(BellPlayer)
            }
        }
    }
}
