use std::sync::{
    mpsc::{self, Sender},
    Mutex,
};
use std::thread;

use rodio::{buffer::SamplesBuffer, OutputStream, Sink};

use super::{synth, SoundPlayer, Tone};
use crate::error::{CoreError, Result};

/// Plays tones on the default output device.
///
/// The output stream is not `Send`, so it lives on a dedicated thread that
/// is started on first use and fed through a channel.
pub struct DevicePlayer {
    tx: Mutex<Option<Sender<Tone>>>,
    volume: f32,
}

impl DevicePlayer {
    /// `volume` is 0-100.
    pub fn new(volume: u32) -> Self {
        Self {
            tx: Mutex::new(None),
            volume: (volume.min(100) as f32) / 100.0,
        }
    }

    fn ensure_thread(&self) -> Result<Sender<Tone>> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|e| CoreError::Custom(e.to_string()))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<Tone>();
        let volume = self.volume;

        thread::Builder::new()
            .name("pomocycle-audio".to_string())
            .spawn(move || {
                let mut output: Option<(OutputStream, Sink)> = None;

                while let Ok(tone) = rx.recv() {
                    if output.is_none() {
                        match open_output() {
                            Ok(opened) => output = Some(opened),
                            Err(e) => {
                                tracing::warn!(error = %e, "audio output unavailable");
                                continue;
                            }
                        }
                    }
                    if let Some((_, sink)) = output.as_ref() {
                        sink.set_volume(volume);
                        sink.append(SamplesBuffer::new(1, synth::SAMPLE_RATE, synth::render(tone)));
                    }
                }
            })?;

        *guard = Some(tx.clone());
        Ok(tx)
    }
}

fn open_output() -> std::result::Result<(OutputStream, Sink), String> {
    let (stream, handle) = OutputStream::try_default()
        .map_err(|e| format!("Failed to create audio output stream: {e}"))?;
    let sink = Sink::try_new(&handle).map_err(|e| format!("Failed to create audio sink: {e}"))?;
    Ok((stream, sink))
}

impl SoundPlayer for DevicePlayer {
    fn play(&self, tone: Tone) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(tone)
            .map_err(|e| CoreError::Custom(format!("audio thread stopped: {e}")))
    }
}
