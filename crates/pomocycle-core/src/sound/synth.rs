//! Sample synthesis for the three tones.
//!
//! All tones are mono sine waves rendered at [`SAMPLE_RATE`]. Envelopes rise
//! linearly over a short attack and then decay exponentially towards
//! [`FLOOR_GAIN`].

use std::f32::consts::TAU;

use super::Tone;

pub const SAMPLE_RATE: u32 = 44_100;

const ATTACK_SECS: f32 = 0.01;
const FLOOR_GAIN: f32 = 0.001;

/// One oscillator: a frequency schedule and a gain envelope.
struct Voice {
    /// Offset from the start of the tone.
    start: f32,
    length: f32,
    peak: f32,
    /// `(seconds from voice start, frequency)` steps, sorted by time.
    steps: &'static [(f32, f32)],
}

static FOCUS: [Voice; 1] = [Voice {
    start: 0.0,
    length: 0.3,
    peak: 0.1,
    steps: &[(0.0, 800.0), (0.1, 1000.0)],
}];

static BREAK: [Voice; 1] = [Voice {
    start: 0.0,
    length: 0.3,
    peak: 0.1,
    steps: &[(0.0, 600.0), (0.15, 400.0)],
}];

// C5, E5, G5 arpeggio.
static SUCCESS: [Voice; 3] = [
    Voice {
        start: 0.0,
        length: 0.5,
        peak: 0.05,
        steps: &[(0.0, 523.25)],
    },
    Voice {
        start: 0.1,
        length: 0.5,
        peak: 0.05,
        steps: &[(0.0, 659.25)],
    },
    Voice {
        start: 0.2,
        length: 0.5,
        peak: 0.05,
        steps: &[(0.0, 783.99)],
    },
];

fn voices(tone: Tone) -> &'static [Voice] {
    match tone {
        Tone::Focus => &FOCUS,
        Tone::Break => &BREAK,
        Tone::Success => &SUCCESS,
    }
}

impl Voice {
    fn gain(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.length {
            0.0
        } else if t < ATTACK_SECS {
            self.peak * t / ATTACK_SECS
        } else {
            let progress = (t - ATTACK_SECS) / (self.length - ATTACK_SECS);
            self.peak * (FLOOR_GAIN / self.peak).powf(progress)
        }
    }

    fn frequency(&self, t: f32) -> f32 {
        self.steps
            .iter()
            .take_while(|(at, _)| *at <= t)
            .last()
            .map(|(_, f)| *f)
            .unwrap_or(self.steps[0].1)
    }

    fn end(&self) -> f32 {
        self.start + self.length
    }

    fn mix_into(&self, out: &mut [f32]) {
        let rate = SAMPLE_RATE as f32;
        let first = (self.start * rate).round() as usize;
        let mut phase = 0.0f32;
        for (i, sample) in out.iter_mut().enumerate().skip(first) {
            let t = i as f32 / rate - self.start;
            if t >= self.length {
                break;
            }
            *sample += self.gain(t) * phase.sin();
            // Accumulate phase so frequency steps stay continuous.
            phase = (phase + TAU * self.frequency(t) / rate) % TAU;
        }
    }
}

/// Total length of `tone` in seconds.
pub fn duration_secs(tone: Tone) -> f32 {
    voices(tone).iter().map(Voice::end).fold(0.0, f32::max)
}

/// Render `tone` to mono samples in [-1, 1].
pub fn render(tone: Tone) -> Vec<f32> {
    let len = (duration_secs(tone) * SAMPLE_RATE as f32).round() as usize;
    let mut out = vec![0.0; len];
    for voice in voices(tone) {
        voice.mix_into(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn phase_tones_last_300ms() {
        assert_eq!(render(Tone::Focus).len(), 13_230);
        assert_eq!(render(Tone::Break).len(), 13_230);
    }

    #[test]
    fn success_chord_spans_staggered_notes() {
        assert!((duration_secs(Tone::Success) - 0.7).abs() < 1e-6);
        assert_eq!(render(Tone::Success).len(), 30_870);
    }

    #[test]
    fn amplitudes_stay_under_envelope_peaks() {
        assert!(peak(&render(Tone::Focus)) <= 0.1 + 1e-6);
        assert!(peak(&render(Tone::Break)) <= 0.1 + 1e-6);
        assert!(peak(&render(Tone::Success)) <= 0.15 + 1e-6);
        assert!(peak(&render(Tone::Focus)) > 0.05);
    }

    #[test]
    fn tones_start_silent() {
        for tone in [Tone::Focus, Tone::Break, Tone::Success] {
            assert_eq!(render(tone)[0], 0.0);
        }
    }

    #[test]
    fn frequency_steps_apply_at_offsets() {
        let v = &FOCUS[0];
        assert_eq!(v.frequency(0.05), 800.0);
        assert_eq!(v.frequency(0.1), 1000.0);
        let b = &BREAK[0];
        assert_eq!(b.frequency(0.149), 600.0);
        assert_eq!(b.frequency(0.2), 400.0);
    }

    #[test]
    fn envelope_decays_to_floor() {
        let v = &FOCUS[0];
        assert!((v.gain(ATTACK_SECS) - 0.1).abs() < 1e-6);
        assert!((v.gain(0.2999) - FLOOR_GAIN).abs() < 1e-4);
        assert_eq!(v.gain(0.3), 0.0);
    }
}
