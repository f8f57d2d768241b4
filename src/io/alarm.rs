//! Audible cue for a finished countdown.
//!
//! Every alarm is fire-and-forget: `ring` returns immediately and swallows
//! all playback errors so a missing audio device never disturbs the timer.

use std::io::Write;

use crate::model::config::AlarmKind;

/// Chime pitch in Hz
pub const TONE_FREQUENCY: f32 = 880.0;
/// Chime length in seconds
pub const TONE_SECONDS: f32 = 1.0;
/// Peak gain of the chime envelope
pub const TONE_PEAK_GAIN: f32 = 0.1;
/// Time to reach peak gain, in seconds
pub const TONE_ATTACK_SECONDS: f32 = 0.1;

pub trait Alarm {
    fn ring(&self);
}

/// Writes the BEL control character to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl Alarm for TerminalBell {
    fn ring(&self) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

/// Does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn ring(&self) {}
}

/// Synthesized sine chime played on the default output device
#[cfg(feature = "tone")]
#[derive(Debug, Clone, Copy)]
pub struct ToneAlarm {
    sample_rate: u32,
}

#[cfg(feature = "tone")]
impl Default for ToneAlarm {
    fn default() -> Self {
        ToneAlarm {
            sample_rate: 44_100,
        }
    }
}

#[cfg(feature = "tone")]
impl Alarm for ToneAlarm {
    fn ring(&self) {
        let sample_rate = self.sample_rate;
        std::thread::spawn(move || {
            let samples = synthesize_tone(sample_rate);
            let _ = play_samples(samples, sample_rate);
        });
    }
}

#[cfg(feature = "tone")]
fn play_samples(samples: Vec<f32>, sample_rate: u32) -> Result<(), String> {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "no default output device".to_string())?;
    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    let length = samples.len();
    let position = Arc::new(AtomicUsize::new(0));
    let cursor = Arc::clone(&position);
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                let mut pos = cursor.load(Ordering::Relaxed);
                for sample in data.iter_mut() {
                    *sample = samples.get(pos).copied().unwrap_or(0.0);
                    pos += 1;
                }
                cursor.store(pos, Ordering::Relaxed);
            },
            |_err| {},
            None,
        )
        .map_err(|e| format!("failed to build output stream: {e}"))?;
    stream
        .play()
        .map_err(|e| format!("failed to start output stream: {e}"))?;

    while position.load(Ordering::Relaxed) < length {
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    Ok(())
}

/// The chime as mono samples: an 880 Hz sine whose gain ramps linearly from
/// 0 to 0.1 over the first 100 ms, then back to 0 at one second.
pub fn synthesize_tone(sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f32;
    let count = (rate * TONE_SECONDS) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / rate;
            let gain = if t < TONE_ATTACK_SECONDS {
                TONE_PEAK_GAIN * t / TONE_ATTACK_SECONDS
            } else {
                TONE_PEAK_GAIN * (TONE_SECONDS - t) / (TONE_SECONDS - TONE_ATTACK_SECONDS)
            };
            gain.max(0.0) * (2.0 * std::f32::consts::PI * TONE_FREQUENCY * t).sin()
        })
        .collect()
}

/// Build the alarm configured by `kind`. Without the `tone` feature the
/// chime falls back to the terminal bell.
pub fn alarm_for(kind: AlarmKind) -> Box<dyn Alarm> {
    match kind {
        #[cfg(feature = "tone")]
        AlarmKind::Tone => Box::new(ToneAlarm::default()),
        #[cfg(not(feature = "tone"))]
        AlarmKind::Tone => Box::new(TerminalBell),
        AlarmKind::Bell => Box::new(TerminalBell),
        AlarmKind::Off => Box::new(SilentAlarm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_length_matches_sample_rate() {
        assert_eq!(synthesize_tone(8_000).len(), 8_000);
        assert_eq!(synthesize_tone(44_100).len(), 44_100);
    }

    #[test]
    fn tone_envelope_stays_within_peak() {
        let samples = synthesize_tone(8_000);
        assert_eq!(samples[0], 0.0);
        let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= TONE_PEAK_GAIN + 1e-6);
        assert!(peak > TONE_PEAK_GAIN * 0.9);
        // Fades out towards the end
        let tail = samples[7_950..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail < 0.001);
    }

    #[test]
    fn silent_alarm_does_nothing() {
        alarm_for(AlarmKind::Off).ring();
    }
}
