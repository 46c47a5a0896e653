use std::collections::HashMap;

use fundsp::prelude::*;
use tracing::{debug, warn};

const SAMPLE_RATE: u32 = 44_100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Point,
    Wing,
    Hit,
    Die,
    Swoosh,
}

impl Sound {
    pub const ALL: [Sound; 5] = [
        Sound::Point,
        Sound::Wing,
        Sound::Hit,
        Sound::Die,
        Sound::Swoosh,
    ];
}

/// Fire-and-forget sound output.
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

impl<A: AudioSink + ?Sized> AudioSink for Box<A> {
    fn play(&mut self, sound: Sound) {
        (**self).play(sound);
    }
}

/// Discards every sound.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _sound: Sound) {}
}

// ── Synthesis ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Wave {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// Pitch glides `from` → `to` over `glide` seconds while the gain fades
/// from `gain` to silence over `secs`.
fn sweep(wave: Wave, from: f32, to: f32, glide: f32, gain: f32, secs: f32) -> Vec<f32> {
    let freq = lfo(move |t: f32| from + (to - from) * (t / glide).min(1.0));
    let env = lfo(move |t: f32| gain * (1.0 - t / secs).max(0.0));
    let mut unit: Box<dyn AudioUnit> = match wave {
        Wave::Sine => Box::new((freq >> sine::<f32>()) * env),
        Wave::Square => Box::new((freq >> square()) * env),
        Wave::Saw => Box::new((freq >> saw()) * env),
        Wave::Triangle => Box::new((freq >> triangle()) * env),
    };
    render(unit.as_mut(), secs)
}

fn burst(gain: f32, secs: f32) -> Vec<f32> {
    let env = lfo(move |t: f32| gain * (1.0 - t / secs).max(0.0).powi(2));
    let mut unit: Box<dyn AudioUnit> = Box::new(noise() * env);
    render(unit.as_mut(), secs)
}

fn render(unit: &mut dyn AudioUnit, secs: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    unit.reset();
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

fn synth(sound: Sound) -> Vec<f32> {
    match sound {
        Sound::Point => {
            let mut s = sweep(Wave::Sine, 880.0, 880.0, 1.0, 0.15, 0.08);
            s.extend(sweep(Wave::Sine, 1320.0, 1320.0, 1.0, 0.15, 0.16));
            s
        }
        Sound::Wing => sweep(Wave::Triangle, 300.0, 650.0, 0.08, 0.12, 0.1),
        Sound::Hit => {
            let mut s = burst(0.25, 0.06);
            s.extend(sweep(Wave::Square, 180.0, 60.0, 0.1, 0.1, 0.12));
            s
        }
        Sound::Die => sweep(Wave::Saw, 400.0, 80.0, 0.4, 0.15, 0.5),
        Sound::Swoosh => sweep(Wave::Sine, 1200.0, 300.0, 0.25, 0.08, 0.3),
    }
}

// ── Device output ───────────────────────────────────────────────────────────

/// Plays synthesized sounds on the default output device.
pub struct Speaker {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
    samples: HashMap<Sound, Vec<f32>>,
}

impl Speaker {
    /// `None` when no output device is available.
    pub fn open() -> Option<Self> {
        let (stream, handle) = match rodio::OutputStream::try_default() {
            Ok(pair) => pair,
            Err(error) => {
                warn!(error = %error, "audio_unavailable");
                return None;
            }
        };
        let samples = Sound::ALL.into_iter().map(|s| (s, synth(s))).collect();
        debug!("audio_ready");
        Some(Speaker {
            _stream: stream,
            handle,
            samples,
        })
    }
}

impl AudioSink for Speaker {
    fn play(&mut self, sound: Sound) {
        let Some(samples) = self.samples.get(&sound) else {
            return;
        };
        match rodio::Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(rodio::buffer::SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
                sink.detach(); // Play in background
            }
            Err(error) => warn!(error = %error, ?sound, "audio_play_failed"),
        }
    }
}
