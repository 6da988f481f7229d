//! Small synthesis kit: oscillators, parameter automation, biquad filters.
//!
//! Parameter automation follows the usual audio-graph model: a value is set
//! at a time, and later events ramp to new values linearly or exponentially
//! from the previous event.

use std::f32::consts::{PI, TAU};

use crate::params::audio_constants::EXP_RAMP_FLOOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Phase-accumulating oscillator
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    /// Normalized phase in [0, 1)
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    /// Next sample at `freq_hz`
    pub fn next(&mut self, freq_hz: f32, sample_rate: f32) -> f32 {
        let phase = self.phase;
        self.phase = (self.phase + freq_hz / sample_rate).fract();

        match self.waveform {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ramp {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Event {
    time_s: f32,
    value: f32,
    ramp: Ramp,
}

/// Scheduled parameter curve
#[derive(Debug, Clone)]
pub struct Automation {
    events: Vec<Event>,
}

impl Automation {
    /// Constant `value` from t = 0
    pub fn new(value: f32) -> Self {
        Self {
            events: vec![Event {
                time_s: 0.0,
                value,
                ramp: Ramp::Set,
            }],
        }
    }

    /// Jump to `value` at `time_s`
    pub fn set(self, time_s: f32, value: f32) -> Self {
        self.push(time_s, value, Ramp::Set)
    }

    /// Ramp linearly from the previous event to `value` at `time_s`
    pub fn linear_to(self, time_s: f32, value: f32) -> Self {
        self.push(time_s, value, Ramp::Linear)
    }

    /// Ramp exponentially from the previous event to `value` at `time_s`
    pub fn exp_to(self, time_s: f32, value: f32) -> Self {
        self.push(time_s, value, Ramp::Exponential)
    }

    fn push(mut self, time_s: f32, value: f32, ramp: Ramp) -> Self {
        let event = Event {
            time_s,
            value,
            ramp,
        };
        // Events keep insertion order among equal times
        let at = self.events.partition_point(|e| e.time_s <= time_s);
        self.events.insert(at, event);
        self
    }

    /// Value at `t` seconds
    pub fn value_at(&self, t: f32) -> f32 {
        let next_index = self.events.partition_point(|e| e.time_s <= t);
        let Some(prev) = next_index.checked_sub(1).map(|i| self.events[i]) else {
            return self.events[0].value;
        };
        let Some(next) = self.events.get(next_index) else {
            return prev.value;
        };

        let span = next.time_s - prev.time_s;
        if span <= 0.0 {
            return prev.value;
        }
        let x = (t - prev.time_s) / span;

        match next.ramp {
            Ramp::Set => prev.value,
            Ramp::Linear => prev.value + (next.value - prev.value) * x,
            Ramp::Exponential => {
                let from = nonzero(prev.value);
                let to = nonzero(next.value);
                if from.signum() != to.signum() {
                    return prev.value;
                }
                from * (to / from).powf(x)
            }
        }
    }
}

fn nonzero(value: f32) -> f32 {
    if value.abs() < f32::EPSILON {
        EXP_RAMP_FLOOR.copysign(value)
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Resonant lowpass; Q is resonance in dB
    Lowpass,
    /// Constant 0 dB peak bandpass; Q is bandwidth quality
    Bandpass,
}

/// Direct-form I biquad with per-sample coefficient updates
#[derive(Debug, Clone)]
pub struct Biquad {
    kind: FilterKind,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn process(&mut self, input: f32, cutoff_hz: f32, q: f32, sample_rate: f32) -> f32 {
        let nyquist = sample_rate * 0.5;
        let cutoff = cutoff_hz.clamp(10.0, nyquist * 0.99);
        let w0 = 2.0 * PI * cutoff / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();

        let (b0, b1, b2, a0, a1, a2) = match self.kind {
            FilterKind::Lowpass => {
                let q_linear = 10f32.powf(q / 20.0).max(0.01);
                let alpha = sin_w0 / (2.0 * q_linear);
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            FilterKind::Bandpass => {
                let alpha = sin_w0 / (2.0 * q.max(0.01));
                (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
        };

        let output = (b0 * input + b1 * self.x1 + b2 * self.x2 - a1 * self.y1 - a2 * self.y2) / a0;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }
}
