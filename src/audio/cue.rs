//! Procedural sound cues.
//!
//! Each cue is rendered in one pass into a mono buffer: oscillators and
//! noise through automated filters and gains. Nothing is loaded from disk.

use rand::Rng;

use super::synth::{Automation, Biquad, FilterKind, Oscillator, Waveform};

/// Every sound the experience can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Low scanner drone while the button is held
    Hum,
    /// Short percussive blip on press
    Ping,
    /// Sub drop plus filtered saw sweep on authorization
    Success,
    /// Three rising sine chirps when the validation line appears
    Alert,
    /// Tiny noise tick per revealed character
    Keystroke,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::Hum, Cue::Ping, Cue::Success, Cue::Alert, Cue::Keystroke];

    pub fn name(self) -> &'static str {
        match self {
            Cue::Hum => "hum",
            Cue::Ping => "ping",
            Cue::Success => "success",
            Cue::Alert => "alert",
            Cue::Keystroke => "keystroke",
        }
    }

    /// Length of the rendered buffer (seconds)
    pub fn duration_s(self) -> f32 {
        match self {
            Cue::Hum => 0.5,
            Cue::Ping => 0.15,
            Cue::Success => 1.5,
            Cue::Alert => 0.4,
            Cue::Keystroke => 0.02,
        }
    }

    /// Render the cue at `sample_rate` Hz
    pub fn render<R: Rng + ?Sized>(self, sample_rate: u32, rng: &mut R) -> Vec<f32> {
        let sr = sample_rate as f32;
        let len = (self.duration_s() * sr).ceil() as usize;
        match self {
            Cue::Hum => render_hum(len, sr),
            Cue::Ping => render_ping(len, sr),
            Cue::Success => render_success(len, sr),
            Cue::Alert => render_alert(len, sr),
            Cue::Keystroke => render_keystroke(len, sr, rng),
        }
    }
}

fn render_hum(len: usize, sr: f32) -> Vec<f32> {
    const DURATION: f32 = 0.5;

    let mut body = Oscillator::new(Waveform::Sine);
    let body_freq = Automation::new(40.0).linear_to(DURATION, 45.0);
    let body_gain = Automation::new(0.0).linear_to(0.05, 0.1).linear_to(DURATION, 0.0);

    // 15 Hz tremolo added onto the body gain
    let mut lfo = Oscillator::new(Waveform::Sine);

    let mut buzz = Oscillator::new(Waveform::Sawtooth);
    let mut buzz_filter = Biquad::new(FilterKind::Lowpass);
    let buzz_gain = Automation::new(0.0).linear_to(0.05, 0.02).linear_to(DURATION, 0.0);

    (0..len)
        .map(|i| {
            let t = i as f32 / sr;
            let tremolo = lfo.next(15.0, sr) * 0.02;
            let body = body.next(body_freq.value_at(t), sr) * (body_gain.value_at(t) + tremolo);
            let buzz = buzz_filter.process(buzz.next(80.0, sr), 200.0, 10.0, sr)
                * buzz_gain.value_at(t);
            body + buzz
        })
        .collect()
}

fn render_ping(len: usize, sr: f32) -> Vec<f32> {
    let mut osc = Oscillator::new(Waveform::Square);
    let freq = Automation::new(120.0).exp_to(0.1, 40.0);
    let mut filter = Biquad::new(FilterKind::Lowpass);
    let cutoff = Automation::new(800.0).exp_to(0.1, 100.0);
    let gain = Automation::new(0.2).exp_to(0.15, 0.001);

    (0..len)
        .map(|i| {
            let t = i as f32 / sr;
            let x = osc.next(freq.value_at(t), sr);
            filter.process(x, cutoff.value_at(t), 1.0, sr) * gain.value_at(t)
        })
        .collect()
}

fn render_success(len: usize, sr: f32) -> Vec<f32> {
    let mut sub = Oscillator::new(Waveform::Sine);
    let sub_freq = Automation::new(60.0).exp_to(1.5, 30.0);
    let sub_gain = Automation::new(0.4).exp_to(1.5, 0.001);

    let mut saw = Oscillator::new(Waveform::Sawtooth);
    let mut filter = Biquad::new(FilterKind::Lowpass);
    let cutoff = Automation::new(2000.0).exp_to(1.0, 100.0);
    let saw_gain = Automation::new(0.1).exp_to(1.2, 0.001);
    const SAW_STOP: f32 = 1.2;

    (0..len)
        .map(|i| {
            let t = i as f32 / sr;
            let low = sub.next(sub_freq.value_at(t), sr) * sub_gain.value_at(t);
            let sweep = if t < SAW_STOP {
                filter.process(saw.next(110.0, sr), cutoff.value_at(t), 5.0, sr)
                    * saw_gain.value_at(t)
            } else {
                0.0
            };
            low + sweep
        })
        .collect()
}

fn render_alert(len: usize, sr: f32) -> Vec<f32> {
    const STAGGER: f32 = 0.05;
    const TONE: f32 = 0.3;

    let mut out = vec![0.0; len];
    for (n, freq) in [1200.0, 1600.0, 2000.0].into_iter().enumerate() {
        let start = n as f32 * STAGGER;
        let mut osc = Oscillator::new(Waveform::Sine);
        let gain = Automation::new(0.1).exp_to(TONE, 0.001);

        let first = (start * sr).round() as usize;
        let count = (TONE * sr).round() as usize;
        for (offset, sample) in out.iter_mut().skip(first).take(count).enumerate() {
            let local_t = offset as f32 / sr;
            *sample += osc.next(freq, sr) * gain.value_at(local_t);
        }
    }
    out
}

fn render_keystroke<R: Rng + ?Sized>(len: usize, sr: f32, rng: &mut R) -> Vec<f32> {
    let mut click = Oscillator::new(Waveform::Triangle);
    let click_freq = 150.0 + rng.gen::<f32>() * 50.0;
    let mut filter = Biquad::new(FilterKind::Bandpass);
    let gain = Automation::new(0.08).exp_to(0.02, 0.001);

    (0..len)
        .map(|i| {
            let t = i as f32 / sr;
            let noise = rng.gen_range(-1.0f32..1.0);
            let x = noise + click.next(click_freq, sr);
            filter.process(x, 400.0, 2.0, sr) * gain.value_at(t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SR: u32 = 44100;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_every_cue_is_bounded_and_audible() {
        let mut rng = StdRng::seed_from_u64(11);
        for cue in Cue::ALL {
            let samples = cue.render(SR, &mut rng);
            let expected = (cue.duration_s() * SR as f32).ceil() as usize;
            assert_eq!(samples.len(), expected, "{}", cue.name());
            assert!(samples.iter().all(|s| s.is_finite()), "{}", cue.name());
            assert!(peak(&samples) < 1.0, "{} peak {}", cue.name(), peak(&samples));
            assert!(rms(&samples) > 1e-4, "{} is silent", cue.name());
        }
    }

    #[test]
    fn test_envelopes_decay_to_silence() {
        let mut rng = StdRng::seed_from_u64(12);
        for cue in [Cue::Ping, Cue::Success, Cue::Alert] {
            let samples = cue.render(SR, &mut rng);
            let head = &samples[..samples.len() / 10];
            let tail = &samples[samples.len() * 95 / 100..];
            assert!(peak(tail) < peak(head) * 0.2, "{}", cue.name());
        }
    }

    #[test]
    fn test_hum_starts_and_ends_quiet() {
        let mut rng = StdRng::seed_from_u64(13);
        let samples = Cue::Hum.render(SR, &mut rng);
        assert!(samples[0].abs() < 1e-3);
        let middle = &samples[samples.len() / 10..samples.len() / 5];
        let tail = &samples[samples.len() - 50..];
        assert!(peak(tail) < peak(middle));
    }

    #[test]
    fn test_alert_tones_are_staggered() {
        let mut rng = StdRng::seed_from_u64(14);
        let samples = Cue::Alert.render(SR, &mut rng);
        let stagger = (0.05 * SR as f32) as usize;
        // Only the first tone sounds before the second enters
        let first_only = rms(&samples[stagger / 2..stagger]);
        let all_three = rms(&samples[2 * stagger + stagger / 4..2 * stagger + stagger / 2]);
        assert!(first_only > 0.0);
        assert!(all_three > first_only);
        assert_eq!(samples.len(), (0.4 * SR as f32).ceil() as usize);
    }

    #[test]
    fn test_keystroke_varies_with_rng() {
        let a = Cue::Keystroke.render(SR, &mut StdRng::seed_from_u64(1));
        let b = Cue::Keystroke.render(SR, &mut StdRng::seed_from_u64(2));
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }
}
