//! Process-wide audio output: lazily opened cpal stream plus a voice mixer.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::cue::Cue;
use crate::params::AudioConfig;

static AUDIO: OnceLock<AudioSystem> = OnceLock::new();

/// Sums active voices into the output buffer
pub struct Mixer {
    voices: Vec<Voice>,
    max_voices: usize,
    limiter: f32,
}

struct Voice {
    samples: Vec<f32>,
    position: usize,
}

impl Mixer {
    pub fn new(max_voices: usize, limiter: f32) -> Self {
        Self {
            voices: Vec::new(),
            max_voices: max_voices.max(1),
            limiter,
        }
    }

    /// Start a voice; the oldest voice is dropped when full
    pub fn push(&mut self, samples: Vec<f32>) {
        if samples.is_empty() {
            return;
        }
        if self.voices.len() >= self.max_voices {
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            samples,
            position: 0,
        });
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Fill an interleaved buffer; the mono mix goes to every channel
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let mut sum = 0.0;
            for voice in &mut self.voices {
                if let Some(&s) = voice.samples.get(voice.position) {
                    sum += s;
                    voice.position += 1;
                }
            }
            // Safety limiter: hard clip
            let sample = sum.clamp(-self.limiter, self.limiter);
            frame.fill(sample);
        }
        self.voices.retain(|v| v.position < v.samples.len());
    }
}

enum Command {
    Play(Cue),
}

enum Backend {
    /// Nothing requested yet
    Cold,
    Running(Sender<Command>),
    /// Opening failed or the audio thread is gone
    Unavailable,
}

/// Shared audio output, opened on the first cue request
pub struct AudioSystem {
    config: AudioConfig,
    backend: Mutex<Backend>,
}

impl AudioSystem {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            backend: Mutex::new(Backend::Cold),
        }
    }

    /// Install the process-wide audio system; later calls return the first one
    pub fn init(config: AudioConfig) -> &'static AudioSystem {
        AUDIO.get_or_init(|| AudioSystem::new(config))
    }

    /// Fire-and-forget cue; failures are swallowed
    pub fn play(&self, cue: Cue) {
        if self.config.muted {
            return;
        }
        let Ok(mut backend) = self.backend.lock() else {
            return;
        };

        if matches!(*backend, Backend::Cold) {
            *backend = self.start();
        }

        if let Backend::Running(sender) = &*backend {
            if sender.send(Command::Play(cue)).is_err() {
                warn!("audio thread stopped, cues disabled");
                *backend = Backend::Unavailable;
            }
        }
    }

    fn start(&self) -> Backend {
        let (sender, receiver) = mpsc::channel();
        let config = self.config.clone();
        let spawned = thread::Builder::new()
            .name("audio".into())
            .spawn(move || run_audio_thread(config, receiver));

        match spawned {
            Ok(_) => Backend::Running(sender),
            Err(e) => {
                warn!("failed to spawn audio thread: {}", e);
                Backend::Unavailable
            }
        }
    }
}

/// Owns the stream for the life of the process
fn run_audio_thread(config: AudioConfig, commands: Receiver<Command>) {
    let mixer = Arc::new(Mutex::new(Mixer::new(config.max_voices, config.limiter)));
    let (stream, sample_rate) = match open_stream(Arc::clone(&mixer)) {
        Ok(opened) => opened,
        Err(e) => {
            warn!("audio unavailable: {}", e);
            return;
        }
    };

    let mut rng = StdRng::from_entropy();
    for command in commands {
        match command {
            Command::Play(cue) => {
                // Resume on every request
                if let Err(e) = stream.play() {
                    warn!("failed to resume audio stream: {}", e);
                }
                let samples = cue.render(sample_rate, &mut rng);
                if let Ok(mut mixer) = mixer.lock() {
                    mixer.push(samples);
                }
            }
        }
    }
}

fn open_stream(mixer: Arc<Mutex<Mixer>>) -> Result<(cpal::Stream, u32), String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("No audio output device found")?;

    let config = device
        .default_output_config()
        .map_err(|e| format!("Failed to get audio config: {}", e))?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(format!(
            "Unsupported sample format {:?}",
            config.sample_format()
        ));
    }

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    info!(
        "Audio: {} @ {}Hz, {} channels",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        sample_rate,
        channels
    );

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match mixer.lock() {
                Ok(mut mixer) => mixer.fill(data, channels),
                Err(_) => data.fill(0.0),
            },
            |err| warn!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| format!("Failed to build audio stream: {}", e))?;

    stream
        .play()
        .map_err(|e| format!("Failed to start audio stream: {}", e))?;

    Ok((stream, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixer_sums_and_drops_finished_voices() {
        let mut mixer = Mixer::new(4, 0.5);
        mixer.push(vec![0.1, 0.1, 0.1]);
        mixer.push(vec![0.2]);

        let mut out = [0.0f32; 4];
        mixer.fill(&mut out, 2);
        assert!((out[0] - 0.3).abs() < 1e-6);
        assert_eq!(out[0], out[1]);
        assert!((out[2] - 0.1).abs() < 1e-6);
        assert_eq!(mixer.active_voices(), 1);

        let mut out = [0.0f32; 2];
        mixer.fill(&mut out, 1);
        assert!((out[0] - 0.1).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn test_mixer_hard_limits_output() {
        let mut mixer = Mixer::new(8, 0.5);
        for _ in 0..4 {
            mixer.push(vec![0.4; 16]);
            mixer.push(vec![-0.1; 16]);
        }
        let mut out = [0.0f32; 16];
        mixer.fill(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_mixer_drops_oldest_voice_when_full() {
        let mut mixer = Mixer::new(2, 1.0);
        mixer.push(vec![0.5; 8]);
        mixer.push(vec![0.1; 8]);
        mixer.push(vec![0.2; 8]);
        assert_eq!(mixer.active_voices(), 2);

        let mut out = [0.0f32; 1];
        mixer.fill(&mut out, 1);
        assert!((out[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_muted_system_never_opens_output() {
        let audio = AudioSystem::new(AudioConfig {
            muted: true,
            ..AudioConfig::default()
        });
        audio.play(Cue::Ping);
        audio.play(Cue::Success);
        let cold = audio.backend.lock().unwrap();
        assert!(matches!(*cold, Backend::Cold));
    }
}
