//! Offline rendering of every cue to WAV files.

use std::path::{Path, PathBuf};

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::cue::Cue;
use crate::error::Error;

/// Write `<dir>/<cue>.wav` for every cue (mono, 32-bit float)
pub fn export_cues(dir: &Path, sample_rate: u32, seed: u64) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(dir)?;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut written = Vec::with_capacity(Cue::ALL.len());
    for cue in Cue::ALL {
        let path = dir.join(format!("{}.wav", cue.name()));
        let mut writer = hound::WavWriter::create(&path, spec)?;
        for sample in cue.render(sample_rate, &mut rng) {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports_one_file_per_cue() {
        let dir = std::env::temp_dir().join(format!("omega-cues-{}", std::process::id()));
        let paths = export_cues(&dir, 22050, 7).unwrap();
        assert_eq!(paths.len(), Cue::ALL.len());

        for (cue, path) in Cue::ALL.iter().zip(&paths) {
            let reader = hound::WavReader::open(path).unwrap();
            assert_eq!(reader.spec().channels, 1);
            assert_eq!(reader.spec().sample_rate, 22050);
            let expected = (cue.duration_s() * 22050.0).ceil() as u32;
            assert_eq!(reader.duration(), expected, "{}", cue.name());
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
