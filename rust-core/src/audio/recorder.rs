//! Raw-audio recording sink
//!
//! While recording is on, every accepted block is appended to an in-memory
//! accumulator. Turning it off writes the accumulator to a numbered mono
//! WAV file (`<prefix>_<n>.wav`, 32-bit float) and clears it.

use crate::block::AudioBlock;
use crate::config::{RecordingConfig, SessionConfig};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Failed to create recording directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write recording {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

#[derive(Debug, Default)]
struct Accumulator {
    active: bool,
    samples: Vec<f32>,
    next_index: u32,
}

#[derive(Debug)]
pub struct RecordingSink {
    sample_rate: u32,
    directory: PathBuf,
    file_prefix: String,
    accumulator: Mutex<Accumulator>,
}

impl RecordingSink {
    pub fn new(sample_rate: u32, config: &RecordingConfig) -> Self {
        Self {
            sample_rate,
            directory: config.directory.clone(),
            file_prefix: config.file_prefix.clone(),
            accumulator: Mutex::new(Accumulator {
                next_index: 1,
                ..Accumulator::default()
            }),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.sample_rate, &config.recording)
    }

    pub fn is_recording(&self) -> bool {
        self.accumulator.lock().active
    }

    /// Samples collected so far in the current recording
    pub fn buffered_samples(&self) -> usize {
        self.accumulator.lock().samples.len()
    }

    /// Start (clearing anything left over) or stop and save
    ///
    /// Returns the saved file path when stopping wrote a file.
    pub fn set_recording(&self, enabled: bool) -> Result<Option<PathBuf>, RecordingError> {
        if enabled {
            self.start();
            Ok(None)
        } else {
            self.stop()
        }
    }

    pub fn start(&self) {
        let mut acc = self.accumulator.lock();
        acc.samples.clear();
        acc.active = true;
        log::info!("Recording started");
    }

    /// Stop recording and flush to disk
    ///
    /// Nothing is written when no samples were collected. If the write
    /// fails, the samples stay buffered, recording stays on and the file
    /// number is not consumed.
    pub fn stop(&self) -> Result<Option<PathBuf>, RecordingError> {
        let (samples, index) = {
            let mut acc = self.accumulator.lock();
            if !acc.active {
                return Ok(None);
            }
            acc.active = false;
            if acc.samples.is_empty() {
                return Ok(None);
            }
            (std::mem::take(&mut acc.samples), acc.next_index)
        };

        let path = self
            .directory
            .join(format!("{}_{}.wav", self.file_prefix, index));
        if let Err(e) = self.write_wav(&path, &samples) {
            // Put the take back so a later stop can retry
            let mut acc = self.accumulator.lock();
            let mut restored = samples;
            restored.append(&mut acc.samples);
            acc.samples = restored;
            acc.active = true;
            return Err(e);
        }
        self.accumulator.lock().next_index = index + 1;

        log::info!(
            "Saved recording {} ({:.1} s)",
            path.display(),
            samples.len() as f64 / self.sample_rate as f64
        );
        Ok(Some(path))
    }

    /// Append a raw block if recording is on
    pub fn append(&self, block: &AudioBlock<'_>) {
        let mut acc = self.accumulator.lock();
        if acc.active {
            acc.samples.extend(block.samples().iter().map(|&s| s as f32));
        }
    }

    fn write_wav(&self, path: &Path, samples: &[f32]) -> Result<(), RecordingError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| RecordingError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let wav_err = |source| RecordingError::Wav {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
        for &sample in samples {
            writer.write_sample(sample).map_err(wav_err)?;
        }
        writer.finalize().map_err(wav_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(dir: &Path) -> RecordingSink {
        RecordingSink::new(
            8000,
            &RecordingConfig {
                directory: dir.to_path_buf(),
                file_prefix: "take".to_string(),
            },
        )
    }

    #[test]
    fn test_ignores_blocks_while_idle() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        sink.append(&AudioBlock::new(&[0.5; 16], 8000));

        assert!(!sink.is_recording());
        assert_eq!(sink.buffered_samples(), 0);
        assert_eq!(sink.stop().unwrap(), None);
    }

    #[test]
    fn test_records_and_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        sink.set_recording(true).unwrap();
        sink.append(&AudioBlock::new(&[0.25; 16], 8000));
        sink.append(&AudioBlock::new(&[-0.5; 16], 8000));
        assert_eq!(sink.buffered_samples(), 32);

        let first = sink.set_recording(false).unwrap().unwrap();
        assert_eq!(first, dir.path().join("take_1.wav"));
        assert_eq!(sink.buffered_samples(), 0);

        let mut reader = hound::WavReader::open(&first).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 32);
        assert_eq!(samples[0], 0.25);
        assert_eq!(samples[31], -0.5);

        sink.set_recording(true).unwrap();
        sink.append(&AudioBlock::new(&[0.1; 4], 8000));
        let second = sink.set_recording(false).unwrap().unwrap();
        assert_eq!(second, dir.path().join("take_2.wav"));
    }

    #[test]
    fn test_empty_recording_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        sink.set_recording(true).unwrap();
        assert_eq!(sink.set_recording(false).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // The unused number is still available
        sink.set_recording(true).unwrap();
        sink.append(&AudioBlock::new(&[0.1; 4], 8000));
        let path = sink.set_recording(false).unwrap().unwrap();
        assert!(path.ends_with("take_1.wav"));
    }

    #[test]
    fn test_failed_flush_keeps_samples() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();
        let sink = sink(&blocker);

        sink.start();
        sink.append(&AudioBlock::new(&[0.3; 64], 8000));

        assert!(matches!(sink.stop(), Err(RecordingError::CreateDir { .. })));
        assert!(sink.is_recording());
        assert_eq!(sink.buffered_samples(), 64);

        // Once the directory can be created the same take is saved as file 1
        std::fs::remove_file(&blocker).unwrap();
        let path = sink.stop().unwrap().unwrap();
        assert_eq!(path, blocker.join("take_1.wav"));
        assert_eq!(hound::WavReader::open(&path).unwrap().len(), 64);
        assert_eq!(sink.buffered_samples(), 0);
    }

    #[test]
    fn test_restart_clears_accumulator() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path());

        sink.start();
        sink.append(&AudioBlock::new(&[0.1; 10], 8000));
        sink.start();
        assert_eq!(sink.buffered_samples(), 0);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sessions").join("today");
        let sink = sink(&nested);

        sink.start();
        sink.append(&AudioBlock::new(&[0.1; 10], 8000));
        let path = sink.stop().unwrap().unwrap();
        assert!(path.exists());
    }
}
