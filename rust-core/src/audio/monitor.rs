//! Pitch monitor - analysis thread fed from the sample ring buffer
//!
//! The capture callback only pushes samples; this thread pulls whole blocks,
//! runs them through the [`PitchPipeline`], and hands the raw block to the
//! recording sink. Consumers read results through a [`StateReader`].

use super::buffer::SampleConsumer;
use super::recorder::{RecordingError, RecordingSink};
use crate::block::AudioBlock;
use crate::config::{ConfigError, SessionConfig};
use crate::pipeline::PitchPipeline;
use crate::state::{AnalysisSnapshot, StateReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "capture")]
use super::buffer::SampleRingBuffer;
#[cfg(feature = "capture")]
use super::input::{AudioError, AudioInput};

/// Sleep between polls when less than a block is buffered
const IDLE_SLEEP: Duration = Duration::from_micros(100);

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Monitor is already running")]
    AlreadyRunning,

    #[error("Analysis thread panicked; the monitor cannot be restarted")]
    PipelineLost,

    #[error("Failed to spawn analysis thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[cfg(feature = "capture")]
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Recording(#[from] RecordingError),
}

/// Counters shared with the analysis thread
#[derive(Debug, Default)]
struct Counters {
    blocks_analyzed: AtomicU64,
    dropped_samples: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorStats {
    pub blocks_analyzed: u64,

    /// Samples lost because the analysis thread fell behind
    pub dropped_samples: u64,
}

/// Owns the analysis thread for one session
pub struct PitchMonitor {
    config: SessionConfig,

    /// Parked here while the thread is stopped
    pipeline: Option<PitchPipeline>,

    reader: StateReader,

    recorder: Arc<RecordingSink>,

    #[cfg(feature = "capture")]
    audio_input: Option<AudioInput>,

    process_thread: Option<JoinHandle<PitchPipeline>>,

    running: Arc<AtomicBool>,

    counters: Arc<Counters>,
}

impl PitchMonitor {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let pipeline = PitchPipeline::new(&config)?;
        let reader = pipeline.reader();
        let recorder = Arc::new(RecordingSink::from_config(&config));

        Ok(Self {
            config,
            pipeline: Some(pipeline),
            reader,
            recorder,
            #[cfg(feature = "capture")]
            audio_input: None,
            process_thread: None,
            running: Arc::new(AtomicBool::new(false)),
            counters: Arc::new(Counters::default()),
        })
    }

    /// Capture from the default input device and start analysing
    ///
    /// # Returns
    /// Name of the device being captured
    #[cfg(feature = "capture")]
    pub fn start_capture(&mut self) -> Result<String, MonitorError> {
        if self.is_running() {
            return Err(MonitorError::AlreadyRunning);
        }

        let (producer, consumer) = SampleRingBuffer::new(self.config.ring_capacity()).split();
        let input = AudioInput::from_default_device(producer, &self.config)?;
        let device_name = input.device_info().name.clone();

        input.start()?;
        self.audio_input = Some(input);

        if let Err(e) = self.start(consumer) {
            self.release_input();
            return Err(e);
        }

        log::info!("Capturing from {}", device_name);
        Ok(device_name)
    }

    /// Start the analysis thread reading from `consumer`
    pub fn start(&mut self, consumer: SampleConsumer) -> Result<(), MonitorError> {
        if self.is_running() {
            return Err(MonitorError::AlreadyRunning);
        }
        let mut pipeline = self.pipeline.take().ok_or(MonitorError::PipelineLost)?;

        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let recorder = Arc::clone(&self.recorder);
        let counters = Arc::clone(&self.counters);
        let block_size = self.config.block_size;
        let sample_rate = self.config.sample_rate;

        let spawned = std::thread::Builder::new()
            .name("pitch-analysis".to_string())
            .spawn(move || {
                let mut samples = vec![0.0; block_size];
                let mut consumer = consumer;

                // A block already popped is always analysed before the flag
                // is checked again.
                while running.load(Ordering::SeqCst) {
                    if consumer.read_block(&mut samples) {
                        let block = AudioBlock::new(&samples, sample_rate);
                        if pipeline.submit_block(&block).is_ok() {
                            recorder.append(&block);
                            counters.blocks_analyzed.fetch_add(1, Ordering::Relaxed);
                        }
                    } else {
                        std::thread::sleep(IDLE_SLEEP);
                    }
                    counters
                        .dropped_samples
                        .store(consumer.dropped_samples(), Ordering::Relaxed);
                }

                pipeline
            });

        match spawned {
            Ok(handle) => {
                self.process_thread = Some(handle);
                Ok(())
            }
            Err(e) => {
                // The closure (and the pipeline in it) is gone with the error
                self.running.store(false, Ordering::SeqCst);
                Err(MonitorError::Spawn(e))
            }
        }
    }

    /// Stop analysing; the last snapshot stays readable
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            match handle.join() {
                Ok(pipeline) => self.pipeline = Some(pipeline),
                Err(_) => log::error!("Analysis thread panicked"),
            }
        }

        #[cfg(feature = "capture")]
        self.release_input();
    }

    #[cfg(feature = "capture")]
    fn release_input(&mut self) {
        if let Some(input) = self.audio_input.take() {
            if let Err(e) = input.pause() {
                log::warn!("Failed to pause input stream: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.process_thread.is_some() && self.running.load(Ordering::SeqCst)
    }

    /// Toggle raw-audio recording
    ///
    /// Turning it off writes the WAV file and returns its path (None when
    /// nothing was captured).
    pub fn set_recording(&self, enabled: bool) -> Result<Option<PathBuf>, MonitorError> {
        Ok(self.recorder.set_recording(enabled)?)
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn snapshot(&self) -> Arc<AnalysisSnapshot> {
        self.reader.snapshot()
    }

    pub fn reader(&self) -> StateReader {
        self.reader.clone()
    }

    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            blocks_analyzed: self.counters.blocks_analyzed.load(Ordering::Relaxed),
            dropped_samples: self.counters.dropped_samples.load(Ordering::Relaxed),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Drop for PitchMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
