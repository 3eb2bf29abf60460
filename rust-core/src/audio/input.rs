//! Audio input capture using cpal
//!
//! Opens the input device at the session sample rate and pushes channel 0
//! of every callback buffer into the sample ring buffer.

use super::buffer::SampleProducer;
use crate::config::SessionConfig;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, Stream, StreamConfig, SupportedStreamConfigRange};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio input device found")]
    NoDevice,

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to query supported configs: {0}")]
    SupportedConfigs(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),

    #[error("Device does not offer f32 capture at {0} Hz")]
    UnsupportedSampleRate(u32),
}

/// Audio input device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio input stream
pub struct AudioInput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

impl AudioInput {
    /// Create audio input from default device
    ///
    /// # Arguments
    /// * `producer` - Ring buffer producer for captured audio
    /// * `config` - Session settings; the device must support its sample rate
    pub fn from_default_device(
        producer: SampleProducer,
        config: &SessionConfig,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

        Self::from_device(device, producer, config)
    }

    /// Create audio input from specific device
    pub fn from_device(
        device: Device,
        producer: SampleProducer,
        config: &SessionConfig,
    ) -> Result<Self, AudioError> {
        let name = device
            .name()
            .map_err(|e| AudioError::DeviceName(e.to_string()))?;

        let supported = device
            .supported_input_configs()
            .map_err(|e| AudioError::SupportedConfigs(e.to_string()))?;
        let range = find_supported_config(supported, config.sample_rate)
            .ok_or(AudioError::UnsupportedSampleRate(config.sample_rate))?;

        let channels = range.channels();
        let stream_config: StreamConfig = range
            .with_sample_rate(SampleRate(config.sample_rate))
            .into();

        log::debug!(
            "Opening {} at {} Hz, {} channel(s)",
            name,
            config.sample_rate,
            channels
        );

        let device_info = AudioDeviceInfo {
            name,
            sample_rate: config.sample_rate,
            channels,
        };

        let mut producer = producer;
        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    producer.write_first_channel(data, channels as usize);
                },
                move |err| {
                    log::warn!("Audio input error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        Ok(Self {
            stream,
            device_info,
        })
    }

    /// Start capturing audio
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause audio capture
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Get device information
    pub fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }
}

/// Pick an f32 config range containing `target_rate`, fewest channels first
fn find_supported_config(
    configs: impl Iterator<Item = SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .filter(|c| {
            c.sample_format() == SampleFormat::F32
                && c.min_sample_rate().0 <= target_rate
                && target_rate <= c.max_sample_rate().0
        })
        .min_by_key(|c| c.channels())
}

/// List available audio input devices
pub fn list_input_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let device_iter = host
        .input_devices()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    for device in device_iter {
        if let Ok(name) = device.name() {
            if let Ok(config) = device.default_input_config() {
                devices.push(AudioDeviceInfo {
                    name,
                    sample_rate: config.sample_rate().0,
                    channels: config.channels(),
                });
            }
        }
    }

    Ok(devices)
}
