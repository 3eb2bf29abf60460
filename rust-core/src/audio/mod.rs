//! Audio capture, hand-off and recording

pub mod buffer;
#[cfg(feature = "capture")]
pub mod input;
pub mod monitor;
pub mod recorder;

pub use buffer::{SampleConsumer, SampleProducer, SampleRingBuffer};
#[cfg(feature = "capture")]
pub use input::{list_input_devices, AudioDeviceInfo, AudioError, AudioInput};
pub use monitor::{MonitorError, MonitorStats, PitchMonitor};
pub use recorder::{RecordingError, RecordingSink};
