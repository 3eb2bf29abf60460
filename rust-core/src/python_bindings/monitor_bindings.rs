//! Python bindings for live pitch monitoring

use super::snapshot_to_dict;
use crate::audio::{list_input_devices, PitchMonitor};
use crate::config::SessionConfig;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

/// Live pitch monitor exposed to Python
///
/// Capture and analysis run on Rust threads; Python only polls snapshots.
#[pyclass(name = "PitchMonitor", unsendable)]
pub struct PyPitchMonitor {
    monitor: PitchMonitor,
}

#[pymethods]
impl PyPitchMonitor {
    /// Create monitor, optionally from a TOML config file
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => SessionConfig::load(path),
            None => Ok(SessionConfig::default()),
        }
        .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        let monitor =
            PitchMonitor::new(config).map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;

        Ok(Self { monitor })
    }

    /// Start audio capture and analysis
    ///
    /// Returns:
    ///     Device name as string
    fn start(&mut self) -> PyResult<String> {
        self.monitor
            .start_capture()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }

    /// Stop audio capture
    fn stop(&mut self) {
        self.monitor.stop();
    }

    fn is_running(&self) -> bool {
        self.monitor.is_running()
    }

    /// Turn raw-audio recording on or off
    ///
    /// Returns:
    ///     Path of the saved WAV file when turning off, otherwise None
    fn set_recording(&self, enabled: bool) -> PyResult<Option<String>> {
        self.monitor
            .set_recording(enabled)
            .map(|path| path.map(|p| p.display().to_string()))
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }

    fn is_recording(&self) -> bool {
        self.monitor.is_recording()
    }

    /// Latest analysis values
    ///
    /// Returns:
    ///     Dictionary with keys 'frequency', 'note', 'strength',
    ///     'closest_portal', 'history', 'sequence'
    fn snapshot(&self, py: Python<'_>) -> PyResult<PyObject> {
        snapshot_to_dict(py, &self.monitor.snapshot())
    }

    /// (blocks_analyzed, dropped_samples)
    fn stats(&self) -> (u64, u64) {
        let stats = self.monitor.stats();
        (stats.blocks_analyzed, stats.dropped_samples)
    }

    /// List available audio devices
    #[staticmethod]
    fn list_devices() -> PyResult<Vec<String>> {
        list_input_devices()
            .map(|devices| devices.into_iter().map(|d| d.name).collect())
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }
}
