//! Python bindings for offline block analysis

use super::snapshot_to_dict;
use crate::config::SessionConfig;
use crate::pipeline::PitchPipeline;
use crate::pitch::NoteMapper;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;

/// Pitch pipeline driven directly from Python
///
/// Useful for analysing recorded audio block by block.
#[pyclass(name = "PitchPipeline", unsendable)]
pub struct PyPitchPipeline {
    pipeline: PitchPipeline,
}

#[pymethods]
impl PyPitchPipeline {
    /// Create pipeline, optionally from a TOML config file
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<PathBuf>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => SessionConfig::load(path),
            None => Ok(SessionConfig::default()),
        }
        .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        let pipeline =
            PitchPipeline::new(&config).map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;

        Ok(Self { pipeline })
    }

    /// Analyse one block of exactly `block_size` samples
    ///
    /// Returns:
    ///     Dictionary with keys 'frequency', 'note', 'strength', 'closest_portal'
    fn submit_samples(&mut self, py: Python<'_>, samples: Vec<f64>) -> PyResult<PyObject> {
        let reading = self
            .pipeline
            .submit_samples(&samples)
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;

        let dict = PyDict::new(py);
        dict.set_item("frequency", reading.frequency)?;
        dict.set_item("note", reading.note.to_string())?;
        dict.set_item("strength", reading.portal.strength)?;
        dict.set_item("closest_portal", reading.portal.closest.as_deref())?;
        Ok(dict.into())
    }

    /// Latest state snapshot
    fn snapshot(&self, py: Python<'_>) -> PyResult<PyObject> {
        snapshot_to_dict(py, &self.pipeline.snapshot())
    }

    #[getter]
    fn block_size(&self) -> usize {
        self.pipeline.block_size()
    }

    #[getter]
    fn sample_rate(&self) -> u32 {
        self.pipeline.sample_rate()
    }

    /// Portal table, one "<freq> Hz - <label>" line each, then the current
    /// "Current: <freq> Hz - <note>" reading
    fn describe_portals(&self) -> String {
        let snapshot = self.pipeline.snapshot();
        self.pipeline
            .portal_scorer()
            .describe_reading(snapshot.frequency, snapshot.note)
    }
}

/// Note name for a frequency ("A4", "Silence")
#[pyfunction]
#[pyo3(signature = (frequency, reference_a4=440.0))]
pub fn note_name(frequency: f64, reference_a4: f64) -> String {
    NoteMapper::new(reference_a4).to_note(frequency).to_string()
}
