//! PyO3 bindings for Python integration

use crate::state::AnalysisSnapshot;
use pyo3::prelude::*;
use pyo3::types::PyDict;

mod monitor_bindings;
mod pipeline_bindings;

/// Snapshot as a plain dict
///
/// Keys: 'frequency', 'note', 'strength', 'closest_portal', 'history',
/// 'sequence'
pub(crate) fn snapshot_to_dict(py: Python<'_>, snapshot: &AnalysisSnapshot) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("frequency", snapshot.frequency)?;
    dict.set_item("note", snapshot.note.to_string())?;
    dict.set_item("strength", snapshot.strength)?;
    dict.set_item("closest_portal", snapshot.closest_portal.as_deref())?;
    dict.set_item("history", snapshot.history.clone())?;
    dict.set_item("sequence", snapshot.sequence)?;
    Ok(dict.into())
}

/// Python module definition
#[pymodule]
fn sirius_audio(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<monitor_bindings::PyPitchMonitor>()?;
    m.add_class::<pipeline_bindings::PyPitchPipeline>()?;
    m.add_function(wrap_pyfunction!(pipeline_bindings::note_name, m)?)?;

    Ok(())
}
