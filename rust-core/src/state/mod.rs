//! Shared analysis state
//!
//! One writer (the pipeline) and any number of readers. Every update builds
//! a fresh immutable [`AnalysisSnapshot`] and swaps it in behind an `Arc`;
//! the lock only guards that pointer swap, so readers never see a
//! half-written record and never hold up the writer for longer than an
//! `Arc` clone.

pub mod history;

pub use history::FrequencyHistory;

use crate::pitch::NoteLabel;
use parking_lot::RwLock;
use std::sync::Arc;

/// Immutable copy of the latest analysis values
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSnapshot {
    /// Dominant frequency in Hz, 0.0 for silence
    pub frequency: f64,

    pub note: NoteLabel,

    /// Portal strength, 0.0 to 1.0
    pub strength: f64,

    /// Label of the closest portal, None while silent
    pub closest_portal: Option<Arc<str>>,

    /// Recent frequencies, oldest first
    pub history: Vec<f64>,

    /// Number of updates applied so far
    pub sequence: u64,
}

impl Default for AnalysisSnapshot {
    fn default() -> Self {
        Self {
            frequency: 0.0,
            note: NoteLabel::Silence,
            strength: 0.0,
            closest_portal: None,
            history: Vec::new(),
            sequence: 0,
        }
    }
}

impl AnalysisSnapshot {
    pub fn is_silent(&self) -> bool {
        self.frequency == 0.0
    }

    /// "Frequency: 440.0 Hz"
    pub fn frequency_summary(&self) -> String {
        format!("Frequency: {:.1} Hz", self.frequency)
    }

    /// "Portal: Heart (0.80)", or "Portal: None" while silent
    pub fn portal_summary(&self) -> String {
        match (&self.closest_portal, self.is_silent()) {
            (Some(label), false) => format!("Portal: {} ({:.2})", label, self.strength),
            _ => "Portal: None".to_string(),
        }
    }
}

type Published = Arc<RwLock<Arc<AnalysisSnapshot>>>;

/// Latest analysis values plus a bounded history
///
/// Mutation takes `&mut self`, so there is exactly one writer. Hand out
/// [`StateReader`]s to consumers on other threads.
pub struct AnalysisState {
    history: FrequencyHistory,
    sequence: u64,
    published: Published,
}

impl AnalysisState {
    /// Silence defaults and an empty history of `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            history: FrequencyHistory::new(capacity),
            sequence: 0,
            published: Arc::new(RwLock::new(Arc::new(AnalysisSnapshot::default()))),
        }
    }

    /// Overwrite the current values and append `frequency` to the history
    ///
    /// Out-of-range inputs are clamped (negative or non-finite frequency to
    /// 0.0, strength into [0, 1]) so the published invariants always hold.
    pub fn update(
        &mut self,
        frequency: f64,
        note: NoteLabel,
        strength: f64,
        closest_portal: Option<Arc<str>>,
    ) {
        let frequency = if frequency.is_finite() && frequency > 0.0 {
            frequency
        } else {
            0.0
        };
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.history.push(frequency);
        self.sequence += 1;

        let next = Arc::new(AnalysisSnapshot {
            frequency,
            note,
            strength,
            closest_portal,
            history: self.history.to_vec(),
            sequence: self.sequence,
        });

        // Swap under the lock, free the old snapshot outside it
        let previous = std::mem::replace(&mut *self.published.write(), next);
        drop(previous);
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<AnalysisSnapshot> {
        Arc::clone(&self.published.read())
    }

    /// Cloneable read handle for other threads
    pub fn reader(&self) -> StateReader {
        StateReader {
            published: Arc::clone(&self.published),
        }
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Read-only view of an [`AnalysisState`]
#[derive(Clone)]
pub struct StateReader {
    published: Published,
}

impl StateReader {
    pub fn snapshot(&self) -> Arc<AnalysisSnapshot> {
        Arc::clone(&self.published.read())
    }
}

impl std::fmt::Debug for StateReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateReader")
            .field("sequence", &self.snapshot().sequence)
            .finish()
    }
}
