//! Portal frequency proximity
//!
//! Scores how close a frequency sits to the nearest entry of a fixed table
//! of reference frequencies. Strength falls off linearly from 1.0 on an
//! exact match to 0.0 at `falloff_hz` away.

use super::note::NoteLabel;
use crate::config::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;

/// One reference frequency and its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalFrequency {
    pub frequency: f64,
    pub label: Arc<str>,
}

impl PortalFrequency {
    pub fn new(frequency: f64, label: &str) -> Self {
        Self {
            frequency,
            label: Arc::from(label),
        }
    }
}

/// The stock portal table
pub fn default_portals() -> Vec<PortalFrequency> {
    vec![
        PortalFrequency::new(432.0, "Heart"),
        PortalFrequency::new(528.0, "DNA Repair"),
        PortalFrequency::new(639.0, "Connection"),
        PortalFrequency::new(741.0, "Awakening"),
        PortalFrequency::new(852.0, "Spiritual"),
    ]
}

/// Proximity of one frequency to the portal table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortalScore {
    /// 0.0 (out of range or silent) to 1.0 (exact match)
    pub strength: f64,

    /// Closest table entry; None for silence
    pub closest: Option<Arc<str>>,
}

impl PortalScore {
    pub fn silent() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortalScorer {
    table: Vec<PortalFrequency>,
    falloff_hz: f64,
}

impl Default for PortalScorer {
    fn default() -> Self {
        Self::new(default_portals(), 50.0)
    }
}

impl PortalScorer {
    pub fn new(table: Vec<PortalFrequency>, falloff_hz: f64) -> Self {
        Self { table, falloff_hz }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.portals.clone(), config.portal_falloff_hz)
    }

    pub fn table(&self) -> &[PortalFrequency] {
        &self.table
    }

    /// Score `freq` against the table
    ///
    /// Labels are shared `Arc<str>`, so scoring never allocates.
    pub fn score(&self, freq: f64) -> PortalScore {
        if !freq.is_finite() || freq <= 0.0 {
            return PortalScore::silent();
        }

        // Strict `<` keeps the first entry on equal distances
        let mut closest: Option<(&PortalFrequency, f64)> = None;
        for portal in &self.table {
            let distance = (freq - portal.frequency).abs();
            match closest {
                Some((_, best)) if distance >= best => {}
                _ => closest = Some((portal, distance)),
            }
        }

        match closest {
            Some((portal, distance)) => PortalScore {
                strength: (1.0 - distance / self.falloff_hz).clamp(0.0, 1.0),
                closest: Some(Arc::clone(&portal.label)),
            },
            None => PortalScore::silent(),
        }
    }

    /// Human-readable table listing, one "<freq> Hz - <label>" per line
    pub fn describe(&self) -> String {
        let mut text = String::new();
        for portal in &self.table {
            let _ = writeln!(text, "{} Hz - {}", portal.frequency, portal.label);
        }
        text
    }

    /// Table listing followed by a "Current: <freq> Hz - <note>" line
    pub fn describe_reading(&self, frequency: f64, note: NoteLabel) -> String {
        let mut text = self.describe();
        let _ = write!(text, "\nCurrent: {:.1} Hz - {}", frequency, note);
        text
    }
}
