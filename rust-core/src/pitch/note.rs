//! # Note Mapping
//!
//! Converts frequencies to equal-tempered note names relative to a
//! configurable concert pitch (A4, MIDI note 69).
//!
//! MIDI numbers are rounded to the nearest integer with ties away from zero,
//! so a frequency exactly half a semitone above a note maps to the note
//! above it.

use crate::config::SessionConfig;
use std::fmt;

/// The twelve chromatic pitch classes, starting at C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Pitch class for a semitone index; wraps modulo 12
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(12) as usize]
    }

    /// Semitones above C (0..12)
    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A note name with octave, or silence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLabel {
    Silence,
    Note { pitch_class: PitchClass, octave: i32 },
}

impl NoteLabel {
    /// Label for a MIDI note number (60 = C4)
    pub fn from_midi(midi: i32) -> Self {
        NoteLabel::Note {
            pitch_class: PitchClass::from_index(midi),
            octave: midi.div_euclid(12) - 1,
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self, NoteLabel::Silence)
    }

    pub fn midi_number(&self) -> Option<i32> {
        match *self {
            NoteLabel::Silence => None,
            NoteLabel::Note {
                pitch_class,
                octave,
            } => Some((octave + 1) * 12 + pitch_class.index()),
        }
    }

    pub fn pitch_class(&self) -> Option<PitchClass> {
        match *self {
            NoteLabel::Silence => None,
            NoteLabel::Note { pitch_class, .. } => Some(pitch_class),
        }
    }

    pub fn octave(&self) -> Option<i32> {
        match *self {
            NoteLabel::Silence => None,
            NoteLabel::Note { octave, .. } => Some(octave),
        }
    }
}

impl Default for NoteLabel {
    fn default() -> Self {
        NoteLabel::Silence
    }
}

impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteLabel::Silence => f.write_str("Silence"),
            NoteLabel::Note {
                pitch_class,
                octave,
            } => write!(f, "{}{}", pitch_class, octave),
        }
    }
}

/// Frequency to note quantizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteMapper {
    /// Concert pitch for A4 in Hz
    reference_a4: f64,

    /// Frequencies below this are silence
    floor_hz: f64,
}

impl Default for NoteMapper {
    fn default() -> Self {
        Self::new(440.0)
    }
}

impl NoteMapper {
    pub fn new(reference_a4: f64) -> Self {
        Self {
            reference_a4,
            floor_hz: 50.0,
        }
    }

    pub fn with_floor(mut self, floor_hz: f64) -> Self {
        self.floor_hz = floor_hz;
        self
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.reference_a4).with_floor(config.note_floor_hz)
    }

    pub fn reference_a4(&self) -> f64 {
        self.reference_a4
    }

    /// Nearest MIDI note number, or None below the floor
    pub fn midi_number(&self, freq: f64) -> Option<i32> {
        if !freq.is_finite() || freq <= 0.0 || freq < self.floor_hz {
            return None;
        }

        let n = 12.0 * (freq / self.reference_a4).log2() + 69.0;
        if n.is_finite() {
            Some(n.round() as i32)
        } else {
            None
        }
    }

    /// Map a frequency to its nearest equal-tempered note
    pub fn to_note(&self, freq: f64) -> NoteLabel {
        self.midi_number(freq)
            .map(NoteLabel::from_midi)
            .unwrap_or(NoteLabel::Silence)
    }

    /// Equal-tempered frequency of a note under this mapper's concert pitch
    pub fn frequency_of(&self, note: NoteLabel) -> Option<f64> {
        note.midi_number()
            .map(|n| self.reference_a4 * 2.0_f64.powf((n - 69) as f64 / 12.0))
    }

    /// Deviation of `freq` from its nearest note, in cents
    ///
    /// 100 cents = 1 semitone; positive is sharp. Always within ±50.
    pub fn cents_deviation(&self, freq: f64) -> Option<f64> {
        let target = self.frequency_of(self.to_note(freq))?;
        Some(1200.0 * (freq / target).log2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch_class: PitchClass, octave: i32) -> NoteLabel {
        NoteLabel::Note {
            pitch_class,
            octave,
        }
    }

    #[test]
    fn test_reference_notes() {
        let mapper = NoteMapper::default();

        assert_eq!(mapper.to_note(440.0), note(PitchClass::A, 4));
        assert_eq!(mapper.to_note(261.63), note(PitchClass::C, 4));
        assert_eq!(mapper.to_note(27.5 * 2.0), note(PitchClass::A, 1));
        assert_eq!(mapper.to_note(4186.01), note(PitchClass::C, 8));
        assert_eq!(mapper.to_note(466.16), note(PitchClass::ASharp, 4));
        assert_eq!(mapper.to_note(123.47), note(PitchClass::B, 2));
    }

    #[test]
    fn test_silence_below_floor() {
        let mapper = NoteMapper::default();

        assert_eq!(mapper.to_note(0.0), NoteLabel::Silence);
        assert_eq!(mapper.to_note(49.99), NoteLabel::Silence);
        assert_eq!(mapper.to_note(-440.0), NoteLabel::Silence);
        assert_eq!(mapper.to_note(f64::NAN), NoteLabel::Silence);
        assert_eq!(mapper.to_note(f64::INFINITY), NoteLabel::Silence);

        // 50 Hz itself is a note (G1 is ~49 Hz, so rounds to G1)
        assert_eq!(mapper.to_note(50.0), note(PitchClass::G, 1));
    }

    #[test]
    fn test_half_semitone_rounds_up() {
        let mapper = NoteMapper::default();

        // Exactly halfway between A4 (69) and A#4 (70): 69.5 rounds to 70
        let halfway = 440.0 * 2.0_f64.powf(0.5 / 12.0);
        assert_eq!(mapper.midi_number(halfway * 1.000_000_1), Some(70));
        assert_eq!(mapper.midi_number(halfway * 0.999_999_9), Some(69));
        assert_eq!(69.5_f64.round(), 70.0);
    }

    #[test]
    fn test_octave_boundaries() {
        let mapper = NoteMapper::default();

        // B3 -> C4 crosses the octave number
        assert_eq!(mapper.to_note(246.94), note(PitchClass::B, 3));
        assert_eq!(mapper.to_note(261.63).octave(), Some(4));
        assert_eq!(NoteLabel::from_midi(0), note(PitchClass::C, -1));
        assert_eq!(NoteLabel::from_midi(-1), note(PitchClass::B, -2));
    }

    #[test]
    fn test_custom_reference_pitch() {
        let mapper = NoteMapper::new(432.0);
        assert_eq!(mapper.to_note(432.0), note(PitchClass::A, 4));
        assert!((mapper.frequency_of(note(PitchClass::A, 5)).unwrap() - 864.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(note(PitchClass::A, 4).to_string(), "A4");
        assert_eq!(note(PitchClass::CSharp, 3).to_string(), "C#3");
        assert_eq!(NoteLabel::Silence.to_string(), "Silence");
    }

    #[test]
    fn test_midi_round_trip_and_cents() {
        let mapper = NoteMapper::default();

        for midi in 32..110 {
            let label = NoteLabel::from_midi(midi);
            assert_eq!(label.midi_number(), Some(midi));
            let freq = mapper.frequency_of(label).unwrap();
            assert_eq!(mapper.to_note(freq), label);
        }

        let cents = mapper.cents_deviation(445.0).unwrap();
        assert!((cents - 19.56).abs() < 0.01);
        assert_eq!(mapper.cents_deviation(10.0), None);
    }
}
