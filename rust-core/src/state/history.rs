//! Fixed-capacity frequency history
//!
//! Circular array with an insertion cursor. Once full, each push overwrites
//! the oldest entry.

#[derive(Debug, Clone)]
pub struct FrequencyHistory {
    slots: Vec<f64>,

    /// Next slot to write
    cursor: usize,

    len: usize,
}

impl FrequencyHistory {
    /// Create an empty history; capacity is at least 1
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0.0; capacity.max(1)],
            cursor: 0,
            len: 0,
        }
    }

    /// Append a value, evicting the oldest one when full
    pub fn push(&mut self, value: f64) {
        self.slots[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Most recent value
    pub fn latest(&self) -> Option<f64> {
        if self.len == 0 {
            None
        } else {
            let cap = self.slots.len();
            Some(self.slots[(self.cursor + cap - 1) % cap])
        }
    }

    /// Values from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let cap = self.slots.len();
        let start = (self.cursor + cap - self.len) % cap;
        (0..self.len).map(move |i| self.slots[(start + i) % cap])
    }

    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter());
        out
    }
}
