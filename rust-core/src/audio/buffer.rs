//! Lock-free ring buffer for audio samples
//!
//! Single-producer single-consumer hand-off between the device callback and
//! the analysis thread. The producer side never blocks: samples that do not
//! fit are dropped and counted.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe sample ring buffer
pub struct SampleRingBuffer {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
    capacity: usize,
}

impl SampleRingBuffer {
    /// Create new ring buffer with given capacity
    ///
    /// # Arguments
    /// * `capacity` - Buffer capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f64>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (SampleProducer, SampleConsumer) {
        let dropped = Arc::new(AtomicU64::new(0));
        (
            SampleProducer {
                producer: self.producer,
                dropped: Arc::clone(&dropped),
            },
            SampleConsumer {
                consumer: self.consumer,
                dropped,
                capacity: self.capacity,
            },
        )
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Writing end, owned by the capture callback
pub struct SampleProducer {
    producer: HeapProducer<f64>,
    dropped: Arc<AtomicU64>,
}

impl SampleProducer {
    /// Write mono samples
    ///
    /// # Returns
    /// Number of samples actually written (less if the buffer is full)
    pub fn write(&mut self, samples: &[f64]) -> usize {
        let written = self.producer.push_slice(samples);
        self.count_dropped(samples.len() - written);
        written
    }

    /// Write channel 0 of interleaved `f32` frames
    ///
    /// A trailing partial frame is ignored. Returns the number of frames
    /// written.
    pub fn write_first_channel(&mut self, interleaved: &[f32], channels: usize) -> usize {
        if channels == 0 {
            return 0;
        }

        let frames = interleaved.len() / channels;
        let mut first_channel = interleaved
            .chunks_exact(channels)
            .map(|frame| frame[0] as f64);
        let written = self.producer.push_iter(&mut first_channel);
        self.count_dropped(frames - written);
        written
    }

    /// Get number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }

    /// Samples lost to overflow since the buffer was created
    pub fn dropped_samples(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn count_dropped(&self, n: usize) {
        if n > 0 {
            self.dropped.fetch_add(n as u64, Ordering::Relaxed);
        }
    }
}

/// Reading end, owned by the analysis thread
pub struct SampleConsumer {
    consumer: HeapConsumer<f64>,
    dropped: Arc<AtomicU64>,
    capacity: usize,
}

impl SampleConsumer {
    /// Pop exactly `block.len()` samples
    ///
    /// Returns false and leaves the buffer untouched when fewer samples are
    /// available.
    pub fn read_block(&mut self, block: &mut [f64]) -> bool {
        if self.consumer.len() < block.len() {
            return false;
        }
        self.consumer.pop_slice(block) == block.len()
    }

    /// Get number of available samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples the producer had to drop because the buffer was full
    pub fn dropped_samples(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
