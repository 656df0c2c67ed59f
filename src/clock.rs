//! How far an output device has actually played

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A count of interleaved samples consumed by an output, shared between the
/// device callback and the render thread.
///
/// The device side calls [`advance`](Self::advance) with every buffer it
/// fills, silence from underruns included, so the count follows the
/// device's own clock rather than the wall clock.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    samples_consumed: Arc<AtomicUsize>,
    channels: usize,
}

impl PlaybackClock {
    pub fn new(channels: usize) -> Self {
        Self {
            samples_consumed: Arc::new(AtomicUsize::new(0)),
            channels: channels.max(1),
        }
    }

    /// Record `samples` more interleaved samples as played.
    #[inline]
    pub fn advance(&self, samples: usize) {
        self.samples_consumed.fetch_add(samples, Ordering::Relaxed);
    }

    #[inline]
    pub fn samples_consumed(&self) -> usize {
        self.samples_consumed.load(Ordering::Relaxed)
    }

    /// Whole frames played so far
    #[inline]
    pub fn frames(&self) -> u64 {
        (self.samples_consumed() / self.channels) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_count() {
        let device_side = PlaybackClock::new(2);
        let render_side = device_side.clone();

        device_side.advance(128);
        device_side.advance(3);
        assert_eq!(render_side.samples_consumed(), 131);
        // A half-played frame does not count
        assert_eq!(render_side.frames(), 65);
    }
}
