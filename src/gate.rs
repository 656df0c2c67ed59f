//! On/off switch for cue playback

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether cues are played at all. On by default.
///
/// Only [`toggle`](Self::toggle) writes the flag. Tones already scheduled are
/// not affected by a toggle.
#[derive(Debug)]
pub struct EnableGate {
    enabled: AtomicBool,
}

impl EnableGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

impl Default for EnableGate {
    fn default() -> Self {
        Self::new(true)
    }
}
