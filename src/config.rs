//! Runtime settings for the real-time player

use std::time::Duration;

/// Settings for [`CuePlayer`](crate::CuePlayer) and the [`sound`](crate::sound) facade.
///
/// ```
/// use std::time::Duration;
/// use cuetone::PlayerConfig;
///
/// let config = PlayerConfig::default()
///     .with_lead_time(Duration::from_millis(30))
///     .with_enabled(false);
/// assert!(!config.enabled);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Capacity of the queue between callers and the audio thread
    pub command_queue_size: usize,
    /// How far ahead of the wall clock the audio thread renders
    pub lead_time: Duration,
    /// How long the audio thread sleeps once it is far enough ahead
    pub idle_sleep: Duration,
    /// Initial state of the enable gate
    pub enabled: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command_queue_size: 64,
            lead_time: Duration::from_millis(20),
            idle_sleep: Duration::from_micros(500),
            enabled: true,
        }
    }
}

impl PlayerConfig {
    pub fn with_command_queue_size(mut self, size: usize) -> Self {
        self.command_queue_size = size.max(1);
        self
    }

    pub fn with_lead_time(mut self, lead_time: Duration) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn with_idle_sleep(mut self, idle_sleep: Duration) -> Self {
        self.idle_sleep = idle_sleep;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
