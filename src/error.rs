//! Error types for the cue engine

use thiserror::Error;

/// Errors raised while building tones or dispatching cues
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CueError {
    /// No usable audio output on this platform. Raised once, when the engine
    /// is constructed.
    #[error("audio output unsupported on this host: {0}")]
    UnsupportedHost(String),

    #[error(
        "invalid tone parameters: frequency {frequency} Hz, duration {duration} s{}",
        .glide_to.iter().map(|to| format!(", glide to {} Hz", to)).collect::<String>()
    )]
    InvalidToneParameters {
        frequency: f64,
        duration: f64,
        glide_to: Option<f64>,
    },

    #[error("unrecognized cue {0:?}")]
    UnrecognizedCue(String),

    /// A node message queue or the player's command queue is full
    #[error("queue full, message dropped")]
    QueueFull,

    #[error("audio thread is no longer running")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, CueError>;
