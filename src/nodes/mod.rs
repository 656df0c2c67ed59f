//! Built-in audio nodes.
//!
//! Nodes are organized into three categories:
//!
//! ## Sources ([`source`])
//!
//! - [`Oscillator`] - Sine, square, sawtooth or triangle wave with automatable frequency
//!
//! ## Effects ([`effect`])
//!
//! - [`Gain`] - Amplitude with sample-accurate automation (tone envelopes)
//! - [`Mixer`] - Sum multiple inputs together (the engine's output bus)
//!
//! ## Sinks ([`sink`])
//!
//! - [`CpalSink`] - Output to system audio device (requires `cpal_sink` feature)
//! - [`RtrbSink`] - Write to ring buffer (offline rendering, tests)
//!
//! # Message Types
//!
//! - [`OscillatorMessage`] - Frequency automation and start/stop times
//! - [`GainMessage`] - Gain automation
//!
//! Nodes without parameters (like [`Mixer`]) use `()` as their message type.

pub mod source;
pub mod effect;
pub mod sink;

// Re-export common types at the top level for convenience
pub use source::{Oscillator, OscillatorMessage, Waveform};
pub use effect::{Gain, GainMessage, Mixer};
pub use sink::RtrbSink;

#[cfg(feature = "cpal_sink")]
pub use sink::CpalSink;
