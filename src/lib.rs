//! cuetone - audio cues for application events
//!
//! Short tones and tone sequences played in response to discrete events
//! (login, logout, error, keypress, search, disk activity), synthesized on a
//! lock-free audio graph.
//!
//! Design principles:
//! - Tones are built against an injectable [`SynthHost`]; [`Engine`] is the
//!   real one, tests use a recorder with a hand-set clock
//! - Nodes receive parameters via message ring buffers, not shared state
//! - Timing is sample accurate: automation and start/stop carry engine times
//! - Playing a cue never blocks; the audio thread does the work
//!
//! # Quick start
//!
//! ```no_run
//! use cuetone::Cue;
//!
//! cuetone::play_sound(Cue::Login);
//! let enabled = cuetone::toggle_sound();
//! assert_eq!(enabled, cuetone::is_enabled());
//! ```
//!
//! # Without an audio device
//!
//! ```
//! use cuetone::{Cue, CueDispatcher, Engine, Sequencer, SynthHost};
//!
//! let mut cues = CueDispatcher::new(Sequencer::new(Engine::new(48_000)));
//! cues.play(Cue::Search).unwrap();
//!
//! let sequencer = cues.sink_mut();
//! while sequencer.host().current_time() < 0.5 {
//!     sequencer.run_due();
//!     sequencer.host_mut().process();
//! }
//! assert_eq!(sequencer.pending(), 0);
//! ```

mod clock;
mod config;
mod cue;
#[cfg(feature = "cpal_sink")]
mod device;
mod dispatcher;
mod engine;
mod error;
mod gate;
mod graph;
mod host;
mod node;
mod param;
mod player;
mod schedule;
mod sequencer;
pub mod nodes;
pub mod sound;
mod tone;

pub use clock::PlaybackClock;
pub use config::PlayerConfig;
pub use cue::{Cue, CueRecipe, CueStep};
#[cfg(feature = "cpal_sink")]
pub use device::CpalDevice;
pub use dispatcher::CueDispatcher;
pub use engine::{Engine, Handle};
pub use error::{CueError, Result};
pub use gate::EnableGate;
pub use host::SynthHost;
pub use node::{AudioNode, NodeId, ProcessContext};
pub use param::{AudioParam, Automation};
pub use player::CuePlayer;
pub use schedule::TaskQueue;
pub use sequencer::{CueSink, Sequencer};
pub use sound::{is_enabled, play_sound, play_sound_named, toggle_sound};
pub use tone::{ToneHandle, ToneSource, ToneSpec, GAIN_FLOOR, PEAK_GAIN};
