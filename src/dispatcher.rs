//! Event → cue dispatch, gated by the enable flag

use tracing::debug;

use crate::cue::Cue;
use crate::error::Result;
use crate::gate::EnableGate;
use crate::sequencer::CueSink;

/// The entry point for producing sound.
///
/// Owns the [`EnableGate`]. While the gate is closed, [`play`](Self::play)
/// does nothing at all; while open, it hands exactly one recipe to the sink.
pub struct CueDispatcher<S: CueSink> {
    gate: EnableGate,
    sink: S,
}

impl<S: CueSink> CueDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self::with_gate(sink, EnableGate::default())
    }

    pub fn with_gate(sink: S, gate: EnableGate) -> Self {
        Self { gate, sink }
    }

    /// Play the cue for `cue`. Returns as soon as the recipe is handed off.
    pub fn play(&mut self, cue: Cue) -> Result<()> {
        if !self.gate.is_enabled() {
            return Ok(());
        }
        debug!(%cue, "playing cue");
        self.sink.submit(cue.recipe())
    }

    /// Play a cue by its event name (`"login"`, `"diskRead"`, ...).
    ///
    /// Unknown names fail with [`CueError::UnrecognizedCue`](crate::CueError::UnrecognizedCue),
    /// even while muted.
    pub fn play_named(&mut self, name: &str) -> Result<()> {
        let cue = name.parse::<Cue>()?;
        self.play(cue)
    }

    /// Flip the enable flag; returns the new state.
    pub fn toggle(&self) -> bool {
        let enabled = self.gate.toggle();
        debug!(enabled, "cues toggled");
        enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
