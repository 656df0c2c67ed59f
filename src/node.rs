//! Core node trait and context types.

use dasp_graph::{Buffer, Input};

/// Information available during audio processing.
///
/// Passed to every [`AudioNode::process`] call. Contains the graph's sample rate,
/// the buffer size (always 64 samples) and the absolute position of the block
/// on the engine clock.
#[derive(Clone, Copy, Debug)]
pub struct ProcessContext {
    /// Sample rate of the graph in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of samples per buffer (currently always 64)
    pub buffer_size: usize,
    /// Index of the first frame of this block since the engine started
    pub frame: u64,
}

impl ProcessContext {
    /// Engine time in seconds of sample `offset` within this block.
    #[inline]
    pub fn time_at(&self, offset: usize) -> f64 {
        (self.frame + offset as u64) as f64 / self.sample_rate as f64
    }
}

/// Unique identifier for a node within a graph.
///
/// Ids are never reused, even after the node is removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

/// The core trait for audio processing nodes.
///
/// Nodes can be:
/// - **Sources**: Generate audio (0 inputs, 1+ outputs) - oscillators
/// - **Effects**: Process audio (1+ inputs, 1+ outputs) - gain, mixing
/// - **Sinks**: Consume audio (1+ inputs, 0 outputs) - device outputs, recorders
///
/// # Message-Based Parameters
///
/// Instead of shared mutable state, nodes receive parameter updates via messages.
/// Messages carry their own timestamps where timing matters, so a message that
/// arrives a block late still lands on the right sample.
///
/// ```
/// use cuetone::{AudioNode, ProcessContext};
/// use dasp_graph::{Buffer, Input};
///
/// struct Dc {
///     level: f32,
/// }
///
/// impl AudioNode for Dc {
///     type Message = f32;
///
///     fn process(
///         &mut self,
///         _ctx: &ProcessContext,
///         messages: impl Iterator<Item = f32>,
///         _inputs: &[Input],
///         outputs: &mut [Buffer],
///     ) {
///         for level in messages {
///             self.level = level;
///         }
///         for sample in outputs[0].iter_mut() {
///             *sample = self.level;
///         }
///     }
/// }
/// ```
pub trait AudioNode: Send + 'static {
    /// Message type for parameter updates.
    ///
    /// Use a custom enum for nodes with parameters, or `()` for nodes without.
    type Message: Send + 'static;

    /// Process one block of audio.
    ///
    /// Called once per audio block (64 samples). Your implementation should:
    /// 1. Drain and handle all pending messages
    /// 2. Read from `inputs` (if any)
    /// 3. Write to `outputs`
    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = Self::Message>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    );

    /// Number of audio input channels (0 for sources).
    fn num_inputs(&self) -> usize { 0 }

    /// Number of audio output channels.
    fn num_outputs(&self) -> usize { 1 }
}
