//! Automatable gain (amplitude envelope)

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};
use crate::param::{AudioParam, Automation};

/// Messages to control gain
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GainMessage {
    /// Schedule a gain change on the engine clock (1.0 = unity, 0.0 = silence)
    Gain(Automation),
}

/// A mono gain stage whose multiplier follows an [`AudioParam`] timeline.
///
/// Unlike a smoothed volume control, the gain is evaluated per sample from
/// its automation, so envelopes land exactly on their scheduled times.
pub struct Gain {
    gain: AudioParam,
}

impl Gain {
    /// Create a gain node with the given resting value
    pub fn new(gain: f64) -> Self {
        Self {
            gain: AudioParam::new(gain),
        }
    }

    #[inline]
    pub fn gain_at(&self, t: f64) -> f64 {
        self.gain.value_at(t)
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AudioNode for Gain {
    type Message = GainMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = GainMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                GainMessage::Gain(event) => self.gain.schedule(event),
            }
        }

        if outputs.is_empty() {
            return;
        }

        let in_buffers = inputs.first().map(|input| input.buffers()).unwrap_or(&[]);

        if in_buffers.is_empty() {
            // No input buffers - output silence
            for buffer in outputs.iter_mut() {
                buffer.iter_mut().for_each(|s| *s = 0.0);
            }
            return;
        }

        for (ch, out_buffer) in outputs.iter_mut().enumerate() {
            let in_buffer = &in_buffers[ch.min(in_buffers.len() - 1)];

            for (i, (out_sample, &in_sample)) in out_buffer.iter_mut().zip(in_buffer.iter()).enumerate() {
                *out_sample = in_sample * self.gain.value_at(ctx.time_at(i)) as f32;
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_is_silence() {
        let mut gain = Gain::new(1.0);
        let ctx = ProcessContext {
            sample_rate: 48_000,
            buffer_size: Buffer::LEN,
            frame: 0,
        };
        let mut out = [Buffer::SILENT];
        out[0].iter_mut().for_each(|s| *s = 1.0);

        gain.process(&ctx, std::iter::empty(), &[], &mut out);
        assert!(out[0].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn scheduled_gain_applies_from_its_time() {
        let mut gain = Gain::new(1.0);
        let msgs = vec![GainMessage::Gain(Automation::SetValueAtTime { value: 0.2, time: 1.0 })];
        // No input connected: we only check the automation is recorded
        let ctx = ProcessContext {
            sample_rate: 48_000,
            buffer_size: Buffer::LEN,
            frame: 0,
        };
        gain.process(&ctx, msgs.into_iter(), &[], &mut [Buffer::SILENT]);
        assert_eq!(gain.gain_at(0.5), 1.0);
        assert_eq!(gain.gain_at(1.0), 0.2);
    }
}
