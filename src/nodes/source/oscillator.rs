//! Periodic waveform oscillator with automatable frequency

use std::fmt;

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};
use crate::param::{AudioParam, Automation};

/// The fixed set of oscillator shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample of one cycle at `phase` in `[0, 1)`, peak amplitude 1.0.
    #[inline]
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (phase * std::f64::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        };
        f.write_str(name)
    }
}

/// Messages to control an Oscillator
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OscillatorMessage {
    /// Schedule a frequency change (Hz) on the engine clock
    Frequency(Automation),
    /// Begin producing sound at this engine time
    Start(f64),
    /// Fall silent at this engine time
    Stop(f64),
}

/// A mono oscillator that is silent outside its `[start, stop)` window.
pub struct Oscillator {
    waveform: Waveform,
    frequency: AudioParam,
    phase: f64,
    start: Option<f64>,
    stop: Option<f64>,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            waveform,
            frequency: AudioParam::new(frequency),
            phase: 0.0,
            start: None,
            stop: None,
        }
    }

    #[inline]
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Whether the oscillator has finished for good at engine time `t`.
    #[inline]
    pub fn is_finished(&self, t: f64) -> bool {
        self.stop.map_or(false, |stop| t >= stop)
    }

    #[inline]
    fn is_sounding(&self, t: f64) -> bool {
        match self.start {
            Some(start) => t >= start && !self.is_finished(t),
            None => false,
        }
    }
}

impl AudioNode for Oscillator {
    type Message = OscillatorMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = OscillatorMessage>,
        _inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                OscillatorMessage::Frequency(event) => self.frequency.schedule(event),
                OscillatorMessage::Start(t) => self.start = Some(t),
                OscillatorMessage::Stop(t) => self.stop = Some(t),
            }
        }

        if outputs.is_empty() {
            return;
        }

        let inv_rate = 1.0 / ctx.sample_rate as f64;
        let (first, rest) = outputs.split_at_mut(1);
        let first = &mut first[0];

        for (i, out) in first.iter_mut().enumerate() {
            let t = ctx.time_at(i);
            if !self.is_sounding(t) {
                *out = 0.0;
                continue;
            }

            *out = self.waveform.sample(self.phase) as f32;

            let freq = self.frequency.value_at(t).max(0.0);
            self.phase += freq * inv_rate;
            self.phase -= self.phase.floor();
        }

        for buffer in rest.iter_mut() {
            buffer.copy_from_slice(first);
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 0 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(frame: u64) -> ProcessContext {
        ProcessContext {
            sample_rate: 48_000,
            buffer_size: Buffer::LEN,
            frame,
        }
    }

    fn render(osc: &mut Oscillator, frame: u64, msgs: Vec<OscillatorMessage>) -> Buffer {
        let mut out = [Buffer::SILENT];
        osc.process(&ctx(frame), msgs.into_iter(), &[], &mut out);
        out[0].clone()
    }

    #[test]
    fn silent_until_started() {
        let mut osc = Oscillator::new(Waveform::Square, 1_000.0);
        let block = render(&mut osc, 0, vec![]);
        assert!(block.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn square_is_full_scale_while_sounding() {
        let mut osc = Oscillator::new(Waveform::Square, 1_000.0);
        let block = render(&mut osc, 0, vec![OscillatorMessage::Start(0.0)]);
        assert!(block.iter().all(|&s| s == 1.0 || s == -1.0));
        assert_eq!(block[0], 1.0);
    }

    #[test]
    fn stop_time_is_sample_accurate() {
        let mut osc = Oscillator::new(Waveform::Square, 100.0);
        // Stop 10 samples into the block
        let stop = 10.0 / 48_000.0;
        let block = render(
            &mut osc,
            0,
            vec![OscillatorMessage::Start(0.0), OscillatorMessage::Stop(stop)],
        );
        assert!(block[..10].iter().all(|&s| s != 0.0));
        assert!(block[10..].iter().all(|&s| s == 0.0));
        assert!(osc.is_finished(stop));
    }

    #[test]
    fn waveform_shapes() {
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.5), 0.0);
        assert_eq!(Waveform::Triangle.sample(0.5), 1.0);
        assert_eq!(Waveform::Triangle.sample(0.0), -1.0);
        assert!(Waveform::Sine.sample(0.25) > 0.999);
        assert_eq!(Waveform::Sine.to_string(), "sine");
    }
}
