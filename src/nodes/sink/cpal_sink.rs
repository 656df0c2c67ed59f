//! CPAL audio output sink

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, SupportedStreamConfig};
use dasp_graph::{Buffer, Input};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::clock::PlaybackClock;
use crate::error::{CueError, Result};
use crate::node::{AudioNode, ProcessContext};

/// A sink that outputs audio to a CPAL device
///
/// The CPAL stream runs on its own thread; this node feeds samples
/// into a ring buffer that the stream consumes.
pub struct CpalSink {
    buffer: Producer<f32>,
    channels: usize,
    /// Samples the stream callback has handed to the device
    played: PlaybackClock,
    /// Set by the stream callback when it ran out of samples
    had_underrun: Arc<AtomicBool>,
}

impl CpalSink {
    /// Open a stream on the given device and config.
    ///
    /// Fails with [`CueError::UnsupportedHost`] if the stream cannot be built
    /// or started.
    pub fn new(device: &cpal::Device, config: &SupportedStreamConfig) -> Result<Self> {
        let channels = config.channels() as usize;
        let sample_format = config.sample_format();
        let stream_config = config.config();
        let sample_rate = stream_config.sample_rate.0;

        // Ring buffer sized for ~100ms of audio to handle scheduling jitter
        let buffer_samples = ((sample_rate as f32 * 0.1) as usize) * channels;
        let buffer_size = buffer_samples.next_power_of_two().max(8192);
        let (producer, consumer) = RingBuffer::<f32>::new(buffer_size);

        let played = PlaybackClock::new(channels);
        let played_clone = played.clone();

        let had_underrun = Arc::new(AtomicBool::new(false));
        let had_underrun_clone = had_underrun.clone();

        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        // The stream is not Send on every platform, so it lives on its own thread
        let device = device.clone();
        std::thread::Builder::new()
            .name("cuetone-cpal".into())
            .spawn(move || {
                let stream = build_stream(
                    &device,
                    sample_format,
                    &stream_config,
                    consumer,
                    played_clone,
                    had_underrun_clone,
                )
                .map_err(|e| CueError::UnsupportedHost(format!("failed to build output stream: {}", e)))
                .and_then(|stream| {
                    stream
                        .play()
                        .map(|()| stream)
                        .map_err(|e| CueError::UnsupportedHost(format!("failed to start output stream: {}", e)))
                });

                match stream {
                    Ok(_stream) => {
                        let _ = ready_tx.send(Ok(()));
                        // Keep thread alive - stream lives as long as this thread
                        loop {
                            std::thread::park();
                        }
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                    }
                }
            })
            .map_err(|e| CueError::UnsupportedHost(format!("failed to spawn stream thread: {}", e)))?;

        ready_rx.recv().map_err(|_| CueError::Disconnected)??;

        Ok(Self {
            buffer: producer,
            channels,
            played,
            had_underrun,
        })
    }

    /// A clock that follows what the device has played, for pacing the renderer
    pub fn playback_clock(&self) -> PlaybackClock {
        self.played.clone()
    }

    /// Check and clear the underrun flag
    pub fn check_underrun(&self) -> bool {
        self.had_underrun.swap(false, Ordering::Relaxed)
    }
}

macro_rules! output_callback {
    ($consumer:ident, $played:ident, $underrun:ident, $ty:ty, $convert:expr) => {
        move |data: &mut [$ty], _: &cpal::OutputCallbackInfo| {
            let mut underrun = false;
            for sample in data.iter_mut() {
                let s = $consumer.pop().unwrap_or_else(|_| {
                    underrun = true;
                    0.0
                });
                *sample = $convert(s);
            }
            if underrun {
                $underrun.store(true, Ordering::Relaxed);
            }
            $played.advance(data.len());
        }
    };
}

fn build_stream(
    device: &cpal::Device,
    sample_format: SampleFormat,
    stream_config: &cpal::StreamConfig,
    mut consumer: Consumer<f32>,
    played: PlaybackClock,
    had_underrun: Arc<AtomicBool>,
) -> std::result::Result<cpal::Stream, cpal::BuildStreamError> {
    let on_error = |err: cpal::StreamError| tracing::error!("cpal stream error: {:?}", err);

    match sample_format {
        SampleFormat::F32 => device.build_output_stream(
            stream_config,
            output_callback!(consumer, played, had_underrun, f32, |s: f32| s),
            on_error,
            None,
        ),
        SampleFormat::I16 => device.build_output_stream(
            stream_config,
            output_callback!(consumer, played, had_underrun, i16, |s: f32| {
                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
            }),
            on_error,
            None,
        ),
        SampleFormat::U16 => device.build_output_stream(
            stream_config,
            output_callback!(consumer, played, had_underrun, u16, |s: f32| {
                ((s.clamp(-1.0, 1.0) + 1.0) * 0.5 * u16::MAX as f32) as u16
            }),
            on_error,
            None,
        ),
        _ => Err(cpal::BuildStreamError::StreamConfigNotSupported),
    }
}

impl AudioNode for CpalSink {
    type Message = (); // No control messages

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        _outputs: &mut [Buffer],
    ) {
        if self.check_underrun() {
            tracing::debug!("output stream underrun");
        }

        let buffers = match inputs.first() {
            Some(input) if !input.buffers().is_empty() => input.buffers(),
            _ => return,
        };

        let buffer_len = buffers[0].len();
        let samples_needed = buffer_len * self.channels;

        // Check for overrun (generating faster than consuming)
        if self.buffer.slots() < samples_needed {
            // Skip this block rather than partially write
            tracing::debug!("output buffer full, skipping block");
            return;
        }

        // Interleave channels into ring buffer
        for i in 0..buffer_len {
            for ch in 0..self.channels {
                // Map output channel to source (duplicate mono to stereo if needed)
                let src_ch = ch.min(buffers.len() - 1);
                let _ = self.buffer.push(buffers[src_ch][i]);
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 0 }
}
