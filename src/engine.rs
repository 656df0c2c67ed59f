//! The audio engine handle - graph, output bus and clock

use std::marker::PhantomData;

use hashbrown::HashMap;

use crate::clock::PlaybackClock;
use crate::error::{CueError, Result};
use crate::graph::AudioGraph;
use crate::host::SynthHost;
use crate::node::{AudioNode, NodeId};
use crate::nodes::{Gain, GainMessage, Mixer, Oscillator, OscillatorMessage, Waveform};
use crate::param::Automation;

#[cfg(feature = "cpal_sink")]
use crate::device::CpalDevice;

/// A handle for sending messages to a node in the engine.
///
/// Messages are buffered in a lock-free ring buffer and processed at the start
/// of each audio block. If the buffer is full, [`Handle::send`] returns
/// `Err(msg)` with the message that couldn't be sent.
pub struct Handle<M: Send + 'static> {
    pub(crate) node_id: NodeId,
    pub(crate) sender: rtrb::Producer<M>,
    pub(crate) _marker: PhantomData<M>,
}

impl<M: Send + 'static> Handle<M> {
    /// Send a message to the node.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the message was queued successfully
    /// - `Err(msg)` if the queue is full (message dropped)
    pub fn send(&mut self, msg: M) -> std::result::Result<(), M> {
        self.sender.push(msg).map_err(|rtrb::PushError::Full(m)| m)
    }

    pub fn id(&self) -> NodeId {
        self.node_id
    }
}

/// A tone's nodes, reclaimed together once its oscillator has stopped
struct Voice {
    nodes: Vec<NodeId>,
    stop_at: Option<f64>,
}

/// The audio engine: one graph, one shared output bus, one clock.
///
/// Every tone is an [`Oscillator`] feeding a [`Gain`] feeding the bus (a
/// [`Mixer`]), which feeds the output sink. The clock is the number of frames
/// rendered so far divided by the sample rate; it only advances when
/// [`process`](Self::process) is called.
///
/// ```
/// use cuetone::{Engine, SynthHost};
/// use cuetone::nodes::Waveform;
///
/// let mut engine = Engine::new(48_000);
/// let mut osc = engine.create_oscillator(Waveform::Sine).unwrap();
/// let gain = engine.create_gain().unwrap();
/// engine.connect(&osc, &gain).unwrap();
/// engine.connect_to_output(&gain).unwrap();
/// engine.start(&mut osc, 0.0).unwrap();
/// engine.stop(&mut osc, 0.01).unwrap();
///
/// while engine.current_time() < 0.02 {
///     engine.process();
/// }
/// assert_eq!(engine.voice_count(), 0);
/// ```
pub struct Engine {
    graph: AudioGraph,
    channels: usize,

    /// Mixer every tone connects into
    bus: NodeId,
    /// The output sink fed by the bus, if any
    sink_node: Option<NodeId>,
    /// What the output device has played, when it reports it
    playback: Option<PlaybackClock>,

    /// Live tones keyed by oscillator
    voices: HashMap<NodeId, Voice>,
}

impl Engine {
    /// Create a stereo engine with no output sink.
    ///
    /// Without a sink the graph still renders (the bus is the terminal), which
    /// keeps the clock and voice bookkeeping running.
    pub fn new(sample_rate: u32) -> Self {
        Self::with_layout(sample_rate, 2)
    }

    /// Create an engine with an explicit channel count.
    pub fn with_layout(sample_rate: u32, channels: usize) -> Self {
        let channels = channels.max(1);
        let mut graph = AudioGraph::new(sample_rate);
        let bus = graph.add(Mixer::new(channels)).id();
        graph.set_terminal(bus);

        Self {
            graph,
            channels,
            bus,
            sink_node: None,
            playback: None,
            voices: HashMap::new(),
        }
    }

    /// Create an engine playing through the system's default output device.
    ///
    /// Fails with [`CueError::UnsupportedHost`] if there is no device or the
    /// stream cannot be opened.
    #[cfg(feature = "cpal_sink")]
    pub fn default_output() -> Result<Self> {
        let device = CpalDevice::default_output()
            .ok_or_else(|| CueError::UnsupportedHost("no default output device".into()))?;
        let sink = device.create_sink()?;
        let played = sink.playback_clock();

        tracing::info!(
            device = device.name(),
            sample_rate = device.sample_rate(),
            channels = device.channels(),
            "audio engine started"
        );

        Ok(Self::with_layout(device.sample_rate(), device.channels() as usize)
            .with_output(sink)
            .with_playback_clock(played))
    }

    #[cfg(not(feature = "cpal_sink"))]
    pub fn default_output() -> Result<Self> {
        Err(CueError::UnsupportedHost("built without the cpal_sink feature".into()))
    }

    /// Add an output sink fed by the bus (builder pattern).
    pub fn with_output<S: AudioNode<Message = ()>>(mut self, sink: S) -> Self {
        if let Some(old) = self.sink_node.take() {
            self.graph.remove(old);
        }
        let sink = self.graph.add(sink).id();
        self.graph.connect(self.bus, sink);
        self.graph.set_terminal(sink);
        self.sink_node = Some(sink);
        self
    }

    /// Pace rendering against what the output has actually played (builder pattern).
    pub fn with_playback_clock(mut self, clock: PlaybackClock) -> Self {
        self.playback = Some(clock);
        self
    }

    /// Seconds of audio the output has played, if it reports playback.
    pub fn playback_time(&self) -> Option<f64> {
        self.playback
            .as_ref()
            .map(|clock| clock.frames() as f64 / self.sample_rate() as f64)
    }

    /// Get the output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.graph.sample_rate()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of tones whose nodes are still in the graph
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Number of nodes in the graph, including the bus and sink
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// Add a node to the graph.
    pub fn add<N: AudioNode>(&mut self, node: N) -> Handle<N::Message> {
        let handle = self.graph.add(node);
        Handle {
            node_id: handle.id(),
            sender: handle.sender,
            _marker: PhantomData,
        }
    }

    /// Process one block of audio (64 samples) and advance the clock.
    ///
    /// Tones whose stop time has been reached are removed afterwards.
    pub fn process(&mut self) {
        self.graph.process();
        self.reclaim();
    }

    fn reclaim(&mut self) {
        let now = self.current_time();
        let graph = &mut self.graph;
        self.voices.retain(|osc, voice| match voice.stop_at {
            Some(stop) if stop <= now => {
                graph.remove(*osc);
                for node in voice.nodes.drain(..) {
                    graph.remove(node);
                }
                false
            }
            _ => true,
        });
    }

    fn connect_ids(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        if self.graph.connect(from, to) {
            Ok(())
        } else {
            Err(CueError::Disconnected)
        }
    }
}

fn deliver<M: Send + 'static>(handle: &mut Handle<M>, msg: M) -> Result<()> {
    handle.send(msg).map_err(|_| CueError::QueueFull)
}

impl SynthHost for Engine {
    type Oscillator = Handle<OscillatorMessage>;
    type Gain = Handle<GainMessage>;

    fn current_time(&self) -> f64 {
        self.graph.frame() as f64 / self.graph.sample_rate() as f64
    }

    fn create_oscillator(&mut self, waveform: Waveform) -> Result<Self::Oscillator> {
        let handle = self.add(Oscillator::new(waveform, 440.0));
        self.voices.insert(
            handle.id(),
            Voice {
                nodes: Vec::new(),
                stop_at: None,
            },
        );
        Ok(handle)
    }

    fn create_gain(&mut self) -> Result<Self::Gain> {
        Ok(self.add(Gain::default()))
    }

    fn automate_frequency(&mut self, osc: &mut Self::Oscillator, event: Automation) -> Result<()> {
        deliver(osc, OscillatorMessage::Frequency(event))
    }

    fn automate_gain(&mut self, gain: &mut Self::Gain, event: Automation) -> Result<()> {
        deliver(gain, GainMessage::Gain(event))
    }

    fn connect(&mut self, osc: &Self::Oscillator, gain: &Self::Gain) -> Result<()> {
        // The gain belongs to the voice even if the edge cannot be made
        if let Some(voice) = self.voices.get_mut(&osc.id()) {
            voice.nodes.push(gain.id());
        }
        self.connect_ids(osc.id(), gain.id())
    }

    fn connect_to_output(&mut self, gain: &Self::Gain) -> Result<()> {
        self.connect_ids(gain.id(), self.bus)
    }

    fn start(&mut self, osc: &mut Self::Oscillator, at: f64) -> Result<()> {
        deliver(osc, OscillatorMessage::Start(at))
    }

    /// The voice is reclaimed at `at` even if the stop message is not delivered.
    fn stop(&mut self, osc: &mut Self::Oscillator, at: f64) -> Result<()> {
        if let Some(voice) = self.voices.get_mut(&osc.id()) {
            voice.stop_at = Some(at);
        }
        deliver(osc, OscillatorMessage::Stop(at))
    }
}
