#![allow(dead_code)]

use cuetone::nodes::Waveform;
use cuetone::{Automation, CueError, Result, SynthHost};

/// One call made against the host
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    CreateOscillator { id: u32, waveform: Waveform, at: f64 },
    CreateGain { id: u32 },
    Frequency { id: u32, event: Automation },
    Gain { id: u32, event: Automation },
    Connect { osc: u32, gain: u32 },
    ConnectOutput { gain: u32 },
    Start { id: u32, at: f64 },
    Stop { id: u32, at: f64 },
}

/// A tone reconstructed from the call log
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedTone {
    pub created_at: f64,
    pub waveform: Waveform,
    pub frequency: Vec<Automation>,
    pub gain: Vec<Automation>,
    pub start: Option<f64>,
    pub stop: Option<f64>,
}

impl RecordedTone {
    pub fn start_frequency(&self) -> f64 {
        match self.frequency.first() {
            Some(Automation::SetValueAtTime { value, .. }) => *value,
            other => panic!("tone has no initial frequency: {:?}", other),
        }
    }
}

/// Records calls instead of making sound. The clock only moves when told to.
#[derive(Default)]
pub struct RecordingHost {
    pub now: f64,
    pub calls: Vec<HostCall>,
    /// Name of a host method that fails with `QueueFull` instead of recording
    pub reject: Option<&'static str>,
    next_id: u32,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, now: f64) {
        self.now = now;
    }

    fn check(&self, method: &str) -> Result<()> {
        match self.reject {
            Some(rejected) if rejected == method => Err(CueError::QueueFull),
            _ => Ok(()),
        }
    }

    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn oscillator_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::CreateOscillator { .. }))
            .count()
    }

    /// Tones in creation order
    pub fn tones(&self) -> Vec<RecordedTone> {
        let mut tones: Vec<(u32, RecordedTone)> = Vec::new();
        let mut gain_owner: Vec<(u32, usize)> = Vec::new();

        for call in &self.calls {
            match *call {
                HostCall::CreateOscillator { id, waveform, at } => tones.push((
                    id,
                    RecordedTone {
                        created_at: at,
                        waveform,
                        frequency: Vec::new(),
                        gain: Vec::new(),
                        start: None,
                        stop: None,
                    },
                )),
                HostCall::Connect { osc, gain } => {
                    let idx = tones.iter().position(|(id, _)| *id == osc).expect("unknown oscillator");
                    gain_owner.push((gain, idx));
                }
                HostCall::Frequency { id, event } => tone_mut(&mut tones, id).frequency.push(event),
                HostCall::Gain { id, event } => {
                    let idx = gain_owner
                        .iter()
                        .find(|(gain, _)| *gain == id)
                        .map(|(_, idx)| *idx)
                        .expect("gain automated before it was connected");
                    tones[idx].1.gain.push(event);
                }
                HostCall::Start { id, at } => tone_mut(&mut tones, id).start = Some(at),
                HostCall::Stop { id, at } => tone_mut(&mut tones, id).stop = Some(at),
                HostCall::CreateGain { .. } | HostCall::ConnectOutput { .. } => {}
            }
        }

        tones.into_iter().map(|(_, tone)| tone).collect()
    }
}

fn tone_mut(tones: &mut [(u32, RecordedTone)], id: u32) -> &mut RecordedTone {
    &mut tones
        .iter_mut()
        .find(|(osc, _)| *osc == id)
        .expect("unknown oscillator")
        .1
}

impl SynthHost for RecordingHost {
    type Oscillator = u32;
    type Gain = u32;

    fn current_time(&self) -> f64 {
        self.now
    }

    fn create_oscillator(&mut self, waveform: Waveform) -> Result<u32> {
        self.check("create_oscillator")?;
        let id = self.id();
        let at = self.now;
        self.calls.push(HostCall::CreateOscillator { id, waveform, at });
        Ok(id)
    }

    fn create_gain(&mut self) -> Result<u32> {
        self.check("create_gain")?;
        let id = self.id();
        self.calls.push(HostCall::CreateGain { id });
        Ok(id)
    }

    fn automate_frequency(&mut self, osc: &mut u32, event: Automation) -> Result<()> {
        self.check("automate_frequency")?;
        self.calls.push(HostCall::Frequency { id: *osc, event });
        Ok(())
    }

    fn automate_gain(&mut self, gain: &mut u32, event: Automation) -> Result<()> {
        self.check("automate_gain")?;
        self.calls.push(HostCall::Gain { id: *gain, event });
        Ok(())
    }

    fn connect(&mut self, osc: &u32, gain: &u32) -> Result<()> {
        self.check("connect")?;
        self.calls.push(HostCall::Connect { osc: *osc, gain: *gain });
        Ok(())
    }

    fn connect_to_output(&mut self, gain: &u32) -> Result<()> {
        self.check("connect_to_output")?;
        self.calls.push(HostCall::ConnectOutput { gain: *gain });
        Ok(())
    }

    fn start(&mut self, osc: &mut u32, at: f64) -> Result<()> {
        self.check("start")?;
        self.calls.push(HostCall::Start { id: *osc, at });
        Ok(())
    }

    fn stop(&mut self, osc: &mut u32, at: f64) -> Result<()> {
        self.check("stop")?;
        self.calls.push(HostCall::Stop { id: *osc, at });
        Ok(())
    }
}

/// Step the clock through `0..=until_ms` one millisecond at a time, firing due steps.
pub fn run_for_ms(sequencer: &mut cuetone::Sequencer<RecordingHost>, until_ms: u64) {
    for ms in 0..=until_ms {
        sequencer.host_mut().set_time(ms as f64 / 1000.0);
        sequencer.run_due();
    }
}
