//! Realizing recipes as timed tones

use tracing::{trace, warn};

use crate::cue::{CueRecipe, CueStep};
use crate::error::Result;
use crate::host::SynthHost;
use crate::schedule::TaskQueue;
use crate::tone::ToneSource;

/// Something that accepts recipes to play.
///
/// [`Sequencer`] plays them directly on a host; [`CuePlayer`](crate::CuePlayer)
/// forwards them to a sequencer on the audio thread.
pub trait CueSink {
    fn submit(&mut self, recipe: &'static CueRecipe) -> Result<()>;
}

/// No sink: recipes are accepted and dropped.
impl<S: CueSink> CueSink for Option<S> {
    fn submit(&mut self, recipe: &'static CueRecipe) -> Result<()> {
        match self {
            Some(sink) => sink.submit(recipe),
            None => Ok(()),
        }
    }
}

/// Schedules recipe steps against a host clock and builds the tones when due.
///
/// Single-threaded and non-blocking: [`play_sequence`](Self::play_sequence)
/// only enqueues, and [`run_due`](Self::run_due) must be called as the host
/// clock advances to fire whatever has come due.
pub struct Sequencer<H: SynthHost> {
    host: H,
    pending: TaskQueue<CueStep>,
}

impl<H: SynthHost> Sequencer<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            pending: TaskQueue::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back, dropping any steps that have not fired.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Steps scheduled but not yet fired
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Host time of the next step to fire
    pub fn next_due(&self) -> Option<f64> {
        self.pending.next_due()
    }

    /// Schedule every step of `recipe` relative to the current host time.
    ///
    /// All steps are validated first; an invalid step rejects the whole recipe
    /// and nothing is scheduled. Steps with no delay fire before this returns.
    pub fn play_sequence(&mut self, recipe: &CueRecipe) -> Result<()> {
        for step in recipe.steps {
            step.tone.validate()?;
        }

        let start = self.host.current_time();
        for step in recipe.steps {
            self.pending.schedule(start + step.delay.as_secs_f64(), *step);
        }
        trace!(cue = recipe.name, steps = recipe.steps.len(), start, "sequence scheduled");

        self.run_due();
        Ok(())
    }

    /// Fire every step whose due time has been reached. Returns how many fired.
    ///
    /// A step that fails on the host is logged and skipped; the rest still fire.
    pub fn run_due(&mut self) -> usize {
        let now = self.host.current_time();
        let mut fired = 0;

        while let Some(step) = self.pending.pop_due(now) {
            if let Err(err) = self.fire(&step) {
                warn!(%err, frequency = step.tone.frequency(), "tone dropped");
                continue;
            }
            fired += 1;
        }

        fired
    }

    fn fire(&mut self, step: &CueStep) -> Result<()> {
        let mut tone = ToneSource::create(&mut self.host, &step.tone)?;
        if let Err(err) = tone.start(&mut self.host) {
            let _ = tone.cancel(&mut self.host);
            return Err(err);
        }
        trace!(
            frequency = step.tone.frequency(),
            duration = step.tone.duration(),
            waveform = %step.tone.waveform(),
            at = tone.created_at(),
            "tone started"
        );
        tone.stop_at_end(&mut self.host)
    }
}

impl<H: SynthHost> CueSink for Sequencer<H> {
    fn submit(&mut self, recipe: &'static CueRecipe) -> Result<()> {
        self.play_sequence(recipe)
    }
}
