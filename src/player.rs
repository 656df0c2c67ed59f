//! Real-time cue playback on a dedicated audio thread

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, warn};

use crate::config::PlayerConfig;
use crate::cue::CueRecipe;
use crate::engine::Engine;
use crate::error::{CueError, Result};
use crate::host::SynthHost;
use crate::sequencer::{CueSink, Sequencer};

/// Owns an [`Engine`] on its own thread and plays recipes sent to it.
///
/// [`submit`](CueSink::submit) only pushes onto a lock-free queue, so it
/// never blocks the caller. The audio thread drains the queue, fires due
/// tones between 64-sample blocks and keeps rendering `lead_time` ahead of
/// what the output has played. Engines whose output reports no
/// [`PlaybackClock`](crate::PlaybackClock) are paced by the wall clock.
///
/// Wrap it in a [`CueDispatcher`](crate::CueDispatcher) to get the enable gate.
pub struct CuePlayer {
    commands: Producer<&'static CueRecipe>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<Engine>>,
}

impl CuePlayer {
    /// Move `engine` onto a new audio thread and start rendering.
    pub fn spawn(engine: Engine, config: &PlayerConfig) -> Result<Self> {
        let (commands, inbox) = RingBuffer::new(config.command_queue_size.max(1));
        let running = Arc::new(AtomicBool::new(true));

        let thread = {
            let running = running.clone();
            let config = config.clone();
            thread::Builder::new()
                .name("cuetone-audio".into())
                .spawn(move || run(Sequencer::new(engine), inbox, &running, &config))
                .map_err(|e| CueError::UnsupportedHost(format!("failed to spawn audio thread: {}", e)))?
        };

        Ok(Self {
            commands,
            running,
            thread: Some(thread),
        })
    }

    /// Stop the audio thread and take the engine back.
    ///
    /// Tones still sounding are cut off.
    pub fn shutdown(mut self) -> Result<Engine> {
        self.running.store(false, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| CueError::Disconnected),
            None => Err(CueError::Disconnected),
        }
    }
}

impl CueSink for CuePlayer {
    fn submit(&mut self, recipe: &'static CueRecipe) -> Result<()> {
        if self.commands.is_abandoned() {
            return Err(CueError::Disconnected);
        }
        self.commands.push(recipe).map_err(|_| CueError::QueueFull)
    }
}

impl Drop for CuePlayer {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run(
    mut sequencer: Sequencer<Engine>,
    mut inbox: Consumer<&'static CueRecipe>,
    running: &AtomicBool,
    config: &PlayerConfig,
) -> Engine {
    let lead = config.lead_time.as_secs_f64();
    let origin = sequencer.host().current_time();
    let wall_start = Instant::now();

    debug!(sample_rate = sequencer.host().sample_rate(), "audio thread running");

    while running.load(Ordering::Acquire) {
        while let Ok(recipe) = inbox.pop() {
            if let Err(err) = sequencer.play_sequence(recipe) {
                warn!(%err, cue = recipe.name, "cue dropped");
            }
        }
        sequencer.run_due();

        let played = match sequencer.host().playback_time() {
            Some(played) => played,
            None => origin + wall_start.elapsed().as_secs_f64(),
        };
        let target = played + lead;
        if sequencer.host().current_time() < target {
            sequencer.host_mut().process();
        } else {
            thread::sleep(config.idle_sleep);
        }
    }

    debug!(pending = sequencer.pending(), "audio thread stopped");
    sequencer.into_host()
}
