//! The process-wide cue facade.
//!
//! The first call to any function here opens the default output device and
//! starts a [`CuePlayer`]. If that fails the failure is logged once and every
//! later call is a silent no-op; the enable flag still toggles.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::warn;

use crate::config::PlayerConfig;
use crate::cue::Cue;
use crate::dispatcher::CueDispatcher;
use crate::engine::Engine;
use crate::error::Result;
use crate::gate::EnableGate;
use crate::player::CuePlayer;

/// A dispatcher over a player that may not exist.
pub type SoundSystem = CueDispatcher<Option<CuePlayer>>;

static SOUND: OnceLock<Mutex<SoundSystem>> = OnceLock::new();

/// Build a sound system on the default output device.
///
/// Never fails: an unsupported host yields a dispatcher with no player.
pub fn open(config: &PlayerConfig) -> SoundSystem {
    let player = Engine::default_output().and_then(|engine| CuePlayer::spawn(engine, config));
    let player = match player {
        Ok(player) => Some(player),
        Err(err) => {
            warn!(%err, "sound cues unavailable, continuing without sound");
            None
        }
    };
    CueDispatcher::with_gate(player, EnableGate::new(config.enabled))
}

fn global() -> MutexGuard<'static, SoundSystem> {
    SOUND
        .get_or_init(|| Mutex::new(open(&PlayerConfig::default())))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Play a cue. Fire-and-forget: errors are logged, never returned.
pub fn play_sound(cue: Cue) {
    if let Err(err) = global().play(cue) {
        warn!(%err, %cue, "cue not played");
    }
}

/// Play a cue by event name; unknown names are reported to the caller.
pub fn play_sound_named(name: &str) -> Result<()> {
    global().play_named(name)
}

/// Flip cues on or off and return the new state.
pub fn toggle_sound() -> bool {
    global().toggle()
}

/// Whether cues are currently on. Re-query rather than caching the answer.
pub fn is_enabled() -> bool {
    global().is_enabled()
}
