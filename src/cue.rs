//! Named cues and their built-in recipes

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CueError;
use crate::nodes::Waveform::{Sawtooth, Square};
use crate::tone::ToneSpec;

/// One tone of a recipe and its delay from the start of the sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CueStep {
    pub tone: ToneSpec,
    pub delay: Duration,
}

impl CueStep {
    const fn at(delay_ms: u64, tone: ToneSpec) -> Self {
        Self {
            tone,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// The fixed tone sequence behind one cue.
#[derive(Debug, PartialEq)]
pub struct CueRecipe {
    pub name: &'static str,
    pub steps: &'static [CueStep],
}

impl CueRecipe {
    /// Time from the start of the sequence until its last tone ends
    pub fn span(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| s.delay + Duration::from_secs_f64(s.tone.duration()))
            .max()
            .unwrap_or_default()
    }
}

const fn disk_tick(delay_ms: u64, frequency: f64) -> CueStep {
    CueStep::at(delay_ms, ToneSpec::fixed(frequency, 0.1, Square))
}

static LOGIN: CueRecipe = CueRecipe {
    name: "login",
    steps: &[
        CueStep::at(0, ToneSpec::sine(440.0, 0.3)),
        CueStep::at(100, ToneSpec::sine(550.0, 0.3)),
        CueStep::at(200, ToneSpec::sine(660.0, 0.3)),
    ],
};

static ERROR: CueRecipe = CueRecipe {
    name: "error",
    steps: &[CueStep::at(0, ToneSpec::fixed(150.0, 0.3, Sawtooth))],
};

static KEYPRESS: CueRecipe = CueRecipe {
    name: "keypress",
    steps: &[CueStep::at(0, ToneSpec::sine(800.0, 0.05))],
};

static SEARCH: CueRecipe = CueRecipe {
    name: "search",
    steps: &[
        CueStep::at(0, ToneSpec::sine(400.0, 0.1)),
        CueStep::at(150, ToneSpec::sine(600.0, 0.1)),
    ],
};

static LOGOUT: CueRecipe = CueRecipe {
    name: "logout",
    steps: &[CueStep::at(0, ToneSpec::glide(440.0, 110.0, 0.5))],
};

static DISK_READ: CueRecipe = CueRecipe {
    name: "diskRead",
    steps: &[
        disk_tick(0, 800.0),
        disk_tick(180, 1000.0),
        disk_tick(360, 600.0),
        disk_tick(540, 900.0),
        disk_tick(720, 700.0),
        disk_tick(900, 850.0),
        disk_tick(1080, 750.0),
        disk_tick(1260, 950.0),
    ],
};

/// Application events that have a cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Login,
    Error,
    Keypress,
    Search,
    Logout,
    DiskRead,
}

impl Cue {
    pub const ALL: [Cue; 6] = [
        Cue::Login,
        Cue::Error,
        Cue::Keypress,
        Cue::Search,
        Cue::Logout,
        Cue::DiskRead,
    ];

    pub fn recipe(self) -> &'static CueRecipe {
        match self {
            Cue::Login => &LOGIN,
            Cue::Error => &ERROR,
            Cue::Keypress => &KEYPRESS,
            Cue::Search => &SEARCH,
            Cue::Logout => &LOGOUT,
            Cue::DiskRead => &DISK_READ,
        }
    }

    pub fn name(self) -> &'static str {
        self.recipe().name
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cue {
    type Err = CueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Cue::Login),
            "error" => Ok(Cue::Error),
            "keypress" => Ok(Cue::Keypress),
            "search" => Ok(Cue::Search),
            "logout" => Ok(Cue::Logout),
            "diskRead" | "disk_read" => Ok(Cue::DiskRead),
            other => Err(CueError::UnrecognizedCue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for cue in Cue::ALL {
            assert_eq!(cue.to_string().parse::<Cue>(), Ok(cue));
        }
        assert_eq!("disk_read".parse::<Cue>(), Ok(Cue::DiskRead));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            "beep".parse::<Cue>(),
            Err(CueError::UnrecognizedCue("beep".into()))
        );
    }

    #[test]
    fn every_builtin_step_is_valid() {
        for cue in Cue::ALL {
            for step in cue.recipe().steps {
                assert!(step.tone.validate().is_ok(), "{} has an invalid step", cue);
            }
        }
    }

    #[test]
    fn disk_read_spans_its_last_tick() {
        assert_eq!(Cue::DiskRead.recipe().span(), Duration::from_millis(1360));
        assert_eq!(Cue::Keypress.recipe().span(), Duration::from_millis(50));
    }
}
