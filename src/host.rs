//! The synthesis capability tones are built against.

use crate::error::Result;
use crate::nodes::Waveform;
use crate::param::Automation;

/// A host audio-synthesis context.
///
/// Everything a tone needs: periodic sources with automatable frequency,
/// gain stages with automatable gain, connection into one shared output, and a
/// monotonically increasing clock in seconds that all times refer to.
///
/// [`Engine`](crate::Engine) is the real implementation. Tests substitute a
/// recorder that logs calls against a manually advanced clock.
pub trait SynthHost {
    /// Handle to an oscillator owned by the host
    type Oscillator;
    /// Handle to a gain stage owned by the host
    type Gain;

    /// Current time on the host clock, in seconds.
    fn current_time(&self) -> f64;

    fn create_oscillator(&mut self, waveform: Waveform) -> Result<Self::Oscillator>;

    fn create_gain(&mut self) -> Result<Self::Gain>;

    fn automate_frequency(&mut self, osc: &mut Self::Oscillator, event: Automation) -> Result<()>;

    fn automate_gain(&mut self, gain: &mut Self::Gain, event: Automation) -> Result<()>;

    /// Route an oscillator into a gain stage.
    fn connect(&mut self, osc: &Self::Oscillator, gain: &Self::Gain) -> Result<()>;

    /// Route a gain stage into the shared output.
    fn connect_to_output(&mut self, gain: &Self::Gain) -> Result<()>;

    fn start(&mut self, osc: &mut Self::Oscillator, at: f64) -> Result<()>;

    /// Schedule the oscillator to stop. The host may reclaim the oscillator and
    /// everything routed from it once the clock passes `at`.
    fn stop(&mut self, osc: &mut Self::Oscillator, at: f64) -> Result<()>;
}
