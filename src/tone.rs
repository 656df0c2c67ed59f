//! Single enveloped tones.
//!
//! A tone is one oscillator feeding one gain stage. The gain starts at
//! [`PEAK_GAIN`] when the tone is created and decays exponentially to
//! [`GAIN_FLOOR`], reached exactly when the tone stops.

use crate::error::{CueError, Result};
use crate::host::SynthHost;
use crate::nodes::Waveform;
use crate::param::Automation;

/// Gain at the start of every tone
pub const PEAK_GAIN: f64 = 0.2;
/// Gain the envelope decays to by the end of the tone
pub const GAIN_FLOOR: f64 = 0.01;

/// Description of one tone. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSpec {
    frequency: f64,
    duration: f64,
    waveform: Waveform,
    glide_to: Option<f64>,
}

impl ToneSpec {
    /// A fixed-frequency tone. Not validated; see [`ToneSpec::new`].
    pub const fn fixed(frequency: f64, duration: f64, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
            glide_to: None,
        }
    }

    /// A fixed-frequency sine tone, the default shape.
    pub const fn sine(frequency: f64, duration: f64) -> Self {
        Self::fixed(frequency, duration, Waveform::Sine)
    }

    /// A sine tone whose frequency moves linearly from `from` to `to` over its
    /// whole duration.
    pub const fn glide(from: f64, to: f64, duration: f64) -> Self {
        Self {
            frequency: from,
            duration,
            waveform: Waveform::Sine,
            glide_to: Some(to),
        }
    }

    /// A validated fixed-frequency tone.
    pub fn new(frequency: f64, duration: f64, waveform: Waveform) -> Result<Self> {
        let spec = Self::fixed(frequency, duration, waveform);
        spec.validate()?;
        Ok(spec)
    }

    /// Frequencies and duration must be finite and positive.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if positive(self.frequency) && positive(self.duration) && self.glide_to.map_or(true, positive) {
            Ok(())
        } else {
            Err(CueError::InvalidToneParameters {
                frequency: self.frequency,
                duration: self.duration,
                glide_to: self.glide_to,
            })
        }
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Target frequency of a glide, if this tone glides
    #[inline]
    pub fn glide_to(&self) -> Option<f64> {
        self.glide_to
    }
}

/// A live tone built on a host. Started once, stopped once, then dropped.
pub struct ToneHandle<H: SynthHost> {
    osc: H::Oscillator,
    // Held so the gain stage lives as long as the tone
    _gain: H::Gain,
    spec: ToneSpec,
    created_at: f64,
}

impl<H: SynthHost> ToneHandle<H> {
    pub fn spec(&self) -> &ToneSpec {
        &self.spec
    }

    /// Host time the tone was built at; its envelope is anchored here.
    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    /// Host time at which the envelope reaches the floor.
    pub fn end_time(&self) -> f64 {
        self.created_at + self.spec.duration
    }

    /// Start sounding now.
    pub fn start(&mut self, host: &mut H) -> Result<()> {
        let now = host.current_time();
        host.start(&mut self.osc, now)
    }

    /// Stop right away, releasing the tone's nodes.
    pub fn cancel(mut self, host: &mut H) -> Result<()> {
        let now = host.current_time();
        host.stop(&mut self.osc, now)
    }

    /// Schedule the stop at the end of the envelope.
    pub fn stop_at_end(mut self, host: &mut H) -> Result<()> {
        let end = self.end_time();
        host.stop(&mut self.osc, end)
    }
}

/// Builds enveloped tones on a host.
pub struct ToneSource;

impl ToneSource {
    /// Build one tone anchored at the host's current time.
    ///
    /// The spec is validated before anything is allocated on the host, so an
    /// invalid spec leaves the host untouched. The returned tone is not yet
    /// started.
    pub fn create<H: SynthHost>(host: &mut H, spec: &ToneSpec) -> Result<ToneHandle<H>> {
        spec.validate()?;

        let now = host.current_time();

        let mut osc = host.create_oscillator(spec.waveform)?;
        let gain = match Self::wire(host, &mut osc, spec, now) {
            Ok(gain) => gain,
            Err(err) => {
                // Release the half-built voice
                let _ = host.stop(&mut osc, now);
                return Err(err);
            }
        };

        Ok(ToneHandle {
            osc,
            _gain: gain,
            spec: *spec,
            created_at: now,
        })
    }

    /// Gain stage, routing and automation for a freshly created oscillator.
    fn wire<H: SynthHost>(host: &mut H, osc: &mut H::Oscillator, spec: &ToneSpec, now: f64) -> Result<H::Gain> {
        let end = now + spec.duration;

        let mut gain = host.create_gain()?;
        host.connect(osc, &gain)?;
        host.connect_to_output(&gain)?;

        host.automate_frequency(
            osc,
            Automation::SetValueAtTime {
                value: spec.frequency,
                time: now,
            },
        )?;
        if let Some(target) = spec.glide_to {
            host.automate_frequency(
                osc,
                Automation::LinearRampToValueAtTime {
                    value: target,
                    time: end,
                },
            )?;
        }

        host.automate_gain(
            &mut gain,
            Automation::SetValueAtTime {
                value: PEAK_GAIN,
                time: now,
            },
        )?;
        host.automate_gain(
            &mut gain,
            Automation::ExponentialRampToValueAtTime {
                value: GAIN_FLOOR,
                time: end,
            },
        )?;

        Ok(gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite() {
        assert!(ToneSpec::new(440.0, 0.3, Waveform::Sine).is_ok());

        for (f, d) in [(0.0, 0.3), (-1.0, 0.3), (f64::NAN, 0.3), (440.0, 0.0), (440.0, f64::INFINITY)] {
            assert_eq!(
                ToneSpec::new(f, d, Waveform::Sine).unwrap_err().to_string(),
                CueError::InvalidToneParameters { frequency: f, duration: d, glide_to: None }.to_string()
            );
        }
    }

    #[test]
    fn glide_target_is_validated() {
        assert!(ToneSpec::glide(440.0, 110.0, 0.5).validate().is_ok());
        assert!(ToneSpec::glide(440.0, 0.0, 0.5).validate().is_err());
        assert!(ToneSpec::glide(440.0, f64::NAN, 0.5).validate().is_err());
    }

    #[test]
    fn bad_glide_target_is_named_in_the_error() {
        let err = ToneSpec::glide(440.0, 0.0, 0.5).validate().unwrap_err();
        assert_eq!(
            err,
            CueError::InvalidToneParameters { frequency: 440.0, duration: 0.5, glide_to: Some(0.0) }
        );
        assert_eq!(
            err.to_string(),
            "invalid tone parameters: frequency 440 Hz, duration 0.5 s, glide to 0 Hz"
        );
    }

    #[test]
    fn sine_is_the_default_shape() {
        let tone = ToneSpec::sine(800.0, 0.05);
        assert_eq!(tone, ToneSpec::fixed(800.0, 0.05, Waveform::Sine));
        assert_eq!(tone.glide_to(), None);
    }
}
