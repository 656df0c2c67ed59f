//! Sample-accurate parameter automation.
//!
//! An [`AudioParam`] holds a timeline of [`Automation`] events on the engine
//! clock and answers "what is the value at time `t`". Ramps start from the
//! previous event (or the default value at time zero) and end exactly at
//! their own event time.

/// One scheduled change of a parameter value. Times are engine seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Automation {
    /// Jump to `value` at `time`.
    SetValueAtTime { value: f64, time: f64 },
    /// Interpolate linearly from the previous event to `value`, reached at `time`.
    LinearRampToValueAtTime { value: f64, time: f64 },
    /// Interpolate exponentially from the previous event to `value`, reached at `time`.
    ///
    /// Both end points must be strictly positive; otherwise the previous value
    /// is held until `time` and then replaced.
    ExponentialRampToValueAtTime { value: f64, time: f64 },
}

impl Automation {
    #[inline]
    pub fn time(&self) -> f64 {
        match *self {
            Automation::SetValueAtTime { time, .. }
            | Automation::LinearRampToValueAtTime { time, .. }
            | Automation::ExponentialRampToValueAtTime { time, .. } => time,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        match *self {
            Automation::SetValueAtTime { value, .. }
            | Automation::LinearRampToValueAtTime { value, .. }
            | Automation::ExponentialRampToValueAtTime { value, .. } => value,
        }
    }
}

/// An automatable parameter.
#[derive(Clone, Debug)]
pub struct AudioParam {
    default: f64,
    /// Sorted by time; equal times keep insertion order.
    events: Vec<Automation>,
}

impl AudioParam {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            events: Vec::new(),
        }
    }

    /// Insert an event, keeping the timeline ordered.
    pub fn schedule(&mut self, event: Automation) {
        let time = event.time();
        let at = self.events.partition_point(|e| e.time() <= time);
        self.events.insert(at, event);
    }

    pub fn events(&self) -> &[Automation] {
        &self.events
    }

    /// Value of the parameter at engine time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        // First event strictly after `t`
        let next = self.events.partition_point(|e| e.time() <= t);

        let (start_time, start_value) = match next {
            0 => (0.0, self.default),
            n => {
                let prev = &self.events[n - 1];
                (prev.time(), prev.value())
            }
        };

        match self.events.get(next) {
            Some(&Automation::LinearRampToValueAtTime { value, time }) => {
                let span = time - start_time;
                if span <= 0.0 {
                    return value;
                }
                let progress = ((t - start_time) / span).clamp(0.0, 1.0);
                start_value + (value - start_value) * progress
            }
            Some(&Automation::ExponentialRampToValueAtTime { value, time }) => {
                let span = time - start_time;
                if span <= 0.0 || start_value <= 0.0 || value <= 0.0 {
                    return start_value;
                }
                let progress = ((t - start_time) / span).clamp(0.0, 1.0);
                start_value * (value / start_value).powf(progress)
            }
            _ => start_value,
        }
    }

    /// Time of the last scheduled event, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(Automation::time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn default_before_any_event() {
        let mut p = AudioParam::new(1.0);
        p.schedule(Automation::SetValueAtTime { value: 0.5, time: 2.0 });
        assert_eq!(p.value_at(0.0), 1.0);
        assert_eq!(p.value_at(1.999), 1.0);
        assert_eq!(p.value_at(2.0), 0.5);
        assert_eq!(p.value_at(100.0), 0.5);
    }

    #[test]
    fn linear_ramp_interpolates_frequency() {
        let mut p = AudioParam::new(0.0);
        p.schedule(Automation::SetValueAtTime { value: 440.0, time: 1.0 });
        p.schedule(Automation::LinearRampToValueAtTime { value: 110.0, time: 1.5 });

        assert!((p.value_at(1.0) - 440.0).abs() < EPS);
        assert!((p.value_at(1.25) - 275.0).abs() < EPS);
        assert!((p.value_at(1.5) - 110.0).abs() < EPS);
        assert!((p.value_at(3.0) - 110.0).abs() < EPS);
    }

    #[test]
    fn exponential_decay_hits_floor_at_end_time() {
        let mut p = AudioParam::new(1.0);
        p.schedule(Automation::SetValueAtTime { value: 0.2, time: 0.5 });
        p.schedule(Automation::ExponentialRampToValueAtTime { value: 0.01, time: 0.8 });

        assert!((p.value_at(0.5) - 0.2).abs() < EPS);
        assert!((p.value_at(0.8) - 0.01).abs() < EPS);
        // Geometric mean at the midpoint
        assert!((p.value_at(0.65) - (0.2f64 * 0.01).sqrt()).abs() < EPS);

        let mut last = f64::INFINITY;
        for i in 0..=300 {
            let v = p.value_at(0.5 + i as f64 * 0.001);
            assert!(v <= last + EPS, "envelope rose at step {}", i);
            last = v;
        }
    }

    #[test]
    fn exponential_ramp_from_zero_holds_then_jumps() {
        let mut p = AudioParam::new(0.0);
        p.schedule(Automation::ExponentialRampToValueAtTime { value: 1.0, time: 1.0 });
        assert_eq!(p.value_at(0.5), 0.0);
        assert_eq!(p.value_at(1.0), 1.0);
    }

    #[test]
    fn events_stay_sorted() {
        let mut p = AudioParam::new(0.0);
        p.schedule(Automation::SetValueAtTime { value: 2.0, time: 2.0 });
        p.schedule(Automation::SetValueAtTime { value: 1.0, time: 1.0 });
        assert_eq!(p.events()[0].time(), 1.0);
        assert_eq!(p.end_time(), Some(2.0));
        assert_eq!(p.value_at(1.5), 1.0);
    }
}
