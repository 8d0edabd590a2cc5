use serde::{Deserialize, Serialize};

use crate::location::{PositionFix, UtcDT};

/// A fix reported more than this many milliseconds before the moment we
/// evaluate it is stale and ignored
const MAX_FIX_AGE_MS: i64 = 3100;
/// Fixes with a horizontal uncertainty at or above this many meters are ignored
const MAX_HORIZONTAL_ACCURACY: f64 = 20.0;
/// Reported speeds at or below this (m/s) are indistinguishable from GPS drift
const MIN_SPEED: f64 = 0.35;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
/// Running motion summary built from a stream of raw fixes.
///
/// Created empty when tracking begins and mutated only through [Self::process].
/// Callers that fan in fixes from multiple sources must serialize their calls,
/// no locking happens here.
pub struct MotionState {
    /// Speed of the last accepted fix in m/s
    pub speed: f64,
    /// Total distance covered in meters, only ever grows
    pub distance: f64,
    /// The last fix that passed the filter, distance is measured from here
    pub previous_fix: Option<PositionFix>,
}

impl MotionState {
    /// Run one raw fix through the acceptance filter, folding it into the
    /// summary if it passes. Returns whether the fix was accepted.
    ///
    /// `now` is the moment of evaluation, kept separate from the fix's own
    /// timestamp so staleness means "old relative to when we saw it".
    /// A rejected fix leaves the state untouched, that's routine noise
    /// rejection and not an error.
    pub fn process(&mut self, fix: PositionFix, now: UtcDT) -> bool {
        if !Self::usable(&fix, now) {
            return false;
        }

        self.speed = fix.speed;

        if let Some(previous) = &self.previous_fix {
            self.distance += fix.location.distance_to(&previous.location);
        }

        self.previous_fix = Some(fix);

        true
    }

    /// Discard everything, used when a tracking session restarts
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn usable(fix: &PositionFix, now: UtcDT) -> bool {
        let age = now - fix.timestamp;
        age.num_milliseconds() < MAX_FIX_AGE_MS
            && fix.horizontal_accuracy < MAX_HORIZONTAL_ACCURACY
            && fix.speed > MIN_SPEED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use chrono::{TimeDelta, Utc};

    fn mk_fix(lat: f64, long: f64, timestamp: UtcDT, accuracy: f64, speed: f64) -> PositionFix {
        PositionFix {
            location: Location { lat, long },
            timestamp,
            horizontal_accuracy: accuracy,
            speed,
            heading: None,
        }
    }

    #[test]
    fn test_stale_fix_rejected() {
        let t = Utc::now();
        let mut state = MotionState::default();
        let fix = mk_fix(0.0, 0.0, t, 10.0, 1.0);

        assert!(!state.process(fix, t + TimeDelta::milliseconds(3100)));
        assert_eq!(state, MotionState::default());

        // Just under the cutoff is fine
        assert!(state.process(fix, t + TimeDelta::milliseconds(3099)));
    }

    #[test]
    fn test_inaccurate_fix_rejected() {
        let t = Utc::now();
        let mut state = MotionState::default();

        assert!(!state.process(mk_fix(0.0, 0.0, t, 20.0, 1.0), t));
        assert!(!state.process(mk_fix(0.0, 0.0, t, 150.0, 1.0), t));
        assert_eq!(state, MotionState::default());

        assert!(state.process(mk_fix(0.0, 0.0, t, 19.9, 1.0), t));
    }

    #[test]
    fn test_slow_fix_rejected() {
        let t = Utc::now();
        let mut state = MotionState::default();

        assert!(!state.process(mk_fix(0.0, 0.0, t, 10.0, 0.35), t));
        assert!(!state.process(mk_fix(0.0, 0.0, t, 10.0, 0.0), t));
        // Negative speed means the service couldn't determine it
        assert!(!state.process(mk_fix(0.0, 0.0, t, 10.0, -1.0), t));
        assert_eq!(state, MotionState::default());
    }

    #[test]
    fn test_future_fix_accepted() {
        // Negative age passes the freshness gate, only stale fixes are dropped
        let t = Utc::now();
        let mut state = MotionState::default();
        let fix = mk_fix(0.0, 0.0, t + TimeDelta::seconds(60), 10.0, 1.0);

        assert!(state.process(fix, t));
    }

    #[test]
    fn test_repeated_rejection_never_mutates() {
        let t = Utc::now();
        let mut state = MotionState::default();
        state.process(mk_fix(0.0, 0.0, t, 10.0, 1.0), t);
        let before = state;

        let bad = mk_fix(1.0, 1.0, t, 50.0, 1.0);
        for _ in 0..10 {
            assert!(!state.process(bad, t));
        }

        assert_eq!(state, before);
    }

    #[test]
    fn test_first_acceptance_does_not_add_distance() {
        let t = Utc::now();
        let mut state = MotionState::default();
        let f1 = mk_fix(40.0, -75.0, t, 10.0, 2.5);

        assert!(state.process(f1, t));
        assert_eq!(state.speed, 2.5);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.previous_fix, Some(f1));
    }

    #[test]
    fn test_second_acceptance_accumulates_distance() {
        let t = Utc::now();
        let mut state = MotionState::default();
        let f1 = mk_fix(0.0, 0.0, t, 10.0, 1.0);
        let f2 = mk_fix(0.0001, 0.0, t + TimeDelta::seconds(5), 10.0, 1.2);

        assert!(state.process(f1, t + TimeDelta::seconds(1)));
        assert!(state.process(f2, t + TimeDelta::milliseconds(5500)));

        let expected = f1.location.distance_to(&f2.location);
        assert!((state.distance - expected).abs() < 1e-9);
        assert!((state.distance - 11.1).abs() < 0.1, "got {}", state.distance);
        assert_eq!(state.speed, 1.2);
        assert_eq!(state.previous_fix, Some(f2));
    }

    #[test]
    fn test_rejection_preserves_previous_fix_for_later_distance() {
        let t = Utc::now();
        let mut state = MotionState::default();
        let f1 = mk_fix(0.0, 0.0, t, 10.0, 1.0);
        let f2 = mk_fix(0.0001, 0.0, t + TimeDelta::seconds(5), 10.0, 1.2);
        // Poor accuracy, should be dropped without disturbing anything
        let f3 = mk_fix(0.0002, 0.0, t + TimeDelta::seconds(6), 25.0, 1.3);

        assert!(state.process(f1, t + TimeDelta::seconds(1)));
        assert!(state.process(f2, t + TimeDelta::milliseconds(5500)));
        let after_f2 = state;

        assert!(!state.process(f3, t + TimeDelta::milliseconds(6200)));
        assert_eq!(state, after_f2);
    }

    #[test]
    fn test_distance_is_monotonic() {
        let t = Utc::now();
        let mut state = MotionState::default();
        let mut last = 0.0;

        for i in 0..20 {
            let fix = mk_fix(0.0001 * i as f64, 0.0, t, 5.0, 1.0);
            assert!(state.process(fix, t));
            assert!(state.distance >= last);
            last = state.distance;
        }
    }

    #[test]
    fn test_reset_clears_summary() {
        let t = Utc::now();
        let mut state = MotionState::default();
        state.process(mk_fix(0.0, 0.0, t, 10.0, 1.0), t);
        state.process(mk_fix(0.001, 0.0, t, 10.0, 1.0), t);
        assert!(state.distance > 0.0);

        state.reset();
        assert_eq!(state, MotionState::default());
    }
}
