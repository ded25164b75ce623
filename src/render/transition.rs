//! Route transition phases.
//!
//! Each route visual is in exactly one phase. Opacity is a pure function of
//! the phase and the current time, so phases can be advanced lazily from the
//! frame loop.

use std::time::Duration;
use web_time::Instant;

/// Symmetric quadratic easing over `t` in [0, 1].
pub fn ease_quad_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t / 2.0
    } else {
        let t = t - 1.0;
        (t * (2.0 - t) + 1.0) / 2.0
    }
}

/// Durations of the route transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    /// Fade-in of a route appearing with a new selection
    pub enter: Duration,
    /// Each half of the fade-out / fade-in around an update
    pub fade: Duration,
}

/// Animation phase of a route visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoutePhase {
    /// Fading in after being added by a selection change.
    Entering { start: Instant, duration: Duration },
    /// Fully shown, not animating.
    Visible,
    /// Fading out before its geometry is swapped.
    FadingOut {
        start: Instant,
        duration: Duration,
        /// Opacity when the fade began
        from: f32,
    },
    /// Fading back in after the swap.
    FadingIn { start: Instant, duration: Duration },
}

impl RoutePhase {
    /// Opacity at `now`, in [0, 1].
    pub fn opacity(&self, now: Instant) -> f32 {
        match *self {
            RoutePhase::Visible => 1.0,
            RoutePhase::Entering { start, duration } | RoutePhase::FadingIn { start, duration } => {
                ease_quad_in_out(progress(start, duration, now))
            }
            RoutePhase::FadingOut {
                start,
                duration,
                from,
            } => from * (1.0 - ease_quad_in_out(progress(start, duration, now))),
        }
    }

    /// When the current phase ends, if it is animating.
    pub fn deadline(&self) -> Option<Instant> {
        match *self {
            RoutePhase::Visible => None,
            RoutePhase::Entering { start, duration }
            | RoutePhase::FadingIn { start, duration }
            | RoutePhase::FadingOut {
                start, duration, ..
            } => Some(start + duration),
        }
    }

    pub fn is_animating(&self) -> bool {
        !matches!(self, RoutePhase::Visible)
    }
}

/// Fraction of `duration` elapsed at `now`.
fn progress(start: Instant, duration: Duration, now: Instant) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_quad_in_out(0.0), 0.0);
        assert_eq!(ease_quad_in_out(1.0), 1.0);
        assert!((ease_quad_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_quad_in_out(0.25) - 0.125).abs() < 1e-6);
        assert!((ease_quad_in_out(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut previous = 0.0;
        for i in 1..=100 {
            let value = ease_quad_in_out(i as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_phase_opacity() {
        let start = Instant::now();
        let duration = Duration::from_millis(400);

        let entering = RoutePhase::Entering { start, duration };
        assert_eq!(entering.opacity(start), 0.0);
        assert!((entering.opacity(start + Duration::from_millis(200)) - 0.5).abs() < 1e-3);
        assert_eq!(entering.opacity(start + Duration::from_secs(2)), 1.0);

        let fading = RoutePhase::FadingOut {
            start,
            duration,
            from: 0.8,
        };
        assert!((fading.opacity(start) - 0.8).abs() < 1e-6);
        assert_eq!(fading.opacity(start + duration), 0.0);
        assert_eq!(fading.deadline(), Some(start + duration));

        assert_eq!(RoutePhase::Visible.opacity(start), 1.0);
        assert!(RoutePhase::Visible.deadline().is_none());
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let start = Instant::now();
        let phase = RoutePhase::FadingIn {
            start,
            duration: Duration::ZERO,
        };
        assert_eq!(phase.opacity(start), 1.0);
    }
}
