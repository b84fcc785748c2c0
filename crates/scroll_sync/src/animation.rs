//! Eased per-view scroll animations

use page_map::ViewId;

/// Quadratic ease-in-out over normalized progress.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// One fixed-duration scroll of a single pane from its current position
/// to a target offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub view: ViewId,
    pub start: f64,
    pub target: f64,
    pub started_at: f64,
    pub duration_ms: f64,
}

impl ScrollAnimation {
    pub fn new(view: ViewId, start: f64, target: f64, started_at: f64, duration_ms: f64) -> Self {
        Self {
            view,
            start,
            target,
            started_at,
            duration_ms,
        }
    }

    /// Sub-pixel distances are not worth animating.
    pub fn is_trivial(&self) -> bool {
        (self.target - self.start).abs() < 1.0
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.duration_ms <= 0.0 || now - self.started_at >= self.duration_ms
    }

    /// Scroll offset at the given time.
    pub fn position_at(&self, now: f64) -> f64 {
        if self.is_finished(now) {
            return self.target;
        }
        let t = ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0);
        self.start + (self.target - self.start) * ease_in_out(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-9);
        // Slow start, fast middle.
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_position_interpolates_and_lands_on_target() {
        let anim = ScrollAnimation::new(ViewId::Text, 100.0, 900.0, 1000.0, 800.0);

        assert_eq!(anim.position_at(1000.0), 100.0);
        let mid = anim.position_at(1400.0);
        assert!((mid - 500.0).abs() < 1e-9);
        assert!(!anim.is_finished(1799.0));
        assert!(anim.is_finished(1800.0));
        assert_eq!(anim.position_at(2500.0), 900.0);
    }

    #[test]
    fn test_trivial_distance() {
        let anim = ScrollAnimation::new(ViewId::Image, 400.0, 400.4, 0.0, 800.0);
        assert!(anim.is_trivial());
        let anim = ScrollAnimation::new(ViewId::Image, 400.0, 402.0, 0.0, 800.0);
        assert!(!anim.is_trivial());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn easing_is_monotonic_and_bounded(a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_in_out(lo) <= ease_in_out(hi));
            prop_assert!((0.0..=1.0).contains(&ease_in_out(a)));
        }

        #[test]
        fn position_stays_between_start_and_target(
            start in -5000.0f64..5000.0,
            target in -5000.0f64..5000.0,
            t in 0.0f64..1600.0
        ) {
            let anim = ScrollAnimation::new(ViewId::Source, start, target, 0.0, 800.0);
            let pos = anim.position_at(t);
            let (lo, hi) = if start <= target { (start, target) } else { (target, start) };
            prop_assert!(pos >= lo - 1e-9 && pos <= hi + 1e-9);
        }
    }
}
