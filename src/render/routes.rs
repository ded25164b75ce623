//! Route visuals for the active selection.
//!
//! [`RouteLayer`] keeps one visual per route target and reconciles it against
//! the active route set on every tick: new targets enter, existing targets
//! update through a fade-out / swap / fade-in, and targets that are no longer
//! selected are removed.

use super::transition::{RoutePhase, TransitionTiming};
use crate::data::RouteSegment;
use crate::geo::{path, GlobeProjection, ProjectedPath};
use crate::ui::colors;
use eframe::egui::{Color32, Pos2};
use std::collections::HashMap;
use web_time::Instant;

/// Latency class used to color a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyBucket {
    /// Under 100ms
    Fast,
    /// 100ms up to 200ms
    Moderate,
    /// 200ms and above
    Slow,
}

impl LatencyBucket {
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 100.0 {
            LatencyBucket::Fast
        } else if latency_ms < 200.0 {
            LatencyBucket::Moderate
        } else {
            LatencyBucket::Slow
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            LatencyBucket::Fast => colors::latency::FAST,
            LatencyBucket::Moderate => colors::latency::MODERATE,
            LatencyBucket::Slow => colors::latency::SLOW,
        }
    }

    /// Legend text for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            LatencyBucket::Fast => "< 100ms",
            LatencyBucket::Moderate => "100ms - 200ms",
            LatencyBucket::Slow => "> 200ms",
        }
    }

    pub const ALL: [LatencyBucket; 3] = [
        LatencyBucket::Fast,
        LatencyBucket::Moderate,
        LatencyBucket::Slow,
    ];
}

/// Latency text placed at a route's midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLabel {
    pub text: String,
    /// `None` when the midpoint is on the far side of the globe
    pub position: Option<Pos2>,
}

impl RouteLabel {
    pub fn is_visible(&self) -> bool {
        self.position.is_some() && !self.text.is_empty()
    }
}

/// The rendered state of one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteVisual {
    displayed: RouteSegment,
    /// Segment swapped in once the current fade-out completes
    pending: Option<RouteSegment>,
    path: Option<ProjectedPath>,
    bucket: LatencyBucket,
    label: RouteLabel,
    phase: RoutePhase,
}

impl RouteVisual {
    fn new(segment: RouteSegment, phase: RoutePhase, projection: &GlobeProjection) -> Self {
        let mut visual = Self {
            bucket: LatencyBucket::from_latency(segment.latency_ms),
            label: RouteLabel {
                text: segment.label_text(),
                position: None,
            },
            displayed: segment,
            pending: None,
            path: None,
            phase,
        };
        visual.reproject(projection);
        visual
    }

    pub fn target(&self) -> &str {
        &self.displayed.target_name
    }

    /// The segment currently drawn.
    #[cfg(test)]
    pub fn segment(&self) -> &RouteSegment {
        &self.displayed
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<&RouteSegment> {
        self.pending.as_ref()
    }

    /// Projected route geometry, `None` when entirely hidden.
    pub fn path(&self) -> Option<&ProjectedPath> {
        self.path.as_ref()
    }

    #[cfg(test)]
    pub fn bucket(&self) -> LatencyBucket {
        self.bucket
    }

    pub fn color(&self) -> Color32 {
        self.bucket.color()
    }

    pub fn label(&self) -> &RouteLabel {
        &self.label
    }

    #[cfg(test)]
    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        self.phase.opacity(now)
    }

    /// Opacity of the label: the route opacity while the label is visible.
    pub fn label_opacity(&self, now: Instant) -> f32 {
        if self.label.is_visible() {
            self.opacity(now)
        } else {
            0.0
        }
    }

    fn reproject(&mut self, projection: &GlobeProjection) {
        self.path = path::project_line(projection, &self.displayed.path);
        self.label.position = projection.project(self.displayed.midpoint);
    }

    /// Replaces the displayed segment and refreshes everything derived from it.
    fn show(&mut self, segment: RouteSegment, projection: &GlobeProjection) {
        self.bucket = LatencyBucket::from_latency(segment.latency_ms);
        self.label.text = segment.label_text();
        self.displayed = segment;
        self.reproject(projection);
    }
}

/// All route visuals, in active-set order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    visuals: Vec<RouteVisual>,
    timing: TransitionTiming,
}

impl RouteLayer {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            visuals: Vec::new(),
            timing,
        }
    }

    pub fn visuals(&self) -> &[RouteVisual] {
        &self.visuals
    }

    #[cfg(test)]
    pub fn visual(&self, target: &str) -> Option<&RouteVisual> {
        self.visuals.iter().find(|v| v.target() == target)
    }

    /// Whether any visual is mid-transition.
    pub fn is_animating(&self) -> bool {
        self.visuals.iter().any(|v| v.phase.is_animating())
    }

    /// Diffs `active` against the current visuals by target name.
    ///
    /// With `selection_changed`, entering routes fade in and updated routes
    /// fade out before swapping to their new segment. Otherwise changes apply
    /// immediately. Every remaining visual is reprojected.
    pub fn reconcile(
        &mut self,
        active: &[RouteSegment],
        projection: &GlobeProjection,
        selection_changed: bool,
        now: Instant,
    ) {
        let mut previous: HashMap<String, RouteVisual> = self
            .visuals
            .drain(..)
            .map(|v| (v.target().to_string(), v))
            .collect();

        let mut next = Vec::with_capacity(active.len());
        for segment in active {
            match previous.remove(&segment.target_name) {
                Some(mut visual) => {
                    if selection_changed {
                        // Restart from wherever the visual is now
                        visual.phase = RoutePhase::FadingOut {
                            start: now,
                            duration: self.timing.fade,
                            from: visual.opacity(now),
                        };
                        visual.pending = Some(segment.clone());
                        visual.reproject(projection);
                    } else if visual.pending.is_some() {
                        visual.pending = Some(segment.clone());
                        visual.reproject(projection);
                    } else {
                        visual.show(segment.clone(), projection);
                    }
                    next.push(visual);
                }
                None => {
                    let phase = if selection_changed {
                        RoutePhase::Entering {
                            start: now,
                            duration: self.timing.enter,
                        }
                    } else {
                        RoutePhase::Visible
                    };
                    next.push(RouteVisual::new(segment.clone(), phase, projection));
                }
            }
        }

        if !previous.is_empty() {
            log::debug!("Removed {} route visual(s)", previous.len());
        }
        self.visuals = next;
    }

    /// Moves every visual past any phase deadline at or before `now`.
    ///
    /// Returns `true` if any phase changed.
    pub fn advance(&mut self, now: Instant, projection: &GlobeProjection) -> bool {
        let mut changed = false;
        for visual in &mut self.visuals {
            while let Some(deadline) = visual.phase.deadline() {
                if now < deadline {
                    break;
                }
                let phase = visual.phase;
                visual.phase = match phase {
                    RoutePhase::FadingOut { .. } => {
                        if let Some(segment) = visual.pending.take() {
                            visual.show(segment, projection);
                        }
                        RoutePhase::FadingIn {
                            start: deadline,
                            duration: self.timing.fade,
                        }
                    }
                    _ => RoutePhase::Visible,
                };
                changed = true;
            }
        }
        changed
    }
}
