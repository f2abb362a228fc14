// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animation driver: single owner of the in-flight flip.
//!
//! A flip is either **timed** (progression follows frame time through the
//! easing curve) or **gestural** (progression follows the pointer). Releasing
//! a drag turns it into a timed settle that runs from the current progression
//! to 0 (revert) or 1 (commit), with the duration scaled by the remaining
//! distance. Settling back to 0 reuses the same geometry with `t` running
//! downwards.
//!
//! At most one [`FlipTransition`] exists. Every state change of participating
//! surfaces goes through the driver while it is active.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::backend::{BodyGeometry, ContentSurface};
use crate::config::FlipConfig;
use crate::flip::{self, FlipDirection, FlipRefusal, Participants};
use crate::geometry::{self, Turn, clamp_progression};
use crate::gesture::drag_progression;
use crate::surface::{SpreadLayout, SurfaceCollection, SurfaceId};
use crate::time::{Duration, HostTime};
use crate::trace::{FlipFrameEvent, FlipRefusedEvent, FlipSettleEvent, FlipStartEvent, Tracer};

/// How progression is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipMode {
    /// By frame time, towards a fixed target.
    Timed,
    /// By pointer displacement; reversible until released.
    Gestural,
}

/// How a flip ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettleOutcome {
    /// Progression reached 1; the window moved two slots.
    Committed,
    /// Progression returned to 0; nothing moved.
    Reverted,
}

/// The in-flight flip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipTransition {
    direction: FlipDirection,
    turn: Turn,
    mode: FlipMode,
    participants: Participants,
    start_progression: f64,
    progression: f64,
    target: f64,
    started_at: HostTime,
    duration: Duration,
    page: Size,
    origin: Vec2,
    drag_start_x: f64,
    swiped: bool,
}

impl FlipTransition {
    /// Direction through the book.
    #[must_use]
    pub fn direction(&self) -> FlipDirection {
        self.direction
    }

    /// Direction of travel on screen.
    #[must_use]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Timed or gesture-driven.
    #[must_use]
    pub fn mode(&self) -> FlipMode {
        self.mode
    }

    /// The participating surfaces.
    #[must_use]
    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    /// Progression when the current timed phase started.
    #[must_use]
    pub fn start_progression(&self) -> f64 {
        self.start_progression
    }

    /// Current progression in `[0, 1]`.
    #[must_use]
    pub fn progression(&self) -> f64 {
        self.progression
    }

    /// Where the flip is heading: 1 to commit, 0 to revert.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Start of the current timed phase (or of the drag).
    #[must_use]
    pub fn started_at(&self) -> HostTime {
        self.started_at
    }

    /// Length of the current timed phase (zero while dragging).
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Page size the geometry is computed for.
    #[must_use]
    pub fn page(&self) -> Size {
        self.page
    }

    fn start_event(&self, turning_section: usize) -> FlipStartEvent {
        FlipStartEvent {
            direction: self.direction,
            turn: self.turn,
            mode: self.mode,
            at: self.started_at,
            progression: self.start_progression,
            target: self.target,
            duration: self.duration,
            turning_section,
        }
    }
}

/// Result of a flip coming to rest.
#[derive(Clone, Debug, PartialEq)]
pub struct Settle {
    /// Direction of the flip.
    pub direction: FlipDirection,
    /// Committed or reverted.
    pub outcome: SettleOutcome,
    /// Who took part.
    pub participants: Participants,
    /// Surfaces that left the window; still in the collection, for the
    /// caller to remove.
    pub retired: Vec<SurfaceId>,
}

/// Owns the progression of the single active flip.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    config: FlipConfig,
    current: Option<FlipTransition>,
}

impl AnimationDriver {
    /// Creates an idle driver.
    #[must_use]
    pub const fn new(config: FlipConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    /// The in-flight flip, if any.
    #[must_use]
    pub fn current(&self) -> Option<&FlipTransition> {
        self.current.as_ref()
    }

    /// Whether a flip is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Starts a complete timed flip.
    ///
    /// # Errors
    ///
    /// Refuses without touching any surface when a flip is already in flight
    /// or a required surface is missing.
    pub fn start_timed<S: ContentSurface>(
        &mut self,
        direction: FlipDirection,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        layout: &SpreadLayout,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), FlipRefusal> {
        self.begin(direction, FlipMode::Timed, now, 0.0, surfaces, layout, tracer)
    }

    /// Starts a drag at pointer `x`.
    ///
    /// # Errors
    ///
    /// Same refusals as [`start_timed`](Self::start_timed).
    pub fn begin_gesture<S: ContentSurface>(
        &mut self,
        direction: FlipDirection,
        x: f64,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        layout: &SpreadLayout,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), FlipRefusal> {
        self.begin(direction, FlipMode::Gestural, now, x, surfaces, layout, tracer)
    }

    /// Moves the fold to follow the pointer.
    ///
    /// Does nothing (and returns `false`) unless a drag is in progress; in
    /// particular a released drag that is settling ignores further moves.
    pub fn update_gesture<S: ContentSurface>(
        &mut self,
        x: f64,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let finger_offset = self.config.finger_offset;
        let Some(t) = self.current.as_mut() else {
            return false;
        };
        if t.mode != FlipMode::Gestural {
            return false;
        }
        if !is_measured(t.page) {
            t.page = measure(surfaces, t.participants.turning);
        }
        t.progression = drag_progression(t.drag_start_x, x, t.turn, t.page.width, finger_offset);
        self.apply(now, surfaces, tracer);
        true
    }

    /// Records a swipe. During a drag in the same direction, the release will
    /// complete the flip instead of reverting it.
    pub fn swipe(&mut self, direction: FlipDirection) -> bool {
        match self.current.as_mut() {
            Some(t) if t.mode == FlipMode::Gestural && t.direction == direction => {
                t.swiped = true;
                true
            }
            _ => false,
        }
    }

    /// Ends a drag.
    ///
    /// At progression 0 the flip reverts on the spot and the settle is
    /// returned. Otherwise a timed settle starts from the current progression:
    /// forward to 1 if a swipe was seen, back to 0 otherwise, taking the base
    /// duration scaled by the distance left.
    pub fn release_gesture<S: ContentSurface>(
        &mut self,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        tracer: &mut Tracer<'_>,
    ) -> Option<Settle> {
        let base = self.config.duration;
        let t = self.current.as_mut()?;
        if t.mode != FlipMode::Gestural {
            return None;
        }
        let p = t.progression;
        if p <= 0.0 && !t.swiped {
            let mut t = self.current.take()?;
            t.target = 0.0;
            return Some(Self::settle(t, now, surfaces, tracer));
        }

        let target = if t.swiped { 1.0 } else { 0.0 };
        t.mode = FlipMode::Timed;
        t.start_progression = p;
        t.target = target;
        t.started_at = now;
        t.duration = base.scaled((target - p).abs());
        let event = t.start_event(section_of(surfaces, t.participants.turning));
        tracer.flip_start(&event);
        None
    }

    /// Advances a timed flip to frame time `now`.
    ///
    /// Returns the settle once the duration has elapsed.
    pub fn tick<S: ContentSurface>(
        &mut self,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        tracer: &mut Tracer<'_>,
    ) -> Option<Settle> {
        let easing = self.config.easing;
        let t = self.current.as_mut()?;
        if t.mode != FlipMode::Timed {
            return None;
        }
        let fraction = t
            .duration
            .fraction_elapsed(now.saturating_duration_since(t.started_at));
        if fraction >= 1.0 {
            let mut t = self.current.take()?;
            t.progression = t.target;
            return Some(Self::settle(t, now, surfaces, tracer));
        }
        let eased = easing.apply(fraction);
        t.progression =
            clamp_progression(t.start_progression + (t.target - t.start_progression) * eased);
        self.apply(now, surfaces, tracer);
        None
    }

    fn begin<S: ContentSurface>(
        &mut self,
        direction: FlipDirection,
        mode: FlipMode,
        now: HostTime,
        drag_start_x: f64,
        surfaces: &mut SurfaceCollection<S>,
        layout: &SpreadLayout,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), FlipRefusal> {
        let refuse = |reason: FlipRefusal, tracer: &mut Tracer<'_>| -> Result<(), FlipRefusal> {
            tracer.flip_refused(&FlipRefusedEvent { direction, reason });
            Err(reason)
        };
        if self.current.is_some() {
            return refuse(FlipRefusal::Busy, tracer);
        }
        let participants = match flip::begin(surfaces, direction) {
            Ok(p) => p,
            Err(reason) => return refuse(reason, tracer),
        };

        let (duration, target) = match mode {
            FlipMode::Timed => (self.config.duration, 1.0),
            FlipMode::Gestural => (Duration::ZERO, 1.0),
        };
        let transition = FlipTransition {
            direction,
            turn: direction.turn(layout.reading),
            mode,
            participants,
            start_progression: 0.0,
            progression: 0.0,
            target,
            started_at: now,
            duration,
            page: measure(surfaces, participants.turning),
            origin: layout.origin(direction.turning_slot()),
            drag_start_x,
            swiped: false,
        };
        let event = transition.start_event(section_of(surfaces, participants.turning));
        tracer.flip_start(&event);

        self.current = Some(transition);
        self.apply(now, surfaces, tracer);
        Ok(())
    }

    /// Recomputes geometry for the current progression and stores it on the
    /// participants.
    fn apply<S: ContentSurface>(
        &mut self,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        tracer: &mut Tracer<'_>,
    ) {
        let fold = self.config.fold;
        let Some(t) = self.current.as_mut() else {
            return;
        };
        if !is_measured(t.page) {
            t.page = measure(surfaces, t.participants.turning);
        }
        let styles = geometry::styles(t.progression, t.page, t.turn, &fold).placed_at(t.origin);
        for (role, id) in t.participants.iter() {
            if surfaces.contains(id) {
                surfaces.set_style(id, Some(styles.get(role)));
            }
        }

        tracer.flip_frame(&FlipFrameEvent {
            at: now,
            progression: t.progression,
            fold_angle: fold.angle(t.progression),
            mode: t.mode,
        });

        #[cfg(feature = "trace-rich")]
        if tracer.is_enabled() {
            use crate::trace::SurfaceStyleChange;

            let changes: Vec<SurfaceStyleChange> = t
                .participants
                .iter()
                .filter(|&(_, id)| surfaces.contains(id))
                .map(|(role, id)| {
                    let record = styles.get(role);
                    SurfaceStyleChange {
                        section: surfaces.section_of(id),
                        role,
                        clip_area: record.clip.area(),
                        shadow: record.shadow.map(|s| s.opacity),
                    }
                })
                .collect();
            tracer.surface_styles(now, &changes);
        }
    }

    fn settle<S: ContentSurface>(
        t: FlipTransition,
        now: HostTime,
        surfaces: &mut SurfaceCollection<S>,
        tracer: &mut Tracer<'_>,
    ) -> Settle {
        for (_, id) in t.participants.iter() {
            if surfaces.contains(id) {
                surfaces.set_style(id, None);
            }
        }
        let (outcome, retired) = if t.target >= 1.0 {
            (
                SettleOutcome::Committed,
                flip::commit(surfaces, t.direction),
            )
        } else {
            flip::revert(surfaces, &t.participants);
            (SettleOutcome::Reverted, Vec::new())
        };

        #[expect(
            clippy::cast_possible_truncation,
            reason = "at most six surfaces can leave the window"
        )]
        let retired_count = retired.len() as u32;
        tracer.flip_settle(&FlipSettleEvent {
            direction: t.direction,
            outcome,
            at: now,
            retired: retired_count,
        });

        Settle {
            direction: t.direction,
            outcome,
            participants: t.participants,
            retired,
        }
    }
}

fn is_measured(page: Size) -> bool {
    page.width > 0.0 && page.height > 0.0
}

/// Measures a surface's body, caching the result. Unmeasurable surfaces
/// yield a zero size.
fn measure<S: ContentSurface>(surfaces: &mut SurfaceCollection<S>, id: SurfaceId) -> Size {
    if !surfaces.contains(id) {
        return Size::ZERO;
    }
    let geometry = surfaces
        .get(id)
        .and_then(|s| s.content().body_geometry())
        .unwrap_or(BodyGeometry::ZERO);
    surfaces.set_geometry(id, geometry);
    geometry.size()
}

fn section_of<S>(surfaces: &SurfaceCollection<S>, id: SurfaceId) -> usize {
    surfaces.get(id).map_or(usize::MAX, |s| s.section().index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadingDirection;
    use crate::flip::{Phase, Slot, SurfaceState};
    use crate::test_support::{MockSurface, PAGE, VIEWPORT, snapshot, window};

    const T0: HostTime = HostTime(1_000_000_000);

    fn setup() -> (AnimationDriver, SurfaceCollection<MockSurface>, SpreadLayout) {
        let layout = SpreadLayout::from_viewport(
            VIEWPORT.width,
            VIEWPORT.height,
            ReadingDirection::LeftToRight,
        );
        (
            AnimationDriver::new(FlipConfig::nanos()),
            window(10, &layout),
            layout,
        )
    }

    fn at_millis(ms: u64) -> HostTime {
        T0 + Duration(ms * 1_000_000)
    }

    fn section_in(surfaces: &SurfaceCollection<MockSurface>, slot: Slot) -> Option<usize> {
        surfaces
            .find(slot, Phase::Resting)
            .map(|id| surfaces.section_of(id))
    }

    #[test]
    fn timed_flip_runs_to_commit() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        driver
            .start_timed(FlipDirection::Forward, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        let turning = driver.current().unwrap().participants().turning;
        assert!(
            surfaces.get(turning).unwrap().style().is_some(),
            "first frame is applied on start"
        );

        assert!(driver.tick(at_millis(200), &mut surfaces, &mut tracer).is_none());
        let p = driver.current().unwrap().progression();
        assert!(p > 0.0 && p < 0.5, "ease-in lags at the halfway time: {p}");

        let settle = driver
            .tick(at_millis(400), &mut surfaces, &mut tracer)
            .expect("flip settles when the duration elapses");
        assert_eq!(settle.outcome, SettleOutcome::Committed);
        assert_eq!(settle.retired.len(), 2, "old prev pages retire");
        assert!(!driver.is_active());
        assert_eq!(section_in(&surfaces, Slot::ReadableLeft), Some(14));
        assert_eq!(section_in(&surfaces, Slot::ReadableRight), Some(15));
        assert!(
            surfaces.iter().all(|(_, s)| s.style().is_none()),
            "flip styles are cleared on settle"
        );
    }

    #[test]
    fn progression_is_monotonic_across_frames() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        driver
            .start_timed(FlipDirection::Backward, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        let mut last = 0.0;
        for ms in (16..400).step_by(16) {
            assert!(driver.tick(at_millis(ms), &mut surfaces, &mut tracer).is_none());
            let p = driver.current().unwrap().progression();
            assert!(p >= last, "progression went backwards at {ms} ms");
            last = p;
        }
    }

    #[test]
    fn busy_driver_refuses_without_mutation() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        driver
            .start_timed(FlipDirection::Forward, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        let before = snapshot(&surfaces);
        let current = *driver.current().unwrap();
        for dir in [FlipDirection::Forward, FlipDirection::Backward] {
            assert_eq!(
                driver.start_timed(dir, T0, &mut surfaces, &layout, &mut tracer),
                Err(FlipRefusal::Busy)
            );
        }
        assert_eq!(snapshot(&surfaces), before);
        assert_eq!(driver.current(), Some(&current));
    }

    #[test]
    fn missing_neighbor_is_refused() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        let next1 = surfaces.find(Slot::Next1, Phase::Resting).unwrap();
        let _ = surfaces.remove(next1);
        let before = snapshot(&surfaces);
        assert_eq!(
            driver.start_timed(FlipDirection::Forward, T0, &mut surfaces, &layout, &mut tracer),
            Err(FlipRefusal::MissingNeighbor)
        );
        assert_eq!(snapshot(&surfaces), before);
        assert!(!driver.is_active());
    }

    #[test]
    fn released_drag_reverses_with_scaled_duration() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        let before = snapshot(&surfaces);

        driver
            .begin_gesture(FlipDirection::Forward, 780.0, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        assert!(driver.update_gesture(600.0, T0, &mut surfaces, &mut tracer));
        let p = driver.current().unwrap().progression();
        assert!((p - (180.0 + 24.0) / 800.0).abs() < 1e-12, "p = {p}");

        assert!(driver.release_gesture(at_millis(10), &mut surfaces, &mut tracer).is_none());
        let t = *driver.current().unwrap();
        assert_eq!(t.mode(), FlipMode::Timed);
        assert_eq!(t.target(), 0.0);
        assert_eq!(t.start_progression(), p);
        assert_eq!(t.duration(), FlipConfig::nanos().duration.scaled(p));

        assert!(
            !driver.update_gesture(700.0, at_millis(20), &mut surfaces, &mut tracer),
            "moves are ignored while settling"
        );

        let end = at_millis(10) + t.duration();
        let settle = driver.tick(end, &mut surfaces, &mut tracer).unwrap();
        assert_eq!(settle.outcome, SettleOutcome::Reverted);
        assert!(settle.retired.is_empty());
        assert_eq!(snapshot(&surfaces), before, "original states restored exactly");
        assert!(surfaces.iter().all(|(_, s)| s.style().is_none()));
    }

    #[test]
    fn release_at_zero_reverts_immediately() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        let before = snapshot(&surfaces);
        driver
            .begin_gesture(FlipDirection::Forward, 700.0, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        // Dragging the wrong way keeps progression at zero.
        driver.update_gesture(750.0, T0, &mut surfaces, &mut tracer);
        let settle = driver
            .release_gesture(T0, &mut surfaces, &mut tracer)
            .expect("zero progression settles at once");
        assert_eq!(settle.outcome, SettleOutcome::Reverted);
        assert!(!driver.is_active());
        assert_eq!(snapshot(&surfaces), before);
    }

    #[test]
    fn swipe_during_drag_completes_the_flip() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        driver
            .begin_gesture(FlipDirection::Forward, 780.0, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        driver.update_gesture(500.0, T0, &mut surfaces, &mut tracer);
        assert!(!driver.swipe(FlipDirection::Backward), "wrong direction is ignored");
        assert!(driver.swipe(FlipDirection::Forward));
        let p = driver.current().unwrap().progression();

        driver.release_gesture(T0, &mut surfaces, &mut tracer);
        let t = *driver.current().unwrap();
        assert_eq!(t.target(), 1.0);
        assert_eq!(t.duration(), FlipConfig::nanos().duration.scaled(1.0 - p));

        let settle = driver
            .tick(T0 + t.duration(), &mut surfaces, &mut tracer)
            .unwrap();
        assert_eq!(settle.outcome, SettleOutcome::Committed);
        assert_eq!(section_in(&surfaces, Slot::ReadableLeft), Some(14));
    }

    #[test]
    fn reversal_reuses_forward_geometry() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        driver
            .begin_gesture(FlipDirection::Forward, 780.0, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        driver.update_gesture(400.0, T0, &mut surfaces, &mut tracer);
        let t = *driver.current().unwrap();
        let turning = t.participants().turning;
        let expected = geometry::styles(t.progression(), PAGE, Turn::TowardLeft, &driver.config().fold)
            .placed_at(layout.origin(Slot::ReadableRight));
        assert_eq!(surfaces.get(turning).unwrap().style(), Some(&expected.turning));

        driver.release_gesture(T0, &mut surfaces, &mut tracer);
        let back = *driver.current().unwrap();
        driver.tick(T0 + back.duration().scaled(0.5), &mut surfaces, &mut tracer);
        let now = driver.current().unwrap();
        assert!(
            now.progression() < t.progression() && now.progression() > 0.0,
            "settling back runs t downwards"
        );
        let expected = geometry::styles(now.progression(), PAGE, Turn::TowardLeft, &driver.config().fold)
            .placed_at(layout.origin(Slot::ReadableRight));
        assert_eq!(surfaces.get(turning).unwrap().style(), Some(&expected.turning));
    }

    #[test]
    fn unmeasured_turning_page_is_measured_later() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        let turning = surfaces.find(Slot::ReadableRight, Phase::Resting).unwrap();
        surfaces.content_mut(turning).geometry = None;

        driver
            .start_timed(FlipDirection::Forward, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        assert_eq!(driver.current().unwrap().page(), Size::ZERO);
        let style = surfaces.get(turning).unwrap().style().copied().unwrap();
        assert!(style.transform.is_finite(), "degenerate frame stays finite");

        surfaces.content_mut(turning).geometry = Some(BodyGeometry {
            width: PAGE.width,
            height: PAGE.height,
            frame_to_body: Vec2::ZERO,
        });
        driver.tick(at_millis(100), &mut surfaces, &mut tracer);
        assert_eq!(driver.current().unwrap().page(), PAGE);
        assert_eq!(surfaces.get(turning).unwrap().geometry().size(), PAGE);
    }

    #[test]
    fn participants_are_transitioning_during_flip() {
        let (mut driver, mut surfaces, layout) = setup();
        let mut tracer = Tracer::none();
        driver
            .start_timed(FlipDirection::Forward, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        let moving: Vec<usize> = surfaces
            .iter()
            .filter(|(_, s)| !s.state().is_resting())
            .map(|(_, s)| s.section().index)
            .collect();
        assert_eq!(moving, [13, 14, 15]);
        let left = surfaces.find_by_section(12).unwrap();
        assert_eq!(surfaces.state(left), SurfaceState::resting(Slot::ReadableLeft));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn start_events_name_the_turning_section() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Starts(Vec<FlipStartEvent>);

        impl TraceSink for Starts {
            fn on_flip_start(&mut self, e: &FlipStartEvent) {
                self.0.push(*e);
            }
        }

        let (mut driver, mut surfaces, layout) = setup();
        let mut sink = Starts::default();
        let mut tracer = Tracer::new(&mut sink);
        driver
            .begin_gesture(FlipDirection::Forward, 700.0, T0, &mut surfaces, &layout, &mut tracer)
            .unwrap();
        driver.update_gesture(600.0, at_millis(16), &mut surfaces, &mut tracer);
        assert!(
            driver
                .release_gesture(at_millis(32), &mut surfaces, &mut tracer)
                .is_none(),
            "a partial drag hands over to a timed settle"
        );
        drop(tracer);

        let sections: Vec<_> = sink.0.iter().map(|e| e.turning_section).collect();
        assert_eq!(sections, [13, 13], "drag start and release both name section 13");
        assert_eq!(sink.0[1].mode, FlipMode::Timed);
    }
}
