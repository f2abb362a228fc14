// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that turns the pages of an in-memory book.
//!
//! Displays the cover of an eight-section book, lets the prefetch queue fill
//! the neighbouring slots, then runs a timed forward flip, a drag that is
//! released early and falls back, and a timed backward flip. Every event is
//! written to a [`PrettyPrintSink`](folio_debug::pretty::PrettyPrintSink) on
//! stdout and to a [`RecorderSink`](folio_debug::recorder::RecorderSink),
//! which is exported as a Chrome trace JSON file at the end.

use std::fs::File;
use std::io::BufWriter;

use folio_core::backend::{
    BodyGeometry, ContentSurface, LoadError, LoadRequest, Presenter, SurfaceLoader,
};
use folio_core::config::FlipConfig;
use folio_core::geometry::Turn;
use folio_core::gesture::GestureEvent;
use folio_core::prefetch::PumpResult;
use folio_core::section::Section;
use folio_core::spread::SpreadManager;
use folio_core::surface::{SpreadChanges, SurfaceCollection};
use folio_core::time::{Duration, HostTime, Timebase};
use folio_core::timing::FrameTick;
use folio_core::trace::{
    DisplayEvent, FlipFrameEvent, FlipRefusedEvent, FlipSettleEvent, FlipStartEvent,
    GestureTraceEvent, PrefetchEvent, SurfaceStyleChange, TraceSink, Tracer,
};
use kurbo::{Point, Size, Vec2};

use folio_debug::pretty::PrettyPrintSink;
use folio_debug::recorder::RecorderSink;

const SECTION_COUNT: usize = 8;
/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;
const VIEWPORT: (f64, f64) = (800.0, 600.0);

// -- in-memory content -------------------------------------------------------

/// A page that "renders" by recording the size it was laid out for.
#[derive(Debug)]
struct BookPage {
    section: usize,
    page: Size,
    visible: bool,
}

impl ContentSurface for BookPage {
    fn render(&mut self, request: &LoadRequest) -> Result<(), LoadError> {
        if request.section.index >= SECTION_COUNT {
            return Err(LoadError::Unavailable(request.section.index));
        }
        self.page = request.page;
        Ok(())
    }

    fn width(&self) -> f64 {
        self.page.width
    }

    fn height(&self) -> f64 {
        self.page.height
    }

    fn location_of(&self, target: &str) -> Option<Point> {
        (self.section == 0 && target == "#start").then_some(Point::ORIGIN)
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn body_geometry(&self) -> Option<BodyGeometry> {
        (self.page != Size::ZERO).then_some(BodyGeometry {
            width: self.page.width,
            height: self.page.height,
            frame_to_body: Vec2::ZERO,
        })
    }

    fn resize(&mut self, page: Size) {
        self.page = page;
    }

    fn scroll_to(&mut self, _offset: Point) {}
}

#[derive(Debug, Default)]
struct Shelf {
    created: usize,
}

impl SurfaceLoader for Shelf {
    type Surface = BookPage;

    fn create(&mut self, section: &Section) -> BookPage {
        self.created += 1;
        BookPage {
            section: section.index,
            page: Size::ZERO,
            visible: false,
        }
    }
}

/// Counts what a real presenter would have to touch.
#[derive(Debug, Default)]
struct CountingPresenter {
    frames: u64,
    restyles: usize,
    visibility: usize,
}

impl Presenter<BookPage> for CountingPresenter {
    fn apply(&mut self, _surfaces: &SurfaceCollection<BookPage>, changes: &SpreadChanges) {
        if changes.is_empty() {
            return;
        }
        self.frames += 1;
        self.restyles += changes.styles.len() + changes.layouts.len();
        self.visibility += changes.shown.len() + changes.hidden.len();
    }
}

// -- fan-out sink ------------------------------------------------------------

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_flip_start(&mut self, e: &FlipStartEvent) {
        self.a.on_flip_start(e);
        self.b.on_flip_start(e);
    }

    fn on_flip_frame(&mut self, e: &FlipFrameEvent) {
        self.a.on_flip_frame(e);
        self.b.on_flip_frame(e);
    }

    fn on_flip_settle(&mut self, e: &FlipSettleEvent) {
        self.a.on_flip_settle(e);
        self.b.on_flip_settle(e);
    }

    fn on_flip_refused(&mut self, e: &FlipRefusedEvent) {
        self.a.on_flip_refused(e);
        self.b.on_flip_refused(e);
    }

    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        self.a.on_gesture(e);
        self.b.on_gesture(e);
    }

    fn on_prefetch(&mut self, e: &PrefetchEvent) {
        self.a.on_prefetch(e);
        self.b.on_prefetch(e);
    }

    fn on_display(&mut self, e: &DisplayEvent) {
        self.a.on_display(e);
        self.b.on_display(e);
    }

    fn on_surface_styles(&mut self, at: HostTime, changes: &[SurfaceStyleChange]) {
        self.a.on_surface_styles(at, changes);
        self.b.on_surface_styles(at, changes);
    }
}

// -- frame loop --------------------------------------------------------------

type Spread = SpreadManager<Shelf, Vec<Section>>;

/// Steps frames until no flip is in flight and the prefetch queue is drained.
fn run_until_idle(
    spread: &mut Spread,
    tick: &mut FrameTick,
    presenter: &mut CountingPresenter,
    tracer: &mut Tracer<'_>,
) {
    loop {
        spread.tick(tick, tracer);
        let pumped = spread.pump_prefetch(tracer);
        spread.present(presenter);
        if let Some(next) = tick.following() {
            *tick = next;
        }
        if !spread.is_flipping() && matches!(pumped, PumpResult::Idle) {
            break;
        }
    }
}

/// Advances a single frame.
fn step(
    spread: &mut Spread,
    tick: &mut FrameTick,
    presenter: &mut CountingPresenter,
    tracer: &mut Tracer<'_>,
) {
    spread.tick(tick, tracer);
    spread.present(presenter);
    if let Some(next) = tick.following() {
        *tick = next;
    }
}

fn report(label: &str, spread: &Spread) {
    let location = spread.location();
    let shown = spread
        .surfaces()
        .iter()
        .filter(|(_, surface)| surface.content().visible)
        .count();
    println!(
        "-- {label}: left={:?} right={:?} surfaces={} shown={shown}",
        location.left,
        location.right,
        spread.surfaces().len()
    );
}

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let mut recorder = RecorderSink::new();

    // -- book --------------------------------------------------------------
    let sections: Vec<Section> = (0..SECTION_COUNT).map(Section::new).collect();
    let mut spread = SpreadManager::new(FlipConfig::nanos(), sections, Shelf::default(), VIEWPORT);
    let mut presenter = CountingPresenter::default();

    let mut tick = FrameTick {
        now: HostTime(1_000_000_000), // start at 1s
        frame_index: 0,
        refresh_interval: Some(Duration(REFRESH_INTERVAL_NS)),
    };

    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);

        // 1. Cover
        if let Err(err) = spread.display(0, Some("#start"), &mut tracer) {
            eprintln!("failed to open the book: {err}");
            return;
        }
        run_until_idle(&mut spread, &mut tick, &mut presenter, &mut tracer);
        report("cover", &spread);

        // 2. Timed forward flip
        spread.next(tick.now, &mut tracer);
        run_until_idle(&mut spread, &mut tick, &mut presenter, &mut tracer);
        report("forward", &spread);

        // 3. Drag released before the swipe threshold falls back
        let (width, _) = VIEWPORT;
        let start_x = width - 40.0;
        spread.handle_gesture(
            GestureEvent::DragStart {
                turn: Turn::TowardLeft,
                x: start_x,
            },
            tick.now,
            &mut tracer,
        );
        for i in 1..=6 {
            let x = start_x - 25.0 * f64::from(i);
            spread.handle_gesture(GestureEvent::DragMove { x }, tick.now, &mut tracer);
            step(&mut spread, &mut tick, &mut presenter, &mut tracer);
        }
        spread.handle_gesture(GestureEvent::DragEnd, tick.now, &mut tracer);
        run_until_idle(&mut spread, &mut tick, &mut presenter, &mut tracer);
        report("released drag", &spread);

        // 4. Timed backward flip
        spread.prev(tick.now, &mut tracer);
        run_until_idle(&mut spread, &mut tick, &mut presenter, &mut tracer);
        report("backward", &spread);
    }

    println!(
        "presented {} frames ({} restyles, {} visibility changes), {} surfaces created",
        presenter.frames,
        presenter.restyles,
        presenter.visibility,
        spread.loader().created
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "flip_trace.json";
    let file = File::create(path).expect("failed to create flip_trace.json");
    let mut writer = BufWriter::new(file);
    folio_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} frames)", tick.frame_index);
}
