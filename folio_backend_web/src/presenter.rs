// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element management.
//!
//! Translates [`SurfaceCollection`] state into one absolutely positioned
//! `<div>` per surface by applying incremental updates from
//! [`SpreadChanges`]. Each page div carries an overlay child for the fold
//! shadow and the bending shine; content is attached by the application
//! through [`DomPresenter::element`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use folio_core::backend::Presenter;
use folio_core::config::ReadingDirection;
use folio_core::style::StyleRecord;
use folio_core::surface::{SpreadChanges, Surface, SurfaceCollection};
use kurbo::Size;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, HtmlElement};

use crate::css;

/// Class every page div carries, next to its state class.
pub const PAGE_CLASS: &str = "folio-page";

struct PageElement {
    page: HtmlElement,
    overlay: HtmlElement,
}

/// Maps a [`SurfaceCollection`] to live DOM elements, applying incremental
/// updates from [`SpreadChanges`].
///
/// The presenter owns a container `HtmlElement` to which page `<div>`
/// elements are added and removed. Hand it to
/// [`SpreadManager::present`](folio_core::spread::SpreadManager::present)
/// each frame to synchronize the DOM with the spread.
pub struct DomPresenter {
    container: HtmlElement,
    reading: ReadingDirection,
    elements: Vec<Option<PageElement>>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("container", &"HtmlElement")
            .field("reading", &self.reading)
            .field("elements_len", &self.elements.len())
            .finish()
    }
}

impl DomPresenter {
    /// Creates a new presenter that manages child elements of `container`.
    ///
    /// State class names depend on the reading direction.
    #[must_use]
    pub fn new(container: HtmlElement, reading: ReadingDirection) -> Self {
        Self {
            container,
            reading,
            elements: Vec::new(),
        }
    }

    /// Returns a reference to the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Returns the page element for the given surface index, if it exists.
    #[must_use]
    pub fn element(&self, idx: u32) -> Option<&HtmlElement> {
        self.entry(idx).map(|e| &e.page)
    }

    fn entry(&self, idx: u32) -> Option<&PageElement> {
        self.elements
            .get(idx as usize)
            .and_then(|slot| slot.as_ref())
    }

    /// Takes an element out of the slot, leaving `None`.
    fn take_element(&mut self, idx: u32) -> Option<PageElement> {
        self.elements.get_mut(idx as usize)?.take()
    }

    /// Stores an element at the given slot index, growing the vec if needed.
    fn put_element(&mut self, idx: u32, el: PageElement) {
        let slot = idx as usize;
        if self.elements.len() <= slot {
            self.elements.resize_with(slot + 1, || None);
        }
        self.elements[slot] = Some(el);
    }

    fn create(&self, doc: &Document) -> Option<PageElement> {
        let page: HtmlElement = doc.create_element("div").ok()?.unchecked_into();
        let s = page.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("left", "0");
        let _ = s.set_property("top", "0");
        let _ = s.set_property("transform-origin", "0 0");

        let overlay: HtmlElement = doc.create_element("div").ok()?.unchecked_into();
        let o = overlay.style();
        let _ = o.set_property("position", "absolute");
        let _ = o.set_property("inset", "0");
        let _ = o.set_property("pointer-events", "none");
        let _ = o.set_property("z-index", "1");
        let _ = page.append_child(&overlay);

        Some(PageElement { page, overlay })
    }
}

impl<S> Presenter<S> for DomPresenter {
    /// Applies incremental changes from a [`SpreadChanges`] to the DOM.
    fn apply(&mut self, surfaces: &SurfaceCollection<S>, changes: &SpreadChanges) {
        // 1. Removals
        for &idx in &changes.removed {
            if let Some(el) = self.take_element(idx) {
                el.page.remove();
            }
        }

        // 2. Additions
        if let Some(doc) = self.container.owner_document() {
            for &idx in &changes.added {
                let Some(surface) = surfaces.at(idx) else {
                    continue;
                };
                let Some(el) = self.create(&doc) else {
                    continue;
                };
                if !surface.is_visible() {
                    let _ = el.page.style().set_property("display", "none");
                }
                paint(&el, surface, self.reading);
                let _ = self.container.append_child(&el.page);
                self.put_element(idx, el);
            }
        }

        // 3. Styles and layouts
        for &idx in changes.styles.iter().chain(&changes.layouts) {
            if let (Some(el), Some(surface)) = (self.entry(idx), surfaces.at(idx)) {
                paint(el, surface, self.reading);
            }
        }

        // 4. Shown/hidden
        for &idx in &changes.hidden {
            if let Some(el) = self.entry(idx) {
                let _ = el.page.style().set_property("display", "none");
            }
        }
        for &idx in &changes.shown {
            if let Some(el) = self.entry(idx) {
                let _ = el.page.style().remove_property("display");
            }
        }

        // 5. Document order
        if changes.order_changed {
            for &idx in surfaces.order() {
                if let Some(el) = self.entry(idx) {
                    // DOM re-append moves an existing child, reordering it.
                    let _ = self.container.append_child(&el.page);
                }
            }
        }
    }
}

/// Writes a surface's effective style and state class to its elements.
fn paint<S>(el: &PageElement, surface: &Surface<S>, reading: ReadingDirection) {
    let style = surface.effective_style();
    let size = surface.layout().size;
    el.page.set_class_name(&format!(
        "{PAGE_CLASS} {}",
        surface.state().class_name(reading)
    ));

    let s = el.page.style();
    let _ = s.set_property("width", &format!("{}px", size.width));
    let _ = s.set_property("height", &format!("{}px", size.height));
    let _ = s.set_property("transform", &css::matrix3d(&style.transform));
    let _ = s.set_property("clip-path", &css::clip_path(&style.clip));
    let _ = s.set_property("opacity", &format!("{}", style.opacity));
    let _ = s.set_property("z-index", &format!("{}", style.z));

    match effects(&style, size) {
        Some(image) => {
            let _ = el.overlay.style().set_property("background-image", &image);
        }
        None => {
            let _ = el.overlay.style().remove_property("background-image");
        }
    }
}

/// Shine and shadow layers of a record, as one `background-image` value.
fn effects(style: &StyleRecord, size: Size) -> Option<String> {
    let shine = style.shine.and_then(|s| css::shine_gradient(&s, size));
    let shadow = style
        .shadow
        .and_then(|s| css::shadow_gradient(&s, css::clip_center(&style.clip), size));
    match (shine, shadow) {
        (Some(a), Some(b)) => Some(format!("{a}, {b}")),
        (a, b) => a.or(b),
    }
}
