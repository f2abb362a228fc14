// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Book sections and the sequence they come in.

use alloc::vec::Vec;

use crate::config::LayoutMode;

/// Rendition spread marker of a pre-paginated section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageSpread {
    /// The page wants the left slot of a spread.
    Left,
    /// The page wants the right slot of a spread.
    Right,
}

/// Per-section rendition properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SectionProperties {
    /// Spread placement marker, if the book declares one.
    pub page_spread: Option<PageSpread>,
}

/// One section of the book; a content surface shows exactly one section.
///
/// The index is the document-order key: it never changes during the life of
/// a surface and orders the [`SurfaceCollection`](crate::surface::SurfaceCollection).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Section {
    /// Position in the spine.
    pub index: usize,
    /// Rendition properties.
    pub properties: SectionProperties,
}

impl Section {
    /// Creates a section without rendition markers.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            properties: SectionProperties { page_spread: None },
        }
    }

    /// Returns a copy carrying the given spread marker.
    #[must_use]
    pub const fn with_page_spread(mut self, spread: PageSpread) -> Self {
        self.properties.page_spread = Some(spread);
        self
    }

    /// Whether this section must sit alone on the right-hand slot when
    /// displayed: the cover always does, and pre-paginated pages do when
    /// marked `page-spread-right`.
    #[must_use]
    pub fn forces_right(&self, layout: LayoutMode) -> bool {
        self.index == 0
            || (layout == LayoutMode::PrePaginated
                && self.properties.page_spread == Some(PageSpread::Right))
    }
}

/// The ordered sections of a book.
pub trait SectionSequence {
    /// Number of sections.
    fn len(&self) -> usize;

    /// Returns the section at `index`, if it exists.
    fn get(&self, index: usize) -> Option<Section>;

    /// Whether the book has no sections.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the section after `section`.
    fn next(&self, section: &Section) -> Option<Section> {
        self.get(section.index.checked_add(1)?)
    }

    /// Returns the section before `section`.
    fn prev(&self, section: &Section) -> Option<Section> {
        self.get(section.index.checked_sub(1)?)
    }
}

impl SectionSequence for [Section] {
    fn len(&self) -> usize {
        <[Section]>::len(self)
    }

    fn get(&self, index: usize) -> Option<Section> {
        <[Section]>::get(self, index).copied()
    }
}

impl SectionSequence for Vec<Section> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<Section> {
        self.as_slice().get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn neighbours_follow_the_spine() {
        let book = vec![Section::new(0), Section::new(1), Section::new(2)];
        let first = SectionSequence::get(&book, 0).unwrap();
        assert_eq!(book.prev(&first), None);
        assert_eq!(book.next(&first).map(|s| s.index), Some(1));
        let last = SectionSequence::get(&book, 2).unwrap();
        assert_eq!(book.next(&last), None);
        assert!(SectionSequence::get(&book, 3).is_none());
    }

    #[test]
    fn forced_right_placement() {
        let cover = Section::new(0);
        assert!(cover.forces_right(LayoutMode::Reflowable));
        let marked = Section::new(5).with_page_spread(PageSpread::Right);
        assert!(marked.forces_right(LayoutMode::PrePaginated));
        assert!(
            !marked.forces_right(LayoutMode::Reflowable),
            "markers only apply to pre-paginated books"
        );
        let left = Section::new(5).with_page_spread(PageSpread::Left);
        assert!(!left.forces_right(LayoutMode::PrePaginated));
    }
}
