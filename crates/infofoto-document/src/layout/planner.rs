// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagination planner — groups the ordered photos into pages.
//
// A horizontal photo directly followed by another horizontal photo shares a
// page with it; everything else gets a page of its own. Squares count as
// horizontal. The scan is a single pass, left to right, with no lookahead
// beyond the next photo.

use infofoto_core::types::{Orientation, PhotoItem};
use tracing::debug;

/// Anything the planner can classify.
pub trait Oriented {
    fn orientation(&self) -> Orientation;
}

impl Oriented for PhotoItem {
    fn orientation(&self) -> Orientation {
        PhotoItem::orientation(self)
    }
}

/// `(width, height)` in pixels.
impl Oriented for (u32, u32) {
    fn orientation(&self) -> Orientation {
        Orientation::classify(self.0, self.1)
    }
}

/// Maximum display height of a photo box, per page kind, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHeights {
    pub single_cm: f64,
    pub pair_cm: f64,
}

impl BoxHeights {
    /// Reserve for the caption under a single photo.
    const SINGLE_RESERVE_CM: f64 = 3.0;
    /// Per-photo caption reserve on a shared page.
    const PAIR_CAPTION_RESERVE_CM: f64 = 2.5;
    /// Spacer between the two blocks of a shared page.
    const PAIR_SPACER_CM: f64 = 1.0;

    pub fn for_usable_height(usable_height_cm: f64) -> Self {
        Self {
            single_cm: usable_height_cm - Self::SINGLE_RESERVE_CM,
            pair_cm: (usable_height_cm
                - Self::PAIR_CAPTION_RESERVE_CM * 2.0
                - Self::PAIR_SPACER_CM)
                / 2.0,
        }
    }
}

/// One photo placed on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoSlot {
    /// Index into the photo list the plan was built from.
    pub photo: usize,
    /// 1-based number printed under the photo.
    pub display_index: u32,
    pub orientation: Orientation,
    pub max_height_cm: f64,
}

/// One physical content page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PagePlanEntry {
    Single(PhotoSlot),
    Pair(PhotoSlot, PhotoSlot),
}

impl PagePlanEntry {
    pub fn slots(&self) -> Vec<PhotoSlot> {
        match *self {
            Self::Single(a) => vec![a],
            Self::Pair(a, b) => vec![a, b],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pair(..) => 2,
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Self::Pair(..))
    }
}

/// Group `photos` into pages. An empty list gives an empty plan.
pub fn plan_pages<P: Oriented>(photos: &[P], boxes: BoxHeights) -> Vec<PagePlanEntry> {
    let mut entries = Vec::with_capacity(photos.len());
    let mut next_index: u32 = 1;
    let mut slot = |photo: usize, orientation: Orientation, max_height_cm: f64| {
        let s = PhotoSlot {
            photo,
            display_index: next_index,
            orientation,
            max_height_cm,
        };
        next_index += 1;
        s
    };

    let mut i = 0;
    while i < photos.len() {
        let current = photos[i].orientation();
        let next = photos.get(i + 1).map(Oriented::orientation);

        if current == Orientation::Horizontal && next == Some(Orientation::Horizontal) {
            let first = slot(i, current, boxes.pair_cm);
            let second = slot(i + 1, Orientation::Horizontal, boxes.pair_cm);
            entries.push(PagePlanEntry::Pair(first, second));
            i += 2;
        } else {
            entries.push(PagePlanEntry::Single(slot(i, current, boxes.single_cm)));
            i += 1;
        }
    }

    debug!(
        photos = photos.len(),
        pages = entries.len(),
        pairs = entries.iter().filter(|e| e.is_pair()).count(),
        "Pagination planned"
    );
    entries
}
