//! Exchange-candidate tracking while a tile is being dragged.
//!
//! On every move the dragged tile's center is compared with the center of
//! every other slot. The closest slot becomes the exchange candidate when it is
//! strictly within the swap threshold. Ties keep the slot that comes first in
//! rendering order, so the same input always yields the same candidate.
//!
//! The dragged tile's own position is never found by distance: it is resolved
//! from the [`BoxId`] attached when the drag started.

use bevy::prelude::*;
use tracing::{debug, warn};

use crate::error::LockerError;
use crate::registry::{BoxCollection, BoxId};

pub fn center_distance(a: Rect, b: Rect) -> f32 {
    a.center().distance(b.center())
}

/// Closest slot to `dragged` other than `dragged_index`, with its distance.
pub fn nearest_sibling(dragged: Rect, dragged_index: usize, slots: &[Rect]) -> Option<(usize, f32)> {
    slots
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != dragged_index)
        .map(|(index, slot)| (index, center_distance(dragged, *slot)))
        .fold(None, |best, (index, distance)| match best {
            // strict comparison keeps the first of equally close slots
            Some((_, best_distance)) if distance >= best_distance => best,
            _ => Some((index, distance)),
        })
}

pub fn exchange_candidate(
    dragged: Rect,
    dragged_index: usize,
    slots: &[Rect],
    threshold: f32,
) -> Option<usize> {
    nearest_sibling(dragged, dragged_index, slots)
        .filter(|&(_, distance)| distance < threshold)
        .map(|(index, _)| index)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum DragPhase {
    #[default]
    Idle,
    Dragging(BoxId),
}

/// State of the gesture in progress. Cleared at every drag start and end.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct DragSession {
    phase: DragPhase,
    dragged: Option<usize>,
    candidate: Option<usize>,
}

impl DragSession {
    pub fn begin(&mut self, id: BoxId) {
        debug!(%id, "drag started");
        self.phase = DragPhase::Dragging(id);
        self.dragged = None;
        self.candidate = None;
    }

    /// Updates the dragged and candidate positions for one move event.
    ///
    /// `dragged` is where the tile currently is on screen; `slots` are the
    /// pre-drag slot rectangles of every tile, the dragged one included.
    pub fn track(
        &mut self,
        collection: &BoxCollection,
        dragged: Rect,
        slots: &[Rect],
        threshold: f32,
    ) -> Result<(), LockerError> {
        let DragPhase::Dragging(id) = self.phase else {
            return Err(LockerError::DegenerateDrag);
        };

        let Some(dragged_index) = collection.position_of(id) else {
            warn!(%id, "dragged box is not in the collection");
            self.dragged = None;
            self.candidate = None;
            return Ok(());
        };

        self.dragged = Some(dragged_index);
        let candidate = exchange_candidate(dragged, dragged_index, slots, threshold);
        if candidate != self.candidate {
            debug!(?candidate, dragged = dragged_index, "exchange candidate changed");
        }
        self.candidate = candidate;
        Ok(())
    }

    /// Hands out the tentative positions and returns to idle.
    pub(crate) fn take(&mut self) -> (Option<usize>, Option<usize>) {
        let positions = (self.dragged.take(), self.candidate.take());
        self.phase = DragPhase::Idle;
        positions
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub const fn dragged_id(&self) -> Option<BoxId> {
        match self.phase {
            DragPhase::Dragging(id) => Some(id),
            DragPhase::Idle => None,
        }
    }

    pub const fn dragged_position(&self) -> Option<usize> {
        self.dragged
    }

    pub const fn candidate_position(&self) -> Option<usize> {
        self.candidate
    }

    pub fn is_candidate(&self, index: usize) -> bool {
        self.candidate == Some(index)
    }
}
