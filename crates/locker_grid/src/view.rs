use bevy::prelude::*;

use crate::layout::GridLayout;
use crate::proximity::DragSession;
use crate::registry::{BoxCollection, LockerBox};

/// Everything the renderer needs to draw one tile for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView<'a> {
    pub index: usize,
    pub tile: &'a LockerBox,
    pub slot: Rect,
    pub height: f32,
    pub is_candidate: bool,
    pub is_dragged: bool,
}

/// Pure projection of the current state; rendering it twice without a drag
/// in between gives the same positions and heights.
pub fn frame_view<'a>(
    collection: &'a BoxCollection,
    layout: &GridLayout,
    session: &DragSession,
) -> Vec<TileView<'a>> {
    collection
        .iter()
        .zip(layout.slots())
        .enumerate()
        .map(|(index, (tile, slot))| TileView {
            index,
            tile,
            slot: *slot,
            height: slot.height(),
            is_candidate: session.is_candidate(index),
            is_dragged: session.dragged_id() == Some(tile.id()),
        })
        .collect()
}
