use bevy::prelude::*;

use crate::config::LockerConfig;
use crate::registry::{BoxCollection, BoxSize};

// Footprint of the physical lockers: a medium box is 210 wide and 140 tall, a
// large one 210 wide and 290 tall.
pub const M_ASPECT_RATIO: f32 = 140.0 / 210.0;
pub const L_ASPECT_RATIO: f32 = 290.0 / 210.0;

impl BoxSize {
    pub const fn aspect_ratio(self) -> f32 {
        match self {
            Self::M => M_ASPECT_RATIO,
            Self::L => L_ASPECT_RATIO,
        }
    }
}

pub fn tile_height(width: f32, size: BoxSize) -> f32 {
    width * size.aspect_ratio()
}

/// Slot rectangles for every collection position, in window coordinates
/// (origin top-left, y down). Depends on the viewport width and on which size
/// class sits at each position, so it is rebuilt after resizes and swaps.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    viewport_width: f32,
    tile_width: f32,
    slots: Vec<Rect>,
}

impl GridLayout {
    pub fn compute(viewport_width: f32, config: &LockerConfig, collection: &BoxCollection) -> Self {
        let columns = config.columns.max(1);
        let gutters = config.gap * (columns - 1) as f32;
        let tile_width =
            ((viewport_width - 2.0 * config.padding - gutters) / columns as f32).max(0.0);

        let heights: Vec<f32> = collection
            .iter()
            .map(|locker_box| tile_height(tile_width, locker_box.size))
            .collect();

        let mut slots = Vec::with_capacity(heights.len());
        let mut row_top = config.header_height + config.padding;
        for row in heights.chunks(columns) {
            for (column, height) in row.iter().enumerate() {
                let left = (tile_width + config.gap).mul_add(column as f32, config.padding);
                slots.push(Rect::new(left, row_top, left + tile_width, row_top + height));
            }
            let row_height = row.iter().copied().fold(0.0, f32::max);
            row_top += row_height + config.gap;
        }

        Self {
            viewport_width,
            tile_width,
            slots,
        }
    }

    pub fn needs_recompute(&self, viewport_width: f32, collection: &BoxCollection) -> bool {
        (self.viewport_width - viewport_width).abs() > f32::EPSILON
            || self.slots.len() != collection.len()
    }

    pub const fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn slots(&self) -> &[Rect] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<Rect> {
        self.slots.get(index).copied()
    }

    /// First slot containing `point`, in rendering order.
    pub fn slot_at(&self, point: Vec2) -> Option<usize> {
        self.slots.iter().position(|slot| slot.contains(point))
    }
}
