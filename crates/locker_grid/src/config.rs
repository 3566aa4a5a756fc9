use bevy::prelude::*;
use serde::Deserialize;

use crate::error::LockerError;
use crate::registry::RawBox;

/// Box data shipped with the application.
pub const DEFAULT_BOX_DATA: &str = include_str!("../assets/boxes.json");

/// Tunables for the grid and the drag-to-swap behaviour.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LockerConfig {
    pub title: String,
    /// A sibling becomes the exchange candidate when its center is strictly
    /// closer than this to the dragged tile's center, in window units.
    pub swap_threshold: f32,
    pub columns: usize,
    pub gap: f32,
    pub padding: f32,
    pub header_height: f32,
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            title: "东门 Locker".to_string(),
            swap_threshold: 80.0,
            columns: 3,
            gap: 8.0,
            padding: 12.0,
            header_height: 56.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BoxData {
    boxes: Vec<RawBox>,
}

pub fn parse_box_data(json: &str) -> Result<Vec<RawBox>, LockerError> {
    let data: BoxData = serde_json::from_str(json)?;
    Ok(data.boxes)
}
