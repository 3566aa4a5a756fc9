use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use locker_helpers::{input, primary_window_size};

use crate::config::LockerConfig;
use crate::drag::PointerDrag;
use crate::layout::GridLayout;
use crate::proximity::DragSession;
use crate::registry::{BoxCollection, BoxId, BoxStatus};
use crate::view::{TileView, frame_view};

const TILE_COLOR: Color = Color::WHITE;
const CANDIDATE_COLOR: Color = Color::srgb(0.78, 0.88, 1.0);
const NUMBER_COLOR: Color = Color::srgb(0.15, 0.15, 0.15);
const VERIFYING_COLOR: Color = Color::srgb(0.925, 0.702, 0.227);
const COMPLETE_COLOR: Color = Color::srgb(0.059, 0.729, 0.506);

const DRAGGED_Z: f32 = 100.0;
const DRAGGED_ALPHA: f32 = 0.85;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: BoxId,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLabel {
    Number,
    Status,
}

impl TileLabel {
    // number in the upper half of the tile, status badge in the lower half
    fn offset(self, tile_height: f32) -> Vec2 {
        match self {
            Self::Number => Vec2::new(0.0, tile_height / 6.0),
            Self::Status => Vec2::new(0.0, -tile_height / 4.0),
        }
    }
}

fn status_color(status: &BoxStatus) -> Color {
    match status {
        BoxStatus::Verifying { .. } => VERIFYING_COLOR,
        BoxStatus::Complete => COMPLETE_COLOR,
        BoxStatus::Unassigned | BoxStatus::Other(_) => NUMBER_COLOR,
    }
}

fn tile_color(view: &TileView<'_>) -> Color {
    let color = if view.is_candidate {
        CANDIDATE_COLOR
    } else {
        TILE_COLOR
    };
    if view.is_dragged {
        color.with_alpha(DRAGGED_ALPHA)
    } else {
        color
    }
}

pub fn spawn_header(mut commands: Commands, config: Res<LockerConfig>) {
    commands.spawn((
        Text::new(config.title.clone()),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(NUMBER_COLOR),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            width: Val::Percent(100.0),
            ..default()
        },
    ));
}

pub fn spawn_tiles(mut commands: Commands, collection: Res<BoxCollection>) {
    for locker_box in collection.iter() {
        commands
            .spawn((
                Tile {
                    id: locker_box.id(),
                },
                Sprite::from_color(TILE_COLOR, Vec2::ONE),
                Transform::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    TileLabel::Number,
                    Text2d::new(locker_box.number.clone()),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(NUMBER_COLOR),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                ));
                parent.spawn((
                    TileLabel::Status,
                    Text2d::new(locker_box.status.to_string()),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(status_color(&locker_box.status)),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                ));
            });
    }
    info!("Spawned {} locker tiles", collection.len());
}

/// Rebuilds the slot rectangles when the window width or the order changes.
pub fn sync_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<LockerConfig>,
    collection: Res<BoxCollection>,
    mut layout: ResMut<GridLayout>,
) {
    let Some(viewport) = primary_window_size(&windows) else {
        return;
    };
    if collection.is_changed()
        || config.is_changed()
        || layout.needs_recompute(viewport.x, &collection)
    {
        *layout = GridLayout::compute(viewport.x, &config, &collection);
        debug!(
            "Grid layout recomputed for width {} ({} slots)",
            viewport.x,
            layout.slots().len()
        );
    }
}

pub fn render_tiles(
    windows: Query<&Window, With<PrimaryWindow>>,
    collection: Res<BoxCollection>,
    layout: Res<GridLayout>,
    session: Res<DragSession>,
    pointer: Res<PointerDrag>,
    mut tiles: Query<(&Tile, &mut Transform, &mut Sprite, &Children)>,
    mut labels: Query<(&TileLabel, &mut Transform), Without<Tile>>,
) {
    let Some(viewport) = primary_window_size(&windows) else {
        return;
    };
    let views = frame_view(&collection, &layout, &session);

    for (tile, mut transform, mut sprite, children) in &mut tiles {
        let Some(view) = views.iter().find(|view| view.tile.id() == tile.id) else {
            warn!("Tile {} has no slot in the layout", tile.id);
            continue;
        };

        let (offset, z) = if view.is_dragged {
            (pointer.offset, DRAGGED_Z)
        } else {
            (Vec2::ZERO, 0.0)
        };
        let center = input::screen_to_world(view.slot.center() + offset, viewport);
        transform.translation = center.extend(z);
        sprite.custom_size = Some(view.slot.size());
        sprite.color = tile_color(view);

        for &child in children {
            if let Ok((label, mut label_transform)) = labels.get_mut(child) {
                label_transform.translation = label.offset(view.height).extend(1.0);
            }
        }
    }
}
