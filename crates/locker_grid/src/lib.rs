use bevy::prelude::*;

mod config;
mod drag;
mod error;
mod layout;
mod proximity;
mod registry;
mod swap;
mod tiles;
mod view;

pub use config::{DEFAULT_BOX_DATA, LockerConfig, parse_box_data};
pub use drag::{DragEvent, DragFinished, PointerDrag};
pub use error::LockerError;
pub use layout::{GridLayout, L_ASPECT_RATIO, M_ASPECT_RATIO, tile_height};
pub use proximity::{DragSession, center_distance, exchange_candidate, nearest_sibling};
pub use registry::{BoxCollection, BoxId, BoxSize, BoxStatus, LockerBox, RawBox};
pub use swap::{DragOutcome, cancel_drag, finish_drag};
pub use view::{TileView, frame_view};

/// Entry point for the locker grid
pub fn run() {
    let config = LockerConfig::default();
    locker_helpers::get_default_app(&config.title)
        .insert_resource(config)
        .add_plugins(LockerGridPlugin)
        .run();
}

pub struct LockerGridPlugin;

impl Plugin for LockerGridPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LockerConfig>()
            .insert_resource(load_collection(DEFAULT_BOX_DATA))
            .init_resource::<GridLayout>()
            .init_resource::<DragSession>()
            .init_resource::<PointerDrag>()
            .add_event::<DragEvent>()
            .add_event::<DragFinished>()
            .add_systems(
                Startup,
                (setup_camera, tiles::spawn_header, tiles::spawn_tiles),
            )
            .add_systems(
                Update,
                (
                    drag::read_pointer,
                    drag::apply_drag_events,
                    tiles::sync_layout,
                    tiles::render_tiles,
                )
                    .chain(),
            );
    }
}

/// Parses box records and assigns ids. Bad data leaves the grid empty rather
/// than aborting the app.
pub fn load_collection(json: &str) -> BoxCollection {
    match parse_box_data(json) {
        Ok(raw_boxes) => BoxCollection::load(raw_boxes),
        Err(err) => {
            error!("{err}");
            BoxCollection::default()
        }
    }
}

/// Sets up the main 2D camera
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
