use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{WindowMode, WindowResolution};

#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

// typical smartphone screen ratio (9:16)
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.93, 0.94, 0.95);

// Creates a Bevy app with the window and render settings shared by every
// locker front end, so the grid crate only has to add its own plugins.
pub fn get_default_app(title: &str) -> App {
    let mut app = App::new();

    let resolution = WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution,
            canvas: Some("#locker".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Tells wasm not to override default event handling, like F5, Ctrl+R etc.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL,
            ),
            power_preference: bevy::render::settings::PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(
        DefaultPlugins
            .set(window_plugin)
            .set(render_plugin),
    );

    // This plugin is useful to preserve battery life on mobile.
    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(BACKGROUND_COLOR));

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, handle_browser_resize);

    app
}
