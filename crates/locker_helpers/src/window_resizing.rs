use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Logical size of the primary window, or `None` when running headless.
pub fn primary_window_size(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    Some(Vec2::new(window.width(), window.height()))
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(mut primary_query: Query<&mut Window, With<PrimaryWindow>>) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let Ok(inner_width) = wasm_window.inner_width() else {
        return;
    };
    let Ok(inner_height) = wasm_window.inner_height() else {
        return;
    };
    let Some(target_width) = inner_width.as_f64() else {
        return;
    };
    let Some(target_height) = inner_height.as_f64() else {
        return;
    };
    let target_width = target_width as f32;
    let target_height = target_height as f32;

    // wgpu refuses surfaces larger than the maximum texture extent
    const MAX_WIDTH: f32 = 2048.0;
    const MAX_HEIGHT: f32 = 2048.0;

    for mut window in &mut primary_query {
        if (window.resolution.width() - target_width).abs() > f32::EPSILON
            || (window.resolution.height() - target_height).abs() > f32::EPSILON
        {
            let width = target_width.min(MAX_WIDTH);
            let height = target_height.min(MAX_HEIGHT);
            window.resolution.set(width, height);
        }
    }
}
