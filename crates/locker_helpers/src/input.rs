use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        let cursor_position = windows.get_single().ok()?.cursor_position()?;
        Some(cursor_position)
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

/// Position of the pointer while the left button (or a finger) is held down.
pub fn held_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Option<Vec2> {
    if button_input.pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        touch_input.iter().next().map(|touch| touch.position())
    }
}

/// The cursor can leave the window while the button is held, in which case
/// there is no position to report but the gesture still ended.
pub fn just_released(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
) -> bool {
    button_input.just_released(MouseButton::Left) || touch_input.any_just_released()
}

/// True when the host environment aborted the current gesture.
pub fn just_canceled(keys: &Res<ButtonInput<KeyCode>>, touch_input: &Res<Touches>) -> bool {
    keys.just_pressed(KeyCode::Escape) || touch_input.any_just_canceled()
}

/// Maps a window position (origin top-left, y down) to the world space of a
/// default `Camera2d` sitting at the origin (origin centered, y up).
pub fn screen_to_world(screen: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(screen.x - viewport.x / 2.0, viewport.y / 2.0 - screen.y)
}
