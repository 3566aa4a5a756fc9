use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowFocused};
use locker_helpers::input;

use crate::config::LockerConfig;
use crate::layout::GridLayout;
use crate::proximity::DragSession;
use crate::registry::{BoxCollection, BoxId, LockerBox};
use crate::swap::{DragOutcome, cancel_drag, finish_drag};

/// Pointer gestures translated into tile terms. The id picked at drag start is
/// carried by every move so the tracker never has to guess which tile moves.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Started { id: BoxId },
    /// `offset` is the pointer displacement since the drag started, in window units.
    Moved { id: BoxId, offset: Vec2 },
    Released,
    Canceled,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragFinished(pub DragOutcome);

/// Where the pointer grabbed the tile, and how far it has moved since.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerDrag {
    pub id: Option<BoxId>,
    pub origin: Vec2,
    pub offset: Vec2,
}

pub fn read_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touch_input: Res<Touches>,
    mut focus_events: EventReader<WindowFocused>,
    layout: Res<GridLayout>,
    collection: Res<BoxCollection>,
    mut pointer: ResMut<PointerDrag>,
    mut drag_events: EventWriter<DragEvent>,
) {
    let focus_lost = focus_events.read().any(|event| !event.focused);

    if pointer.id.is_some() && (focus_lost || input::just_canceled(&keys, &touch_input)) {
        *pointer = PointerDrag::default();
        drag_events.send(DragEvent::Canceled);
        return;
    }

    // a second finger landing mid-drag does not start another drag
    let pressed = if pointer.id.is_none() {
        input::just_pressed_screen_position(&buttons, &touch_input, &windows)
    } else {
        None
    };
    if let Some(position) = pressed {
        let grabbed = layout
            .slot_at(position)
            .and_then(|index| collection.get(index))
            .map(LockerBox::id);
        if let Some(id) = grabbed {
            *pointer = PointerDrag {
                id: Some(id),
                origin: position,
                offset: Vec2::ZERO,
            };
            drag_events.send(DragEvent::Started { id });
        }
    }

    // a tap can press and release within one frame, so a fresh drag falls
    // through to the release check
    let Some(id) = pointer.id else {
        return;
    };

    if input::just_released(&buttons, &touch_input) {
        *pointer = PointerDrag::default();
        drag_events.send(DragEvent::Released);
        return;
    }

    if let Some(position) = input::held_screen_position(&buttons, &touch_input, &windows) {
        let offset = position - pointer.origin;
        if offset != pointer.offset {
            pointer.offset = offset;
            drag_events.send(DragEvent::Moved { id, offset });
        }
    }
}

/// Feeds drag events, in delivery order, through the tracker and the committer.
pub fn apply_drag_events(
    mut drag_events: EventReader<DragEvent>,
    config: Res<LockerConfig>,
    layout: Res<GridLayout>,
    mut collection: ResMut<BoxCollection>,
    mut session: ResMut<DragSession>,
    mut finished: EventWriter<DragFinished>,
) {
    for event in drag_events.read() {
        match *event {
            DragEvent::Started { id } => session.begin(id),
            DragEvent::Moved { id, offset } => {
                if session.dragged_id() != Some(id) {
                    warn!("Ignoring move of {id}, it is not the tile being dragged");
                    continue;
                }
                let Some(slot) = collection
                    .position_of(id)
                    .and_then(|index| layout.slot(index))
                else {
                    warn!("No slot for dragged tile {id}");
                    continue;
                };
                let dragged = Rect::from_center_size(slot.center() + offset, slot.size());
                if let Err(err) =
                    session.track(&collection, dragged, layout.slots(), config.swap_threshold)
                {
                    warn!("{err}");
                }
            }
            DragEvent::Released => {
                let outcome = finish_drag(&mut session, collection.bypass_change_detection());
                if let DragOutcome::Swapped { from, to } = outcome {
                    info!("Swapped tiles at positions {from} and {to}");
                    collection.set_changed();
                }
                finished.send(DragFinished(outcome));
            }
            DragEvent::Canceled => {
                finished.send(DragFinished(cancel_drag(&mut session)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::abc;

    // Three 100-wide tiles whose centers sit 120 units apart.
    fn app() -> App {
        let collection = abc();
        let config = LockerConfig {
            columns: 3,
            gap: 20.0,
            padding: 10.0,
            header_height: 0.0,
            ..LockerConfig::default()
        };
        let layout = GridLayout::compute(360.0, &config, &collection);

        let mut app = App::new();
        app.insert_resource(collection)
            .insert_resource(layout)
            .insert_resource(config)
            .init_resource::<DragSession>()
            .add_event::<DragEvent>()
            .add_event::<DragFinished>()
            .add_systems(Update, apply_drag_events);
        app
    }

    fn id_at(app: &App, index: usize) -> BoxId {
        app.world()
            .resource::<BoxCollection>()
            .get(index)
            .expect("box exists")
            .id()
    }

    fn numbers(app: &App) -> Vec<String> {
        app.world()
            .resource::<BoxCollection>()
            .iter()
            .map(|b| b.number.clone())
            .collect()
    }

    fn outcomes(app: &App) -> Vec<DragOutcome> {
        app.world()
            .resource::<Events<DragFinished>>()
            .iter_current_update_events()
            .map(|finished| finished.0)
            .collect()
    }

    fn send(app: &mut App, event: DragEvent) {
        app.world_mut().send_event(event);
    }

    #[test]
    fn drag_a_onto_b_then_release() {
        let mut app = app();
        let a = id_at(&app, 0);

        send(&mut app, DragEvent::Started { id: a });
        send(
            &mut app,
            DragEvent::Moved {
                id: a,
                offset: Vec2::new(120.0, 0.0),
            },
        );
        app.update();
        let session = app.world().resource::<DragSession>();
        assert_eq!(session.dragged_position(), Some(0), "A is dragged");
        assert_eq!(session.candidate_position(), Some(1), "over B");

        send(&mut app, DragEvent::Released);
        app.update();
        assert_eq!(numbers(&app), ["B", "A", "C"], "A and B swapped");
        assert_eq!(
            outcomes(&app),
            [DragOutcome::Swapped { from: 0, to: 1 }],
            "swap reported"
        );
        assert_eq!(
            *app.world().resource::<DragSession>(),
            DragSession::default(),
            "session cleared"
        );
    }

    #[test]
    fn moving_away_before_release_keeps_the_order() {
        let mut app = app();
        let a = id_at(&app, 0);

        send(&mut app, DragEvent::Started { id: a });
        send(
            &mut app,
            DragEvent::Moved {
                id: a,
                offset: Vec2::new(120.0, 0.0),
            },
        );
        send(
            &mut app,
            DragEvent::Moved {
                id: a,
                offset: Vec2::new(120.0, 200.0),
            },
        );
        send(&mut app, DragEvent::Released);
        app.update();

        assert_eq!(numbers(&app), ["A", "B", "C"], "order kept");
        assert_eq!(outcomes(&app), [DragOutcome::Unchanged], "no swap");
    }

    #[test]
    fn cancel_discards_the_candidate() {
        let mut app = app();
        let c = id_at(&app, 2);

        send(&mut app, DragEvent::Started { id: c });
        send(
            &mut app,
            DragEvent::Moved {
                id: c,
                offset: Vec2::new(-120.0, 0.0),
            },
        );
        send(&mut app, DragEvent::Canceled);
        app.update();

        assert_eq!(numbers(&app), ["A", "B", "C"], "order kept");
        assert_eq!(outcomes(&app), [DragOutcome::Unchanged], "canceled");
    }

    #[test]
    fn release_without_start_is_ignored() {
        let mut app = app();
        send(&mut app, DragEvent::Released);
        app.update();
        assert_eq!(numbers(&app), ["A", "B", "C"], "order kept");
        assert_eq!(outcomes(&app), [DragOutcome::Degenerate], "nothing to commit");
    }

    #[test]
    fn moves_of_another_tile_are_ignored() {
        let mut app = app();
        let a = id_at(&app, 0);
        let b = id_at(&app, 1);

        send(&mut app, DragEvent::Started { id: a });
        send(
            &mut app,
            DragEvent::Moved {
                id: b,
                offset: Vec2::new(-120.0, 0.0),
            },
        );
        app.update();
        let session = app.world().resource::<DragSession>();
        assert_eq!(session.candidate_position(), None, "stray move not tracked");
        assert!(session.is_dragging(), "A is still being dragged");
    }

    // Pointer-driven app: cursor positions are in window units, and the tiles
    // sit at x 10..110, 130..230 and 250..350 with y 10..76.
    fn pointer_app() -> App {
        let mut app = app();
        app.init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Touches>()
            .init_resource::<PointerDrag>()
            .add_event::<WindowFocused>()
            .add_systems(Update, read_pointer.before(apply_drag_events));
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        app
    }

    fn primary_window(app: &mut App) -> Entity {
        let world = app.world_mut();
        let mut windows = world.query_filtered::<Entity, With<PrimaryWindow>>();
        windows.single(world)
    }

    fn set_cursor(app: &mut App, position: Vec2) {
        let world = app.world_mut();
        let mut windows = world.query_filtered::<&mut Window, With<PrimaryWindow>>();
        windows
            .single_mut(world)
            .set_cursor_position(Some(position));
    }

    fn mouse(app: &mut App) -> Mut<'_, ButtonInput<MouseButton>> {
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>()
    }

    // Runs one frame and returns the drag events it produced. Input state is
    // cleared afterwards the way the input plugin does between frames.
    fn frame(app: &mut App) -> Vec<DragEvent> {
        app.update();
        let events = app
            .world()
            .resource::<Events<DragEvent>>()
            .iter_current_update_events()
            .copied()
            .collect();
        mouse(app).clear();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        events
    }

    fn grab(app: &mut App, position: Vec2) -> Vec<DragEvent> {
        set_cursor(app, position);
        mouse(app).press(MouseButton::Left);
        frame(app)
    }

    const OVER_A: Vec2 = Vec2::new(60.0, 40.0);
    const OVER_B: Vec2 = Vec2::new(180.0, 40.0);
    const OVER_C: Vec2 = Vec2::new(300.0, 40.0);

    #[test]
    fn tap_ends_the_drag_it_started() {
        let mut app = pointer_app();
        let a = id_at(&app, 0);
        let b = id_at(&app, 1);

        set_cursor(&mut app, OVER_A);
        mouse(&mut app).press(MouseButton::Left);
        mouse(&mut app).release(MouseButton::Left);
        assert_eq!(
            frame(&mut app),
            [DragEvent::Started { id: a }, DragEvent::Released],
            "press and release in one frame"
        );
        assert_eq!(
            *app.world().resource::<PointerDrag>(),
            PointerDrag::default(),
            "pointer released"
        );
        assert!(
            !app.world().resource::<DragSession>().is_dragging(),
            "session back to idle"
        );

        assert_eq!(
            grab(&mut app, OVER_B),
            [DragEvent::Started { id: b }],
            "the next press grabs B"
        );
        set_cursor(&mut app, OVER_C);
        assert_eq!(
            frame(&mut app),
            [DragEvent::Moved {
                id: b,
                offset: Vec2::new(120.0, 0.0)
            }],
            "B follows the pointer"
        );
        mouse(&mut app).release(MouseButton::Left);
        assert_eq!(frame(&mut app), [DragEvent::Released], "dropped on C");
        assert_eq!(numbers(&app), ["A", "C", "B"], "B and C swapped");
    }

    #[test]
    fn press_between_tiles_starts_nothing() {
        let mut app = pointer_app();
        assert!(
            grab(&mut app, Vec2::new(120.0, 40.0)).is_empty(),
            "no tile under the gap"
        );
        assert_eq!(app.world().resource::<PointerDrag>().id, None, "still idle");
    }

    #[test]
    fn second_press_mid_drag_keeps_the_first_tile() {
        let mut app = pointer_app();
        let a = id_at(&app, 0);
        grab(&mut app, OVER_A);

        // a fresh press while the drag is live, without a release in between
        mouse(&mut app).reset(MouseButton::Left);
        assert_eq!(
            grab(&mut app, OVER_B),
            [DragEvent::Moved {
                id: a,
                offset: Vec2::new(120.0, 0.0)
            }],
            "A keeps moving"
        );
        assert_eq!(
            app.world().resource::<PointerDrag>().id,
            Some(a),
            "A is still grabbed"
        );
    }

    #[test]
    fn escape_cancels_the_drag() {
        let mut app = pointer_app();
        grab(&mut app, OVER_A);
        set_cursor(&mut app, OVER_B);
        frame(&mut app);
        assert_eq!(
            app.world().resource::<DragSession>().candidate_position(),
            Some(1),
            "over B"
        );

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        assert_eq!(frame(&mut app), [DragEvent::Canceled], "escape");
        assert_eq!(outcomes(&app), [DragOutcome::Unchanged], "nothing swapped");
        assert_eq!(numbers(&app), ["A", "B", "C"], "order kept");

        mouse(&mut app).release(MouseButton::Left);
        assert!(frame(&mut app).is_empty(), "the late release is dropped");
        assert_eq!(numbers(&app), ["A", "B", "C"], "still no swap");
    }

    #[test]
    fn losing_focus_cancels_the_drag() {
        let mut app = pointer_app();
        grab(&mut app, OVER_C);
        set_cursor(&mut app, OVER_B);
        frame(&mut app);

        let window = primary_window(&mut app);
        app.world_mut().send_event(WindowFocused {
            window,
            focused: false,
        });
        assert_eq!(frame(&mut app), [DragEvent::Canceled], "focus lost");
        assert_eq!(
            *app.world().resource::<PointerDrag>(),
            PointerDrag::default(),
            "pointer reset"
        );
        assert_eq!(numbers(&app), ["A", "B", "C"], "order kept");
    }

    #[test]
    fn cancel_sources_are_ignored_while_idle() {
        let mut app = pointer_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        let window = primary_window(&mut app);
        app.world_mut().send_event(WindowFocused {
            window,
            focused: false,
        });
        assert!(frame(&mut app).is_empty(), "no drag to cancel");
        assert!(outcomes(&app).is_empty(), "nothing finished");
    }
}
