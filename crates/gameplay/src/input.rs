// Input Bridge: pointer/touch -> horizontal movement of the held fruit.
// Device sampling (`read_pointer`) is separated from gesture handling (`handle_gestures`)
// so mouse, touch and tests all go through the same `PointerGesture` events.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use fm_core::{FieldGeometry, FruitRadius, GameSession, Held};

use crate::drop::DropRequested;

/// One step of a press/move/release gesture. `x` is in field coordinates.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    Pressed { x: f32 },
    Moved { x: f32 },
    Released,
    Canceled,
}

#[derive(Default)]
pub(crate) struct GestureTracker {
    active: bool,
    last_x: Option<f32>,
}

/// What the devices reported this frame.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PointerSample {
    pub pressed: bool,
    pub released: bool,
    pub canceled: bool,
    pub over_ui: bool,
    /// Pointer position in field coordinates, if it could be resolved.
    pub x: Option<f32>,
}

impl GestureTracker {
    /// Advance the gesture with one frame of input. A press and release in the
    /// same frame yield both `Pressed` and `Released`.
    pub(crate) fn step(&mut self, sample: PointerSample, mut emit: impl FnMut(PointerGesture)) {
        if sample.pressed && !self.active {
            if sample.over_ui {
                return;
            }
            let Some(x) = sample.x else {
                return;
            };
            self.active = true;
            self.last_x = Some(x);
            emit(PointerGesture::Pressed { x });
        }
        if !self.active {
            return;
        }
        if sample.canceled {
            *self = Self::default();
            emit(PointerGesture::Canceled);
            return;
        }
        if let Some(x) = sample.x {
            if self.last_x != Some(x) {
                self.last_x = Some(x);
                emit(PointerGesture::Moved { x });
            }
        }
        if sample.released {
            *self = Self::default();
            emit(PointerGesture::Released);
        }
    }
}

/// Convert a window position (top-left origin, logical pixels) to world coordinates.
fn cursor_world_pos(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().find(|(c, _)| c.is_active)?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

/// Screen position of the first active touch, or of the one lifted this frame.
fn touch_screen_pos(touches: &Touches) -> Option<Vec2> {
    touches
        .iter()
        .next()
        .or_else(|| touches.iter_just_released().next())
        .map(|t| t.position())
}

/// First touch if present, else the mouse cursor.
fn primary_pointer_world_pos(
    window: &Window,
    touches: Option<&Touches>,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    if let Some(pos) = touches.and_then(touch_screen_pos) {
        return cursor_world_pos(camera_q, pos);
    }
    cursor_world_pos(camera_q, window.cursor_position()?)
}

/// Sample mouse and touch input into gesture events.
pub(crate) fn read_pointer(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    ui: Query<&Interaction>,
    field: Res<FieldGeometry>,
    mut tracker: Local<GestureTracker>,
    mut out: EventWriter<PointerGesture>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let touches = touches.as_deref();
    let mouse = buttons.as_deref();

    let sample = PointerSample {
        pressed: mouse.is_some_and(|b| b.just_pressed(MouseButton::Left))
            || touches.is_some_and(|t| t.iter_just_pressed().next().is_some()),
        released: mouse.is_some_and(|b| b.just_released(MouseButton::Left))
            || touches.is_some_and(|t| t.iter_just_released().next().is_some()),
        canceled: touches.is_some_and(|t| t.iter_just_canceled().next().is_some()),
        over_ui: ui.iter().any(|i| *i != Interaction::None),
        x: primary_pointer_world_pos(window, touches, &camera_q).map(|p| field.world_x_to_field(p.x)),
    };
    tracker.step(sample, |g| {
        out.write(g);
    });
}

/// Clamp `field_x` for the held fruit and move it there, keeping its height.
fn steer_held(
    field: &FieldGeometry,
    held_q: &mut Query<(&mut Transform, &FruitRadius), With<Held>>,
    field_x: f32,
) {
    for (mut tf, radius) in held_q.iter_mut() {
        let x = field.clamp_x(field_x, radius.0);
        tf.translation.x = field.field_x_to_world(x);
    }
}

pub(crate) fn handle_gestures(
    mut gestures: EventReader<PointerGesture>,
    mut session: ResMut<GameSession>,
    field: Res<FieldGeometry>,
    mut held_q: Query<(&mut Transform, &FruitRadius), With<Held>>,
    mut drops: EventWriter<DropRequested>,
) {
    for gesture in gestures.read() {
        match *gesture {
            PointerGesture::Pressed { x } => {
                if session.press() {
                    steer_held(&field, &mut held_q, x);
                }
            }
            PointerGesture::Moved { x } => {
                if session.can_steer() {
                    steer_held(&field, &mut held_q, x);
                }
            }
            PointerGesture::Released => {
                if session.release() {
                    drops.write(DropRequested);
                }
            }
            PointerGesture::Canceled => session.cancel(),
        }
    }
}
