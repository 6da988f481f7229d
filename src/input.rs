//! Pointer routing from window events to the scene.
//!
//! Only presses that land on the scan button reach the scanner. Dragging a
//! held press off the button counts as a pointer-leave, and a touch acts as
//! the primary pointer while it is the first one down.

use glam::Vec2;
use winit::event::{MouseButton, TouchPhase};

use crate::feedback::Feedback;
use crate::rendering::Layout;
use crate::scan::Button;
use crate::scene::Scene;

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Button::Primary,
            MouseButton::Right => Button::Secondary,
            MouseButton::Middle => Button::Middle,
            _ => Button::Other,
        }
    }
}

/// Cursor and touch tracking, in logical pixels
#[derive(Debug, Default)]
pub struct PointerRouter {
    cursor: Option<Vec2>,
    touch_id: Option<u64>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn moved(&mut self, point: Vec2, layout: &Layout, scene: &mut Scene) {
        let was_over = self.cursor.is_some_and(|p| layout.in_button(p));
        self.cursor = Some(point);
        if was_over && !layout.in_button(point) {
            scene.pointer_leave();
        }
    }

    /// Cursor left the window
    pub fn left(&mut self, scene: &mut Scene) {
        self.cursor = None;
        scene.pointer_leave();
    }

    pub fn pressed(
        &mut self,
        button: Button,
        layout: &Layout,
        scene: &mut Scene,
        fx: &mut dyn Feedback,
    ) {
        if self.cursor.is_some_and(|p| layout.in_button(p)) {
            scene.pointer_down(button, fx);
        }
    }

    /// Only a primary release ends a press
    pub fn released(&mut self, button: Button, scene: &mut Scene) {
        if button == Button::Primary {
            scene.pointer_up();
        }
    }

    /// The first touch down drives the pointer until it lifts
    pub fn touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        point: Vec2,
        layout: &Layout,
        scene: &mut Scene,
        fx: &mut dyn Feedback,
    ) {
        match phase {
            TouchPhase::Started if self.touch_id.is_none() => {
                self.touch_id = Some(id);
                self.cursor = Some(point);
                self.pressed(Button::Primary, layout, scene, fx);
            }
            TouchPhase::Moved if self.touch_id == Some(id) => self.moved(point, layout, scene),
            TouchPhase::Ended | TouchPhase::Cancelled if self.touch_id == Some(id) => {
                self.touch_id = None;
                self.cursor = None;
                scene.pointer_up();
            }
            _ => {}
        }
    }
}
