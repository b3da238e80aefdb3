//! Pointer interaction state.

use r3form_core::PointerEvent;

/// Hover and press state of a widget, driven by its pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interaction {
    /// Pointer is over the widget.
    pub hovered: bool,
    /// Pointer went down on the widget and has not been released.
    pub pressed: bool,
}

impl Interaction {
    /// Update from a pointer event.
    ///
    /// Leaving the widget also releases a press, since the matching pointer-up
    /// will land somewhere else.
    pub fn apply(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Enter => self.hovered = true,
            PointerEvent::Leave => {
                self.hovered = false;
                self.pressed = false;
            }
            PointerEvent::Down { .. } => self.pressed = true,
            PointerEvent::Up { .. } => self.pressed = false,
            PointerEvent::Click { .. } => {}
        }
    }
}
