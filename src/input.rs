//! Pointer state tracking.
//!
//! The engine never talks to pointer hardware. Host glue translates raw
//! mouse/touch activity into `PointerEvent` values and delivers them on the
//! same single-threaded queue that runs ticks, so every tick observes a
//! fully updated `Cursor` and never a torn one. The cursor is written only
//! here; physics and animation code read it.

use crate::geom::Vec2;

/// One pointer event in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved to a new position.
    Moved { x: f64, y: f64 },
    /// The pointer entered the interactive surface.
    Entered,
    /// The pointer left the surface. Also releases the button: a drag
    /// cannot survive leaving.
    Left,
    /// The primary button was pressed.
    ButtonDown,
    /// The primary button was released.
    ButtonUp,
}

/// Latest known pointer state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    position: Vec2,
    present: bool,
    button_down: bool,
}

impl Cursor {
    /// Cursor at the surface origin, absent, button up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported pointer position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the pointer is over the interactive surface.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Whether the primary button is held.
    #[inline]
    pub fn is_button_down(&self) -> bool {
        self.button_down
    }

    /// Fold one event into the state.
    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Moved { x, y } => self.position = Vec2::new(x, y),
            PointerEvent::Entered => self.present = true,
            PointerEvent::Left => {
                self.present = false;
                self.button_down = false;
            }
            PointerEvent::ButtonDown => self.button_down = true,
            PointerEvent::ButtonUp => self.button_down = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let cursor = Cursor::new();
        assert_eq!(cursor.position(), Vec2::ZERO);
        assert!(!cursor.is_present());
        assert!(!cursor.is_button_down());
    }

    #[test]
    fn test_move_updates_position() {
        let mut cursor = Cursor::new();
        cursor.apply(PointerEvent::Moved { x: 12.5, y: -3.0 });
        assert_eq!(cursor.position(), Vec2::new(12.5, -3.0));
    }

    #[test]
    fn test_enter_and_leave() {
        let mut cursor = Cursor::new();
        cursor.apply(PointerEvent::Entered);
        assert!(cursor.is_present());

        cursor.apply(PointerEvent::Left);
        assert!(!cursor.is_present());
    }

    #[test]
    fn test_leave_releases_button() {
        let mut cursor = Cursor::new();
        cursor.apply(PointerEvent::Entered);
        cursor.apply(PointerEvent::ButtonDown);
        assert!(cursor.is_button_down());

        cursor.apply(PointerEvent::Left);
        assert!(!cursor.is_button_down());
    }

    #[test]
    fn test_button_toggling() {
        let mut cursor = Cursor::new();
        cursor.apply(PointerEvent::ButtonDown);
        assert!(cursor.is_button_down());

        cursor.apply(PointerEvent::ButtonUp);
        assert!(!cursor.is_button_down());
    }
}
