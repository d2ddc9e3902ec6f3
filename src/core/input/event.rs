//=========================================================================
// Engine Events
//
// Defines the events the frame scheduler hands to the active scene.
//
// This module abstracts away the windowing backend (winit) into a small,
// backend-free vocabulary. Scenes only ever see these types, which keeps
// scene code testable with scripted event batches.
//
// Responsibilities:
// - Represent keyboard, mouse and window events in a portable way
// - Carry modifier state with discrete inputs
// - Identify the close-window request the scheduler intercepts
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    Event (this module)
//         ↓
//    EventSource (per-frame batch)
//         ↓
//    FrameScheduler → Scene::process_event
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, thumb buttons and anything
/// the platform reports that is not one of the three standard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the produced character:
/// `KeyA` is the same key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    /// Fallback for keys the platform layer does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished. On macOS, Command is
/// reported as Ctrl and Option as Alt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// Returns true if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== Event ===============================================================

/// An input or window event delivered to the active scene.
///
/// Events are produced by an [`EventSource`](crate::core::EventSource) in
/// per-frame batches. The scheduler drains the whole batch before the
/// scene's `do_gui` phase runs.
///
/// # Close Requests
///
/// [`Event::Closed`] is intercepted by the scheduler, which raises the
/// termination flag before forwarding the event to the scene. Scenes do
/// not need to (and cannot) opt out of this.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Key pressed down.
    KeyDown { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// Mouse button pressed.
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },

    /// Mouse button released.
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor moved. Coordinates are in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Window resized to the given size in physical pixels.
    Resized { width: u32, height: u32 },

    /// Window gained keyboard focus.
    FocusGained,

    /// Window lost keyboard focus.
    FocusLost,

    /// The user or the OS asked to close the window.
    Closed,

    /// Unrecognized or unsupported event.
    Unidentified,
}

impl Event {
    /// Convenience constructor for an unmodified key press.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE }
    }

    /// Convenience constructor for an unmodified key release.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// Returns true for the close-window request.
    pub fn is_close_request(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true if this is a press of `key`, regardless of modifiers.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        matches!(self, Self::KeyDown { key: k, .. } if *k == key)
    }

    /// Returns the modifier state carried by discrete inputs.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }

    /// Returns the event with its modifier state replaced.
    ///
    /// Has no effect on events that carry no modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        match &mut self {
            Self::KeyDown { modifiers: m, .. }
            | Self::KeyUp { modifiers: m, .. }
            | Self::MouseButtonDown { modifiers: m, .. }
            | Self::MouseButtonUp { modifiers: m, .. } => *m = modifiers,
            _ => {}
        }
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Query Tests
    //=====================================================================

    #[test]
    fn closed_is_close_request() {
        assert!(Event::Closed.is_close_request());
        assert!(!Event::FocusLost.is_close_request());
        assert!(!Event::key_down(KeyCode::Escape).is_close_request());
    }

    #[test]
    fn is_key_pressed_ignores_modifiers() {
        let event = Event::KeyDown { key: KeyCode::Enter, modifiers: Modifiers::SHIFT };
        assert!(event.is_key_pressed(KeyCode::Enter));
        assert!(!event.is_key_pressed(KeyCode::Escape));
    }

    #[test]
    fn is_key_pressed_false_for_release() {
        let event = Event::key_up(KeyCode::Enter);
        assert!(!event.is_key_pressed(KeyCode::Enter), "A release is not a press");
    }

    #[test]
    fn modifiers_only_on_discrete_inputs() {
        assert_eq!(Event::key_down(KeyCode::KeyA).modifiers(), Some(Modifiers::NONE));
        assert_eq!(Event::MouseMoved { x: 1.0, y: 2.0 }.modifiers(), None);
        assert_eq!(Event::Closed.modifiers(), None);
    }

    //=====================================================================
    // with_modifiers Tests
    //=====================================================================

    #[test]
    fn with_modifiers_updates_key_event() {
        let updated = Event::key_down(KeyCode::KeyS).with_modifiers(Modifiers::CTRL);
        assert_eq!(
            updated,
            Event::KeyDown { key: KeyCode::KeyS, modifiers: Modifiers::CTRL }
        );
    }

    #[test]
    fn with_modifiers_updates_mouse_event() {
        let event = Event::MouseButtonUp { button: MouseButton::Left, modifiers: Modifiers::NONE };
        let updated = event.with_modifiers(Modifiers::ALT);
        assert_eq!(updated.modifiers(), Some(Modifiers::ALT));
    }

    #[test]
    fn with_modifiers_ignores_window_events() {
        let event = Event::Resized { width: 640, height: 480 };
        assert_eq!(event.clone().with_modifiers(Modifiers::SHIFT), event);
    }

    //=====================================================================
    // Modifiers Tests
    //=====================================================================

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn modifiers_constants_are_distinct() {
        assert_ne!(Modifiers::SHIFT, Modifiers::CTRL);
        assert_ne!(Modifiers::CTRL, Modifiers::ALT);
        assert!(!Modifiers::ALT.is_empty());
    }
}
