//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into engine Events.
//
// Architecture:
//   WindowEvent → InputProcessor::translate() → Event → event channel
//
// Stateful modifier tracking: caches the modifier state reported by
// ModifiersChanged and stamps it onto every following key and mouse button
// event. Keys without an engine mapping (F13-F24, media keys) and non-code
// physical keys are filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{Event, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

/// Translates Winit events with sticky modifier tracking.
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Translates one window event. Returns `None` for events scenes never
    /// see (modifier changes, redraws, unmapped keys, ...).
    pub(crate) fn translate(&mut self, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::ModifiersChanged(state) => {
                self.update_modifiers(state.state());
                None
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.process_key(key_event.physical_key, key_event.state)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.process_mouse_button(*button, *state))
            }
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.process_mouse_move(position.x as f32, position.y as f32))
            }
            WindowEvent::Resized(size) => Some(Event::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(true) => Some(Event::FocusGained),
            WindowEvent::Focused(false) => Some(Event::FocusLost),
            WindowEvent::CloseRequested => Some(Event::Closed),
            _ => None,
        }
    }

    /// Converts a physical key transition (filters unmapped keys).
    pub(crate) fn process_key(&self, physical_key: PhysicalKey, state: ElementState) -> Option<Event> {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key, KeyCode::Unidentified) {
            return None;
        }

        Some(match state {
            ElementState::Pressed => Event::KeyDown {
                key,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => Event::KeyUp {
                key,
                modifiers: self.current_modifiers,
            },
        })
    }

    /// Converts a mouse button transition (with modifiers).
    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> Event {
        let button = MouseButton::from(button);

        match state {
            ElementState::Pressed => Event::MouseButtonDown {
                button,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => Event::MouseButtonUp {
                button,
                modifiers: self.current_modifiers,
            },
        }
    }

    /// Creates a mouse move event (window pixels, no modifiers).
    pub(crate) fn process_mouse_move(&self, x: f32, y: f32) -> Event {
        Event::MouseMoved { x, y }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Maps the keys the game binds. Everything else is `Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,

            //--- Function Keys ------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Left/Right/Middle map directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
