//! Key codes and button events
//!
//! The simulation only sees opaque key codes; the terminal frontend and the
//! GPIO bridge both speak this vocabulary, so a physical button is
//! indistinguishable from the key it is mapped to.

/// Opaque key identifier shared by keyboard and physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Up,
    Down,
}

/// Default bindings: WASD-style for the left player, arrows for the right
pub const LEFT_UP: KeyCode = KeyCode::Char('w');
pub const LEFT_DOWN: KeyCode = KeyCode::Char('s');
pub const RIGHT_UP: KeyCode = KeyCode::Up;
pub const RIGHT_DOWN: KeyCode = KeyCode::Down;

/// (up, down) bindings for the left paddle
pub const LEFT_BUTTONS: (KeyCode, KeyCode) = (LEFT_UP, LEFT_DOWN);
/// (up, down) bindings for the right paddle
pub const RIGHT_BUTTONS: (KeyCode, KeyCode) = (RIGHT_UP, RIGHT_DOWN);

/// Edge of a physical-button signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// A button transition, already mapped onto its key code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub key: KeyCode,
    pub state: ButtonState,
}

impl ButtonEvent {
    pub fn pressed(key: KeyCode) -> Self {
        Self {
            key,
            state: ButtonState::Pressed,
        }
    }

    pub fn released(key: KeyCode) -> Self {
        Self {
            key,
            state: ButtonState::Released,
        }
    }
}
