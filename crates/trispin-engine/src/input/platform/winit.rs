use winit::event::{ElementState, KeyEvent as WinitKeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{Key, KeyEvent, KeyState};

/// Translates a winit keyboard event into an engine `KeyEvent`.
pub fn translate_key_event(event: &WinitKeyEvent) -> KeyEvent {
    KeyEvent::new(map_key(event.physical_key), map_key_state(event.state))
}

pub fn map_key_state(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    }
}

pub fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,
            other => Key::Unknown(other as u32),
        },

        // NativeKeyCode has no stable numeric form in winit 0.30.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}
