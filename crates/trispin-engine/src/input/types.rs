/// Keyboard key identifier.
///
/// Escape is the only key the render loop reacts to; everything else maps to
/// `Key::Unknown` carrying the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A single key transition delivered by the windowing runtime.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn new(key: Key, state: KeyState) -> Self {
        Self { key, state }
    }

    /// Returns true if this event is the release of `key`.
    pub fn is_release_of(&self, key: Key) -> bool {
        self.key == key && self.state == KeyState::Released
    }
}
