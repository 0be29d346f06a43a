//! Platform event translation.

mod winit;

pub use self::winit::{map_key, map_key_state, translate_key_event};
