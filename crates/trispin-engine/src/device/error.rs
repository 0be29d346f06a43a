/// GL object failures reported by the device layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to create GL {object}: {message}")]
    Allocation {
        object: &'static str,
        message: String,
    },

    /// GL draw counts are `GLsizei` (signed 32-bit).
    #[error("cannot draw {count} vertices in one call (limit {})", i32::MAX)]
    DrawCountOverflow { count: usize },
}

impl DeviceError {
    pub fn new(object: &'static str, message: impl Into<String>) -> Self {
        Self::Allocation {
            object,
            message: message.into(),
        }
    }
}
