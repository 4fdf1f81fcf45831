use std::fmt;

/// Engine error types for better error handling and caller feedback.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Errors related to the persistent key-value slot
    Storage(String),
    /// Errors related to encoding or decoding the reminder blob
    Serialization(String),
    /// Errors related to the host notification capability
    Notification(String),
    /// Errors related to the audio cue capability
    Audio(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            AppError::Notification(msg) => write!(f, "Notification error: {}", msg),
            AppError::Audio(msg) => write!(f, "Audio error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Serialization(error.to_string())
    }
}

// Convenience constructors
impl AppError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        AppError::Serialization(msg.into())
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        AppError::Notification(msg.into())
    }

    pub fn audio<S: Into<String>>(msg: S) -> Self {
        AppError::Audio(msg.into())
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::storage("slot not writable");
        assert_eq!(err.to_string(), "Storage error: slot not writable");
    }

    #[test]
    fn test_error_constructors() {
        let storage_err = AppError::storage("test");
        assert!(matches!(storage_err, AppError::Storage(_)));

        let audio_err = AppError::audio("test");
        assert!(matches!(audio_err, AppError::Audio(_)));
    }

    #[test]
    fn test_serde_error_converts_to_serialization() {
        let bad = serde_json::from_str::<Vec<i32>>("not json").unwrap_err();
        let err: AppError = bad.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
