use crate::EditorError;

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Toast message queued for the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&EditorError> for Notice {
    fn from(err: &EditorError) -> Self {
        match err {
            EditorError::ExportFailure(_) => Notice::error("Failed to download flowchart"),
            EditorError::InvalidColor(_) | EditorError::UnsupportedEdit { .. } => {
                Notice::error(err.to_string())
            }
            _ => Notice::info(err.to_string()),
        }
    }
}
