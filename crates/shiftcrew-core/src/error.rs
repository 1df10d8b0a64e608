use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("invalid name: only letters, spaces and hyphens are allowed (1-50 chars)")]
    InvalidName,

    #[error("a crew member with this name is already active: {0}")]
    DuplicateName(String),

    #[error("already registered in row {row}")]
    AlreadyRegistered { row: u32 },

    #[error("registration blocked: row {row} is archived")]
    RegistrationBlocked { row: u32 },

    #[error("row store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("upload storage unavailable: {0}")]
    UploadUnavailable(String),

    #[error("upload incomplete: '{failed}' failed after {} stored: {message}", saved.len())]
    UploadIncomplete {
        saved: Vec<String>,
        failed: String,
        message: String,
    },

    #[error("invalid status value: {0}")]
    InvalidStatus(String),

    #[error("config not found at {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShiftError>;

impl ShiftError {
    /// Transient infrastructure failures the caller may retry with backoff.
    /// Business outcomes (invalid name, duplicates, blocked rows) are final.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ShiftError::StoreUnavailable(_) | ShiftError::UploadUnavailable(_)
        )
    }
}
