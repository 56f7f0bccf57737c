use thiserror::Error;

/// Failure to obtain a usable catalog
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog source returned status {0}")]
    Status(u16),

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("catalog contains duplicate listing id {0}")]
    DuplicateId(u64),

    #[error("catalog unavailable after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<LoadError>,
    },
}

impl LoadError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            LoadError::Io(e) => !matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            LoadError::Http(_) => true,
            LoadError::Status(code) => *code >= 500 || *code == 429,
            LoadError::Malformed(_) | LoadError::DuplicateId(_) | LoadError::Exhausted { .. } => {
                false
            }
        }
    }
}

/// Malformed user input
///
/// Inside the query pipeline these are coerced to defaults and only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid count filter: {0:?}")]
    InvalidCount(String),

    #[error("unknown sort key: {0:?}")]
    UnknownSort(String),

    #[error("unknown view mode: {0:?}")]
    UnknownView(String),

    #[error("unknown property type: {0:?}")]
    UnknownPropertyType(String),

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("description must be at least {min} characters, got {len}")]
    DescriptionTooShort { len: usize, min: usize },
}

/// Failure of the persistent key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize store value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(LoadError::Status(503).is_transient());
        assert!(LoadError::Status(429).is_transient());
        assert!(!LoadError::Status(404).is_transient());
        assert!(!LoadError::DuplicateId(3).is_transient());

        let io = std::io::Error::new(std::io::ErrorKind::Interrupted, "again");
        assert!(LoadError::Io(io).is_transient());
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow disk");
        assert!(LoadError::Io(io).is_transient());
    }

    #[test]
    fn missing_or_forbidden_file_is_permanent() {
        for kind in [std::io::ErrorKind::NotFound, std::io::ErrorKind::PermissionDenied] {
            let io = std::io::Error::new(kind, "nope");
            assert!(!LoadError::Io(io).is_transient());
        }
    }

    #[test]
    fn exhausted_message_includes_last_error() {
        let err = LoadError::Exhausted {
            attempts: 3,
            last: Box::new(LoadError::Status(502)),
        };
        assert_eq!(
            err.to_string(),
            "catalog unavailable after 3 attempts: catalog source returned status 502"
        );
    }
}
