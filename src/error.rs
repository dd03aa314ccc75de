use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum MergeError {
    /// An input could not be opened.
    Open { path: PathBuf, source: std::io::Error },
    /// Reading from an already opened input failed.
    Read { path: PathBuf, source: std::io::Error },
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Config(String),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::Open { path, source } => write!(f, "Cannot open {}: {}", path.display(), source),
            MergeError::Read { path, source } => write!(f, "Read error on {}: {}", path.display(), source),
            MergeError::Io(e) => write!(f, "IO error: {}", e),
            MergeError::Serialization(e) => write!(f, "Serialization error: {}", e),
            MergeError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Open { source, .. } | MergeError::Read { source, .. } => Some(source),
            MergeError::Io(e) => Some(e),
            MergeError::Serialization(e) => Some(e),
            MergeError::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for MergeError {
    fn from(err: std::io::Error) -> Self {
        MergeError::Io(err)
    }
}

impl From<serde_json::Error> for MergeError {
    fn from(err: serde_json::Error) -> Self {
        MergeError::Serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn open_error_names_the_path() {
        let err = MergeError::Open {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing.txt"), "message should name the path: {}", msg);
        assert!(err.source().is_some());
    }

    #[test]
    fn open_error_reports_the_cause() {
        let err = MergeError::Open {
            path: PathBuf::from("inputs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let msg = err.to_string();
        assert_eq!(msg, "Cannot open inputs: permission denied");
        assert!(!msg.contains("not found"));
    }

    #[test]
    fn config_error_has_no_source() {
        let err = MergeError::Config("buffer size must be positive".to_string());
        assert!(err.to_string().starts_with("Configuration error"));
        assert!(err.source().is_none());
    }
}
