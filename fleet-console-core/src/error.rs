use std::fmt;

#[derive(Debug)]
pub enum ConsoleError {
    Network(reqwest::Error),
    Status { status: u16, url: String },
    Json(serde_json::Error),
    MalformedEnvelope(String),
    InvalidInput(String),
    Config(String),
    Io(std::io::Error),
    /// A background request stopped before producing a result.
    TaskFailed(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Network(e) => write!(f, "Network error: {}", e),
            ConsoleError::Status { status, url } => {
                write!(f, "Server returned HTTP {} for {}", status, url)
            }
            ConsoleError::Json(e) => write!(f, "JSON parsing error: {}", e),
            ConsoleError::MalformedEnvelope(e) => write!(f, "Malformed page envelope: {}", e),
            ConsoleError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            ConsoleError::Config(e) => write!(f, "Configuration error: {}", e),
            ConsoleError::Io(e) => write!(f, "IO error: {}", e),
            ConsoleError::TaskFailed(e) => write!(f, "Background task failed: {}", e),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Network(e) => Some(e),
            ConsoleError::Json(e) => Some(e),
            ConsoleError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Network(err)
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Json(err)
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_source() {
        let err: ConsoleError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ConsoleError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_includes_status_and_url() {
        let err = ConsoleError::Status {
            status: 404,
            url: "/api/drivers/9".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned HTTP 404 for /api/drivers/9");
    }

    #[test]
    fn test_json_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: ConsoleError = parse.unwrap_err().into();
        assert!(matches!(err, ConsoleError::Json(_)));
    }
}
