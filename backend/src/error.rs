use std::fmt;

/// Operations the video API client performs, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListVideos,
    UploadVideo,
    DeleteVideos,
    Search,
    AskQuestion,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            Operation::ListVideos => "list videos",
            Operation::UploadVideo => "upload video",
            Operation::DeleteVideos => "delete videos",
            Operation::Search => "search videos",
            Operation::AskQuestion => "ask question",
        };
        f.write_str(action)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VideoApiError {
    #[error("Video API configuration error: {0}")]
    Configuration(String),

    #[error("Failed to {operation}: {source}")]
    Http {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to {operation}: video API returned status {status}: {body}")]
    UnexpectedStatus {
        operation: Operation,
        status: u16,
        body: String,
    },

    #[error("Failed to {operation}: unexpected response: {reason}")]
    Parse { operation: Operation, reason: String },

    #[error("Failed to {operation}: {message}")]
    Vendor { operation: Operation, message: String },
}

impl VideoApiError {
    pub fn parse(operation: Operation, reason: impl fmt::Display) -> Self {
        VideoApiError::Parse {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Machine-readable code returned to API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            VideoApiError::Configuration(_) => "configuration_error",
            VideoApiError::Http { .. } | VideoApiError::UnexpectedStatus { .. } => {
                "transport_error"
            }
            VideoApiError::Parse { .. } => "parse_error",
            VideoApiError::Vendor { .. } => "vendor_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_operation() {
        let err = VideoApiError::UnexpectedStatus {
            operation: Operation::DeleteVideos,
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to delete videos: video API returned status 503: down"
        );
        assert_eq!(err.code(), "transport_error");
    }

    #[test]
    fn test_parse_and_vendor_codes() {
        let parse = VideoApiError::parse(Operation::Search, "expected value");
        let vendor = VideoApiError::Vendor {
            operation: Operation::AskQuestion,
            message: "quota exceeded".to_string(),
        };

        assert_eq!(parse.code(), "parse_error");
        assert_eq!(vendor.code(), "vendor_error");
        assert!(vendor.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_configuration_code() {
        let err = VideoApiError::Configuration("missing key".to_string());
        assert_eq!(err.code(), "configuration_error");
        assert!(err.to_string().contains("missing key"));
    }
}
