use super::types::ConsoleError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub transient: bool,
}

impl ConsoleError {
    /// Classify this error to determine whether a periodic activity (the
    /// poll loop or the refresh scheduler) should ride through it, or
    /// whether it terminates the operation that raised it.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Transient: the next scheduled tick may succeed
            ConsoleError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                transient: true,
            },
            ConsoleError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                transient: true,
            },
            ConsoleError::Malformed(_) => ErrorClassification {
                error_type: "MalformedResponseError",
                transient: true,
            },

            // Terminal for the operation that raised them
            ConsoleError::Api(_) => ErrorClassification {
                error_type: "ApiError",
                transient: false,
            },
            ConsoleError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                transient: false,
            },
            ConsoleError::RunInFlight(_) => ErrorClassification {
                error_type: "RunInFlightError",
                transient: false,
            },
            ConsoleError::Io(_) => ErrorClassification {
                error_type: "IoError",
                transient: false,
            },
            ConsoleError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                transient: false,
            },
            ConsoleError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                transient: false,
            },
            ConsoleError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                transient: false,
            },
        }
    }

    pub fn is_transient(&self) -> bool {
        self.classify().transient
    }
}
