use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaffleError {
    #[error("Not a CSV file: {path}")]
    FormatError { path: String },

    #[error("No valid data found in {origin}")]
    EmptyResultError { origin: String },

    #[error("Failed to fetch sheet after {attempts} attempt(s): {last_failure}")]
    FetchError { attempts: usize, last_failure: String },

    #[error("Invalid Google Sheets URL: {url}")]
    InvalidSheetUrl { url: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RaffleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RaffleError::FormatError { .. }
            | RaffleError::EmptyResultError { .. }
            | RaffleError::InvalidSheetUrl { .. }
            | RaffleError::CsvError(_) => ErrorCategory::Input,
            RaffleError::FetchError { .. } | RaffleError::HttpError(_) => ErrorCategory::Network,
            RaffleError::IoError(_) | RaffleError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            RaffleError::ConfigError { .. }
            | RaffleError::ConfigValidationError { .. }
            | RaffleError::InvalidConfigValueError { .. }
            | RaffleError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            // 網路錯誤可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            RaffleError::FormatError { .. } => "Please upload a CSV file".to_string(),
            RaffleError::EmptyResultError { origin } => {
                format!("No valid data found in {}", origin)
            }
            RaffleError::FetchError { last_failure, .. } => {
                format!("Could not load the sheet: {}", last_failure)
            }
            RaffleError::InvalidSheetUrl { url } => {
                format!("'{}' does not look like a Google Sheets link", url)
            }
            RaffleError::HttpError(e) => format!("Network failure: {}", e),
            RaffleError::IoError(e) => format!("File error: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RaffleError::FormatError { .. } => "Choose a file ending in .csv",
            RaffleError::EmptyResultError { .. } => {
                "Check that the first row has headers such as 'Ticket Number' and 'Seller'"
            }
            RaffleError::FetchError { .. } | RaffleError::HttpError(_) => {
                "Make sure the sheet is published to the web as CSV, then try again"
            }
            RaffleError::InvalidSheetUrl { .. } => {
                "Paste the sheet's share link or its File > Share > Publish to web CSV link"
            }
            RaffleError::CsvError(_) => "Re-export the sheet as CSV and upload it again",
            RaffleError::IoError(_) | RaffleError::SerializationError(_) => {
                "Check permissions on the state directory, or run `raffle reset`"
            }
            RaffleError::ConfigError { .. }
            | RaffleError::ConfigValidationError { .. }
            | RaffleError::InvalidConfigValueError { .. }
            | RaffleError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RaffleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_retryable() {
        let err = RaffleError::FetchError {
            attempts: 3,
            last_failure: "HTTP 404 Not Found".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("3 attempt"));
        assert!(err.user_friendly_message().contains("HTTP 404"));
    }

    #[test]
    fn test_format_error_message() {
        let err = RaffleError::FormatError {
            path: "tickets.xlsx".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "Please upload a CSV file");
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
