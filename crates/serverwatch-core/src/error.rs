//! Error types for the gateway, configuration, and report export.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Status code reported when a request never produced an HTTP response.
pub const TRANSPORT_FAILURE_CODE: u16 = 0;

/// Failure of a backend call.
///
/// Every failure collapses to a status code; the display text is the only
/// message the projector ever shows.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, non-2xx status, or undecodable body.
    #[error("An Error occurred - Error code: {code}")]
    Network {
        /// HTTP status code, or [`TRANSPORT_FAILURE_CODE`].
        code: u16,
        /// Underlying client error, when there is one.
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl GatewayError {
    /// Build a network error from a status code alone.
    #[must_use]
    pub const fn network(code: u16) -> Self {
        Self::Network { code, source: None }
    }

    /// Status code carried by the error.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Network { code, .. } => *code,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        let code = err
            .status()
            .map_or(TRANSPORT_FAILURE_CODE, |status| status.as_u16());
        Self::Network {
            code,
            source: Some(err),
        }
    }
}

/// Invalid gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL does not parse.
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        /// Rejected input.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The base URL uses a scheme other than http or https.
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure while exporting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing the report file failed.
    #[error("failed to write report to {path}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(400 ; "bad request")]
    #[test_case(404 ; "not found")]
    #[test_case(500 ; "server error")]
    fn network_error_message(code: u16) {
        let err = GatewayError::network(code);
        assert_eq!(err.to_string(), format!("An Error occurred - Error code: {code}"));
        assert_eq!(err.code(), code);
    }

    #[test]
    fn transport_failure_uses_code_zero() {
        let err = GatewayError::network(TRANSPORT_FAILURE_CODE);
        assert_eq!(err.to_string(), "An Error occurred - Error code: 0");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::UnsupportedScheme("ftp".into());
        assert_eq!(err.to_string(), "unsupported scheme 'ftp', expected http or https");
    }

    #[test]
    fn report_error_display() {
        let err = ReportError::Write {
            path: PathBuf::from("/nope/server-report.xls"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/server-report.xls"));
    }
}
