//! Error types for sensegrid-core.
//!
//! The device boundary has exactly two failure modes worth distinguishing:
//! the request could not complete (network), or the response body was not
//! the expected shape (parse). Both are transient from the client's point of
//! view: the polling loop logs them and retries on the next tick, and LED
//! operations surface them to the operator for a manual retry. Nothing here
//! is fatal; the client degrades to last-known-good display on any failure.

use thiserror::Error;

/// Errors that can occur when communicating with the device.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request could not complete (connection refused, DNS, timeout).
    #[error("Device not reachable at {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-success HTTP status.
    #[error("Device returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response body was not valid JSON or had the wrong shape.
    #[error("Malformed response from {url}: {message}")]
    Parse { url: String, message: String },

    /// The configured host/port do not form a usable base URL.
    #[error("Invalid device address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Whether this failure is worth retrying on a later tick.
    ///
    /// Everything except a misconfigured address is treated as transient.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Error::InvalidAddress(_))
    }
}

/// Result type alias for sensegrid-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_address_is_not_transient() {
        let err = Error::InvalidAddress("nope".to_string());
        assert!(!err.is_transient());

        let err = Error::Status {
            url: "http://localhost:8000/sensors/all".to_string(),
            status: 500,
        };
        assert!(err.is_transient());
    }

    #[test]
    fn messages_name_the_url() {
        let err = Error::Parse {
            url: "http://localhost:8000/leds/get/all".to_string(),
            message: "expected array".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("/leds/get/all"));
        assert!(text.contains("expected array"));
    }
}
