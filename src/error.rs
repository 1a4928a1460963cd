//! Error types and handling for the forecast comparison

use thiserror::Error;

/// Main error type for fetching, normalizing and rendering forecasts
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Transport-level failure (DNS, connect, timeout, broken body)
    #[error("Network error from {service}: {message}")]
    Network {
        service: &'static str,
        message: String,
    },

    /// The service answered with a non-success HTTP status
    #[error("{service}-feil ({status})")]
    Status { service: &'static str, status: u16 },

    /// The response did not have the expected shape
    #[error("Malformed payload from {service}: {message}")]
    MalformedPayload {
        service: &'static str,
        message: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTML rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ForecastError {
    /// Create a new network error
    pub fn network<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::Network {
            service,
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn status(service: &'static str, status: u16) -> Self {
        Self::Status { service, status }
    }

    /// Create a new malformed payload error
    pub fn malformed<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::MalformedPayload {
            service,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// True for failures that came from talking to a weather service
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Status { .. } | Self::MalformedPayload { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { service, .. } => {
                format!("Kunne ikke koble til {service}. Sjekk internettforbindelsen.")
            }
            Self::Status { service, status } => format!("{service}-feil ({status})"),
            Self::MalformedPayload { service, message } => {
                format!("Uventet svar fra {service}: {message}")
            }
            Self::Config { .. } => {
                "Konfigurasjonsfeil. Sjekk konfigurasjonsfilen.".to_string()
            }
            Self::Render { .. } => "Kunne ikke lage HTML-siden.".to_string(),
            Self::Io { .. } => "Filoperasjonen feilet. Sjekk filrettighetene.".to_string(),
        }
    }
}

impl From<tera::Error> for ForecastError {
    fn from(err: tera::Error) -> Self {
        Self::render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let network_err = ForecastError::network("Yr.no", "connection refused");
        assert!(matches!(network_err, ForecastError::Network { .. }));

        let status_err = ForecastError::status("Open-Meteo", 503);
        assert!(matches!(status_err, ForecastError::Status { status: 503, .. }));

        let malformed_err = ForecastError::malformed("Yr.no", "missing timeseries");
        assert!(matches!(malformed_err, ForecastError::MalformedPayload { .. }));
    }

    #[test]
    fn test_status_display_matches_source_label() {
        let err = ForecastError::status("Yr.no", 500);
        assert_eq!(err.to_string(), "Yr.no-feil (500)");
    }

    #[test]
    fn test_upstream_classification() {
        assert!(ForecastError::status("Yr.no", 404).is_upstream());
        assert!(ForecastError::network("Yr.no", "timeout").is_upstream());
        assert!(!ForecastError::config("bad url").is_upstream());
    }

    #[test]
    fn test_user_messages() {
        let network_err = ForecastError::network("Open-Meteo", "test");
        assert!(network_err.user_message().contains("Open-Meteo"));

        let malformed_err = ForecastError::malformed("Yr.no", "no daily block");
        assert!(malformed_err.user_message().contains("no daily block"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForecastError = io_err.into();
        assert!(matches!(err, ForecastError::Io { .. }));
    }
}
