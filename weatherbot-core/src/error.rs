use thiserror::Error;

/// Why a weather lookup produced no data.
///
/// Users see every variant the same way ("couldn't find ..."); the variant
/// only exists so logs can tell a network blip from an unknown city.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to weather provider failed: {0}")]
    Network(String),

    #[error("weather provider answered with status {status}")]
    Status { status: u16 },

    #[error("no geocoding match for '{0}'")]
    NoGeocodeMatch(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Malformed(err.to_string())
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
