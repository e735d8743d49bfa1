use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The config file cannot be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// One or more required parameters are empty.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// The IP-echo service or the DNS provider could not be reached or answered
    /// with a failure.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// The zone or the record does not exist at the provider.
    #[error("lookup error: {0}")]
    Lookup(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::MissingParameter(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
