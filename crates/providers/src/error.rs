use thiserror::Error;

/// Failure talking to an external collaborator.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unexpected payload: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned no content")]
    Empty { provider: &'static str },

    #[error("could not build {provider} request: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub(crate) fn from_reqwest(provider: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { provider }
        } else {
            Self::Transport { provider, source }
        }
    }

    /// Name of the collaborator that failed
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Timeout { provider }
            | Self::Status { provider, .. }
            | Self::Decode { provider, .. }
            | Self::Empty { provider }
            | Self::InvalidRequest { provider, .. } => provider,
        }
    }
}
