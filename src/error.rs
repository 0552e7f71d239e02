use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid base url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header `{name}`")]
    InvalidHeader { name: String },

    #[error("unsupported http method `{0}`")]
    UnsupportedMethod(String),

    #[error("OAuth2 not properly configured: {0}")]
    OAuth2NotConfigured(&'static str),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Misuse of the builder, detected before anything is sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidHeader { .. } | Error::UnsupportedMethod(_) | Error::OAuth2NotConfigured(_)
        )
    }
}
