use thiserror::Error;

/// Failures raised by the cloud adapter.
///
/// The tree builder catches these per node; only configuration, auth and the
/// initial load balancer listing surface to the user as fatal.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error(
        "no '{service_type}' endpoint in the service catalog \
         (interface: {interface}, region: {region})"
    )]
    EndpointNotFound {
        service_type: String,
        interface: String,
        region: String,
    },
}

impl CloudError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type CloudResult<T> = Result<T, CloudError>;

/// `err` and each of its sources, joined by `": "`.
///
/// Display strings never repeat their source, so this is the one-line form
/// used for inline error nodes.
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
