//! Failure taxonomy for the analysis adapter.

use thiserror::Error;
use venture_gateway::ProviderError;

/// Message shown when the reply cannot be turned into a result.
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "Analysis failed to generate valid structured data. Please try again.";

/// Why an analysis request did not produce a result.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Required credential absent. Raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The reply was not a JSON object after fence stripping.
    #[error("Analysis failed to generate valid structured data. Please try again.")]
    MalformedResponse,

    /// Failure from the remote call, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] ProviderError),
}

impl AnalysisError {
    pub(crate) fn credential_missing() -> Self {
        Self::Configuration(
            "credential missing: set API_KEY or GEMINI_API_KEY, or secrets.gemini in config.json"
                .into(),
        )
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse)
    }

    /// The transport error, if this failure came from the remote call.
    pub fn as_transport(&self) -> Option<&ProviderError> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venture_gateway::ProviderErrorKind;

    #[test]
    fn transport_errors_display_verbatim() {
        let inner = ProviderError::new("gemini", "gemini-2.5-flash", ProviderErrorKind::Quota, "quota exceeded");
        let expected = inner.to_string();
        let err = AnalysisError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.as_transport().map(|e| e.kind), Some(ProviderErrorKind::Quota));
    }

    #[test]
    fn malformed_uses_fixed_message() {
        assert_eq!(AnalysisError::MalformedResponse.to_string(), MALFORMED_RESPONSE_MESSAGE);
    }

    #[test]
    fn credential_missing_is_configuration() {
        let err = AnalysisError::credential_missing();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("credential missing"));
    }
}
