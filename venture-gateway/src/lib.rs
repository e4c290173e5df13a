//! Venture Gateway - remote generative-model access for VentureSwords.
//!
//! Exposes a small [`Provider`] trait and a Gemini implementation that sends a
//! single prompt with optional Google Search grounding and returns the reply
//! text together with its web citations.

pub mod provider;

pub use provider::{
    Citation, GeminiProvider, GenerateRequest, GenerateResponse, Provider, ProviderError,
    ProviderErrorKind, TokenUsage,
};
