use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
///
/// Callers can match on the variant to decide whether to reconfigure
/// (`MissingApiKey`), retry later (`Transport`), or give up
/// (`Remote`/`EmptyResponse`).
#[derive(Debug, Error)]
pub enum Error {
    /// No credential in the environment or the config file.
    ///
    /// The Display text is the exact line the CLI prints after the
    /// "Error: " prefix, so keep it stable.
    #[error("GEMINI_API_KEY environment variable not set.")]
    MissingApiKey,

    /// The request never produced an HTTP response (DNS, TLS, timeout).
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Gemini request failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    /// The service returned 2xx but the body was not a generate-content
    /// response.
    #[error("failed to decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded, but carried no candidates or no text part.
    #[error("Gemini response contained no text")]
    EmptyResponse,

    /// The model was asked for JSON and returned something else.
    /// Callers can fall back to the raw text path.
    #[error("could not parse model output as a weather report: {0}")]
    MalformedReport(#[source] serde_json::Error),
}
