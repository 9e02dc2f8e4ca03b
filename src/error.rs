use thiserror::Error;

/// Non-fatal failures of the card core. None of these stop the frame loop;
/// each one is converted into a log line or a user-visible message where it
/// happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    #[error("feature disabled: {0} is not configured")]
    ConfigMissingFeature(&'static str),
    #[error("failed to load asset {url}: {detail}")]
    AssetLoadFailure { url: String, detail: String },
    #[error("WebXR is not available")]
    ArUnavailable,
    #[error("immersive AR is not supported on this device")]
    ArUnsupported,
    #[error("AR session request failed: {0}")]
    ArSessionRequestFailure(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid colour literal {0:?}")]
    Color(String),
    #[error("could not read host configuration object: {0}")]
    Host(String),
}
