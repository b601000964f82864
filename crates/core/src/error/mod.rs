use thiserror::Error;

/// Error taxonomy for the gateway. Every variant that can reach a caller is
/// converted into a schema-conforming envelope by the pipeline; nothing here
/// is allowed to escape as a transport-level failure.
#[derive(Error, Debug)]
pub enum AlboError {
    /// No AI credential present. The one condition that switches the
    /// pipeline into mock mode instead of an error envelope.
    #[error("OpenAI API Key nicht konfiguriert")]
    NotConfigured,

    #[error("API Key ungültig oder fehlerhaft")]
    Unauthorized,

    #[error("Zu viele Anfragen - bitte warten Sie einen Moment")]
    RateLimited,

    #[error("Verbindungsfehler: {0}")]
    Connection(String),

    #[error("Antwort konnte nicht verarbeitet werden: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AlboError>;
