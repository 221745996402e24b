use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to start assistant session: {0}")]
    SessionStart(String),

    #[error("failed to deliver message to assistant: {0}")]
    Send(String),

    #[error("no active assistant call")]
    NoActiveCall,

    #[error("invalid server message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
