use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("chat server rejected login: {0}")]
    Auth(String),

    #[error("chat connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chat connection closed: {0}")]
    Closed(String),
}
