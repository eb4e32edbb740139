use thiserror::Error;

/// Everything that can go wrong talking to the API or writing exports.
///
/// The UI surfaces all variants the same way (a toast, or the full-screen
/// error state on the initial load); the variants exist so log lines and
/// messages stay precise. 4xx and 5xx are not distinguished.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
