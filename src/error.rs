use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("file contention: {0}")]
    FileContention(std::io::Error),

    #[error("file I/O error: {0}")]
    FileIo(std::io::Error),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl AnalyzerError {
    /// Process exit code for this failure kind. Success paths exit 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalyzerError::Unknown(_) => 1,
            AnalyzerError::Network(_) => 2,
            AnalyzerError::MalformedResponse(_) => 3,
            AnalyzerError::FileContention(_) => 4,
            AnalyzerError::FileIo(_) => 5,
        }
    }
}

impl From<csv::Error> for AnalyzerError {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => AnalyzerError::FileIo(io_err),
            kind => AnalyzerError::Unknown(format!("csv: {:?}", kind)),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
