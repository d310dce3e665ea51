use std::fmt;

/// Fatal application error with a process exit code.
///
/// Reserved for setup failures the run cannot recover from: bad CLI input,
/// an unreadable source file, or a source missing required schema columns.
/// Per-stage analysis failures use [`StageError`] instead and never abort
/// the process.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A recoverable, per-stage analysis failure.
///
/// The pipeline driver logs these and keeps invoking later stages; each
/// stage re-checks its own inputs, so a missing upstream output produces a
/// short-circuit rather than a panic (best-effort continue policy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The input source could not be read at all.
    SourceUnavailable(String),
    /// A required prior-stage output is absent or empty.
    NoData(&'static str),
    /// The data exists but is too thin for the computation
    /// (e.g. fewer than 3 distinct businesses for tri-partition).
    InsufficientData(String),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::SourceUnavailable(msg) => write!(f, "source unavailable: {msg}"),
            StageError::NoData(what) => write!(f, "no data: {what}"),
            StageError::InsufficientData(msg) => write!(f, "insufficient data: {msg}"),
        }
    }
}

impl std::error::Error for StageError {}

impl From<StageError> for AppError {
    fn from(err: StageError) -> Self {
        let code = match err {
            StageError::SourceUnavailable(_) => 2,
            StageError::NoData(_) => 3,
            StageError::InsufficientData(_) => 3,
        };
        AppError::new(code, err.to_string())
    }
}
