//! CLI-specific error types and exit code mapping

use logscope_analyzer::AnalyzerError;
use logscope_core::error::{AnalysisError, LogscopeError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logscope-core.
    #[error("{0}")]
    Core(#[from] LogscopeError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | General / command error               |
    /// | 2    | Configuration error                   |
    /// | 3    | Input file could not be read          |
    /// | 10   | IO error                              |
    /// | 130  | Analysis cancelled (Ctrl-C)           |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                LogscopeError::Config(_) => 2,
                LogscopeError::Io(_) => 10,
                LogscopeError::Analysis(AnalysisError::ReadFailure { .. }) => 3,
                LogscopeError::Analysis(AnalysisError::Cancelled(_)) => 130,
                LogscopeError::Analysis(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) | Self::Logging(_) => 1,
        }
    }
}

impl From<AnalyzerError> for CliError {
    fn from(e: AnalyzerError) -> Self {
        match e {
            AnalyzerError::Io(io) => Self::Io(io),
            other => Self::Core(other.into()),
        }
    }
}
