//! Error types.
//!
//! Two layers:
//!
//! - [`BlsError`]: the pipeline's failure taxonomy (configuration, transport,
//!   API, acquisition). Per-series transport/API failures are caught by the
//!   acquisition loop and turned into diagnostics; only configuration and
//!   acquisition failures reach the caller.
//! - [`AppError`]: what the binary reports, carrying the process exit code.

/// Failure taxonomy of the acquisition pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlsError {
    /// Missing credential, series id, or an invalid year range.
    #[error("{0}")]
    Config(String),

    /// The request could not be sent or returned a non-success HTTP status.
    #[error("{0}")]
    Transport(String),

    /// The response body was malformed or reported an unsuccessful request.
    #[error("{0}")]
    Api(String),

    /// No records were obtained from any of the attempted series.
    #[error("No data fetched successfully. See details below.")]
    Acquisition {
        /// One message per failed series, in fetch order.
        diagnostics: Vec<String>,
    },
}

impl BlsError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// Whether this failure aborts a whole acquisition cycle rather than a
    /// single series.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Acquisition { .. })
    }

    /// The single user-visible message shown for a failed cycle.
    pub fn top_level_message(&self) -> String {
        format!("Failed to fetch BLS data: {self}")
    }
}

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

impl From<BlsError> for AppError {
    fn from(err: BlsError) -> Self {
        let exit_code = match err {
            BlsError::Config(_) => 2,
            _ => 4,
        };

        let mut message = err.top_level_message();
        if let BlsError::Acquisition { diagnostics } = &err {
            for line in diagnostics {
                message.push_str("\n  - ");
                message.push_str(line);
            }
        }
        Self::new(exit_code, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
