use derive_more::Display;

/// Error taxonomy for the dashboard. Stale-result discards and a not yet
/// attached chart container are not errors and have no variant here.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    /// The remote service could not be reached at all.
    #[display(fmt = "Network Error: {}", _0)]
    Network(String),
    /// The remote service answered with a non-success status.
    #[display(fmt = "Remote Error ({}): {}", status, message)]
    Remote { status: u16, message: String },
    /// The payload did not match the expected contract.
    #[display(fmt = "Decode Error: {}", _0)]
    Decode(String),
    #[display(fmt = "Rendering Error: {}", _0)]
    Rendering(String),
    #[display(fmt = "Validation Error: {}", _0)]
    Validation(String),
}

impl std::error::Error for AppError {}

impl AppError {
    /// Text shown in the dashboard error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(msg) => format!("Unable to reach the analysis service: {}", msg),
            AppError::Remote { status, message } if message.is_empty() => {
                format!("The analysis service returned HTTP {}", status)
            }
            AppError::Remote { status, message } => {
                format!("The analysis service returned HTTP {}: {}", status, message)
            }
            AppError::Decode(msg) => format!("Unexpected response from the analysis service: {}", msg),
            AppError::Rendering(msg) => format!("Chart could not be drawn: {}", msg),
            AppError::Validation(msg) => msg.clone(),
        }
    }

    /// Transport and remote failures may succeed on a manual refresh.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Remote { status: 500..=599, .. })
    }
}

pub type NetworkResult<T> = Result<T, AppError>;
pub type RenderingResult<T> = Result<T, AppError>;
