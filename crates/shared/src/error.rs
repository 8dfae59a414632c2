use thiserror::Error;

pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed (email may exist)";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";
pub const SERVICE_UNREACHABLE_MESSAGE: &str =
    "Service unreachable, check your connection and try again";

/// Outcome of a call to the portal service that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("service rejected request with status {status}")]
    Rejected { status: u16 },
    /// No usable response: transport failure, timeout, or a body that did not parse.
    #[error("service unreachable: {0}")]
    Unreachable(String),
}

impl ServiceError {
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::Unreachable(reason.into())
    }
}
