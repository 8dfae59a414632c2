//! Screen controllers: form state, one network action each, and the navigation that follows.

pub mod dashboard;
pub mod landing;
pub mod login;
pub mod register;

use shared::{
    domain::Route,
    error::{ServiceError, SERVICE_UNREACHABLE_MESSAGE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Navigated(Route),
    /// An error message is now set on the controller.
    Failed,
    /// The controller lifetime ended before the response arrived; nothing was acted on.
    Cancelled,
}

fn failure_message(err: &ServiceError, rejected_message: &'static str) -> &'static str {
    match err {
        ServiceError::Rejected { .. } => rejected_message,
        ServiceError::Unreachable(_) => SERVICE_UNREACHABLE_MESSAGE,
    }
}
