mod handle;
mod store;

pub use handle::{Session, SessionHandle, SessionView};
pub use store::SessionStore;

use thiserror::Error;

/// Session-layer failures. `Clone` because a single renewal outcome fans
/// out to every caller that joined the in-flight attempt.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("email address is not verified yet")]
    EmailNotVerified,
    #[error("{0}")]
    AuthenticationFailed(String),
    #[error("session could not be renewed; sign in again")]
    RefreshAccessToken,
    #[error("no active session")]
    NoSession,
}
