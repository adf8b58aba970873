use async_trait::async_trait;
use thiserror::Error;

use crate::draft::ReviewSubmission;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    /// Bearer token for the review API.
    pub token: String,
}

/// Image hosting service. Returns the public URL of the stored image.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: &[u8], file_name: &str) -> Result<String, PortError>;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `None` when nobody is signed in.
    async fn current_session(&self) -> Option<Session>;
}

#[async_trait]
pub trait ReviewSubmitter: Send + Sync {
    async fn submit(&self, review: &ReviewSubmission, session: &Session) -> Result<(), PortError>;
}

/// A fixed session, for service accounts and scripted use.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<Session>);

#[async_trait]
impl SessionProvider for StaticSession {
    async fn current_session(&self) -> Option<Session> {
        self.0.clone()
    }
}
