use async_trait::async_trait;
use shared::domain::User;
use thiserror::Error;
use tracing::{info, warn};

use crate::{validation::Credentials, RemoteError, ResourceClient};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication failed: {0}")]
    Internal(String),
}

/// Credentials-based session provider, injected wherever a sign-in happens.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn authorize(&self, credentials: &Credentials) -> Result<User, AuthError>;
}

/// Authorizes against the user records held by the resource API.
pub struct CredentialsProvider {
    client: ResourceClient,
}

impl CredentialsProvider {
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionProvider for CredentialsProvider {
    async fn authorize(&self, credentials: &Credentials) -> Result<User, AuthError> {
        if let Err(errors) = credentials.check() {
            info!(
                fields = ?errors.fields().collect::<Vec<_>>(),
                "auth: credentials failed validation"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let user = match self.client.fetch_user_by_email(&credentials.email).await {
            Ok(user) => user,
            Err(RemoteError::NotFound { .. }) => {
                info!("auth: no account for email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                warn!(error = %err, "auth: user lookup failed");
                return Err(AuthError::Internal(err.to_string()));
            }
        };

        // Password hashing is owned by the resource API; it hands back the stored secret.
        if user.password != credentials.password {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
