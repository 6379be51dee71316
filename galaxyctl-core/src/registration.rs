//! Admin account registration
//!
//! Composes the pieces in order: parse connection string, connect, hash
//! password, register, close. The first failure stops the run. Once a
//! session is open it is closed on every path.

use std::fmt;

use tracing::info;

use crate::connection::ConnectionConfig;
use crate::credential::CredentialHasher;
use crate::error::Result;
use crate::repository::UserRepository;

/// Raw inputs for one registration, as taken from the command line.
///
/// Nothing is validated here beyond what the connection string parser does.
/// Empty username, password or email pass through to the database, which
/// may or may not enforce its own constraints.
#[derive(Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub connection_string: String,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connection = ConnectionConfig::parse(&self.connection_string)
            .map(|config| format!("{config:?}"))
            .unwrap_or_else(|_| "<unparsed>".to_string());

        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("connection", &connection)
            .finish()
    }
}

/// What a successful run resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub username: String,
    pub user_id: i32,
}

/// Provisions Galaxy admin accounts
#[derive(Debug, Clone, Default)]
pub struct RegistrationService {
    hasher: CredentialHasher,
}

impl RegistrationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific hasher (tests use a cheaper iteration count)
    pub fn with_hasher(hasher: CredentialHasher) -> Self {
        Self { hasher }
    }

    /// Run one registration end to end.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationOutcome> {
        let config = ConnectionConfig::parse(&request.connection_string)?;
        let mut repo = UserRepository::connect(&config).await?;

        let result = self.register_with(&mut repo, request).await;
        let closed = repo.close().await;

        // A registration failure outranks a failure to close afterwards.
        let outcome = result?;
        closed?;
        Ok(outcome)
    }

    async fn register_with(
        &self,
        repo: &mut UserRepository,
        request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome> {
        info!("Inserting user {} into database", request.username);

        let hashed = self.hasher.hash(&request.password);
        let user_id = repo
            .register_admin(&request.username, &hashed, &request.email)
            .await?;

        info!("User {} inserted into database", request.username);

        Ok(RegistrationOutcome {
            username: request.username.clone(),
            user_id,
        })
    }
}
