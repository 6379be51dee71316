pub mod connection;
pub mod credential;
pub mod error;
pub mod registration;
pub mod repository;

pub use connection::ConnectionConfig;
pub use credential::{CredentialHasher, HashedCredential};
pub use error::{ConfigError, CredentialError, RegistrationError, Result};
pub use registration::{RegistrationOutcome, RegistrationRequest, RegistrationService};
pub use repository::UserRepository;
