/// Structured error types for galaxyctl-core.
///
/// Uses `thiserror` so the binary (galaxyctl-cli) can wrap these in `anyhow`
/// and report the full cause chain. Nothing in this crate exits the process;
/// every failure comes back to the caller as one of these types.

use thiserror::Error;

/// Connection string rejected during parsing or validation.
///
/// These are operator mistakes: the caller fixes the input and re-runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A separator was not found where the layout requires one
    #[error("invalid database connection string: expected '{separator}' after the {segment}")]
    MissingSeparator {
        separator: &'static str,
        segment: &'static str,
    },

    /// Port segment is not an integer in 0..=65535
    #[error("invalid database connection string: port '{value}' is not a number")]
    InvalidPort { value: String },

    #[error("invalid database connection string: only postgresql is supported (got '{scheme}')")]
    UnsupportedScheme { scheme: String },

    #[error("invalid database connection string: only the galaxy database is supported (got '{database}')")]
    UnsupportedDatabase { database: String },

    /// Required field is empty (or zero, for the port)
    #[error("invalid database connection string: no {field} provided")]
    Empty { field: &'static str },
}

/// Stored password hash could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed password hash: {reason}")]
    Malformed { reason: String },

    #[error("unsupported password hash scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },
}

impl CredentialError {
    /// Create a malformed-hash error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Failure of a registration run, tagged by the phase that failed.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Connection string did not parse or validate
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Could not open the database session
    #[error("an error occurred while connecting to the database")]
    Connect {
        #[source]
        source: sqlx::Error,
    },

    /// A statement, commit or close failed once connected
    #[error("database error while {context}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The user row is absent right after its insert was committed
    #[error("unable to retrieve user id for '{username}' after insert")]
    MissingUser { username: String },
}

/// Result type alias for registration operations
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Build a `map_err` adapter that tags an sqlx error with what was being done.
    ///
    /// ```ignore
    /// tx.commit().await.map_err(RegistrationError::database("committing the user insert"))?;
    /// ```
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Database { context, source }
    }

    /// Create a missing-user consistency error
    pub fn missing_user(username: impl Into<String>) -> Self {
        Self::MissingUser {
            username: username.into(),
        }
    }
}
