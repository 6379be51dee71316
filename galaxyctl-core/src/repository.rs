//! Galaxy user repository
//!
//! Owns a single database session for one registration run:
//! - create user: INSERT ... ON CONFLICT DO NOTHING (idempotent)
//! - grant admin: INSERT ... ON CONFLICT DO NOTHING, role resolved by name
//! - close: explicit, logged; dropping the repository also releases the session
//!
//! Relies on the database's unique constraints, never check-then-insert.

use sqlx::{Connection, PgConnection};
use tracing::{debug, info};

use crate::connection::ConnectionConfig;
use crate::credential::HashedCredential;
use crate::error::{RegistrationError, Result};

/// Name of the role every registered user is granted
pub const ADMIN_ROLE: &str = "admin";

const INSERT_USER: &str = r#"
    INSERT INTO galaxy_user (email, username, password, active)
    VALUES ($1, $2, $3, true)
    ON CONFLICT DO NOTHING
"#;

const SELECT_USER_ID: &str = "SELECT id FROM galaxy_user WHERE username = $1";

const INSERT_ROLE_GRANT: &str = r#"
    INSERT INTO user_role_association (user_id, role_id)
    VALUES ($1, (SELECT id FROM role WHERE name = $2))
    ON CONFLICT DO NOTHING
"#;

/// Repository over one open Galaxy database session
pub struct UserRepository {
    conn: PgConnection,
}

impl UserRepository {
    /// Open a session. No retry: a failure here is returned as
    /// [`RegistrationError::Connect`].
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        info!(
            host = config.host(),
            port = config.port(),
            database = config.database(),
            "Connecting to database"
        );

        let conn = PgConnection::connect_with(&config.connect_options())
            .await
            .map_err(|source| RegistrationError::Connect { source })?;

        Ok(Self { conn })
    }

    /// Create the user if absent and grant it the admin role if not already
    /// granted. Returns the user's id.
    ///
    /// Two transactions, committed in order:
    /// 1. insert the user row (no-op when the username exists)
    /// 2. look the id up by username, insert the role grant (no-op when present)
    ///
    /// A crash between them leaves a user without its grant; running this
    /// again completes the grant and leaves the stored password untouched.
    pub async fn register_admin(
        &mut self,
        username: &str,
        password: &HashedCredential,
        email: &str,
    ) -> Result<i32> {
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(RegistrationError::database("starting the user insert"))?;

        let inserted = sqlx::query(INSERT_USER)
            .bind(email)
            .bind(username)
            .bind(password.as_str())
            .execute(&mut *tx)
            .await
            .map_err(RegistrationError::database("inserting the user"))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(RegistrationError::database("committing the user insert"))?;

        if inserted == 0 {
            debug!(username, "user already exists, keeping the stored row");
        }

        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(RegistrationError::database("starting the role grant"))?;

        let user_id: i32 = sqlx::query_scalar(SELECT_USER_ID)
            .bind(username)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RegistrationError::database("looking up the user id"))?
            .ok_or_else(|| RegistrationError::missing_user(username))?;

        let granted = sqlx::query(INSERT_ROLE_GRANT)
            .bind(user_id)
            .bind(ADMIN_ROLE)
            .execute(&mut *tx)
            .await
            .map_err(RegistrationError::database("granting the admin role"))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(RegistrationError::database("committing the role grant"))?;

        if granted == 0 {
            debug!(username, user_id, "admin role already granted");
        }

        Ok(user_id)
    }

    /// Whether a user row exists for `username`
    pub async fn user_exists(&mut self, username: &str) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM galaxy_user WHERE username = $1)")
            .bind(username)
            .fetch_one(&mut self.conn)
            .await
            .map_err(RegistrationError::database("checking for the user"))
    }

    /// Whether `username` holds the admin role
    pub async fn is_admin(&mut self, username: &str) -> Result<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_role_association ura
                JOIN galaxy_user u ON u.id = ura.user_id
                JOIN role r ON r.id = ura.role_id
                WHERE u.username = $1 AND r.name = $2
            )
            "#,
        )
        .bind(username)
        .bind(ADMIN_ROLE)
        .fetch_one(&mut self.conn)
        .await
        .map_err(RegistrationError::database("checking the admin role"))
    }

    /// Close the session, consuming the repository.
    pub async fn close(self) -> Result<()> {
        info!("Closing database connection");
        self.conn
            .close()
            .await
            .map_err(RegistrationError::database("closing the connection"))
    }
}
