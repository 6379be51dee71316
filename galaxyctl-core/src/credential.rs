//! PBKDF2 password hashing in Galaxy's stored layout
//!
//! Stored value: `PBKDF2$sha256$<iterations>$<salt>$<key>`
//!
//! Galaxy verifies passwords by splitting this string on `$` and recomputing
//! the key, so the layout must match byte for byte. Two details matter:
//! - `<salt>` is base64 of 12 random bytes, and the *base64 text itself* is
//!   the PBKDF2 salt input (not the decoded bytes)
//! - `<key>` is base64 of the 24-byte derived key
//!
//! Passwords are fed to PBKDF2 as their UTF-8 bytes.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::error::CredentialError;

pub const ALGORITHM: &str = "PBKDF2";
pub const HASH_FUNCTION: &str = "sha256";
pub const COST_FACTOR: u32 = 100_000;
pub const SALT_LENGTH: usize = 12;
pub const KEY_LENGTH: usize = 24;

const DELIMITER: char = '$';

/// A password hash ready to be stored in `galaxy_user.password`.
///
/// Has no `Display`, and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedCredential(String);

impl HashedCredential {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for HashedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedCredential(<redacted>)")
    }
}

/// Derives and checks PBKDF2-HMAC-SHA256 password hashes
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    iterations: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            iterations: COST_FACTOR,
        }
    }
}

impl CredentialHasher {
    /// Hasher with the production cost factor
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the iteration count.
    ///
    /// The count is recorded in the output, so hashes made this way still
    /// verify; Galaxy itself always writes 100000.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash `password` with a fresh random salt
    pub fn hash(&self, password: &str) -> HashedCredential {
        let mut raw_salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut raw_salt);
        let salt = STANDARD.encode(raw_salt);

        self.hash_with_salt(password, &salt)
    }

    /// Hash `password` with a caller-supplied salt string.
    ///
    /// `salt` is used as-is (its UTF-8 bytes) and copied into the output.
    /// It must not contain `$`.
    pub fn hash_with_salt(&self, password: &str, salt: &str) -> HashedCredential {
        let key = derive_key(password, salt, self.iterations, KEY_LENGTH);

        HashedCredential(format!(
            "{ALGORITHM}{DELIMITER}{HASH_FUNCTION}{DELIMITER}{}{DELIMITER}{salt}{DELIMITER}{}",
            self.iterations,
            STANDARD.encode(key)
        ))
    }

    /// Check `password` against a stored hash.
    ///
    /// Parameters are read from the stored value, not from `self`. A wrong
    /// password is `Ok(false)`; a value that is not in the PBKDF2 layout is an
    /// error.
    pub fn verify(password: &str, stored: &str) -> Result<bool, CredentialError> {
        let fields: Vec<&str> = stored.split(DELIMITER).collect();
        let [scheme, hash_function, iterations, salt, key] = fields.as_slice() else {
            return Err(CredentialError::malformed(format!(
                "expected 5 '{DELIMITER}'-separated fields, found {}",
                fields.len()
            )));
        };

        if *scheme != ALGORITHM {
            return Err(CredentialError::UnsupportedScheme {
                scheme: (*scheme).to_owned(),
            });
        }
        if *hash_function != HASH_FUNCTION {
            return Err(CredentialError::UnsupportedScheme {
                scheme: format!("{scheme}/{hash_function}"),
            });
        }

        let iterations: u32 = iterations
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| CredentialError::malformed(format!("bad iteration count '{iterations}'")))?;

        let expected = STANDARD
            .decode(key)
            .map_err(|e| CredentialError::malformed(format!("key is not base64: {e}")))?;
        if expected.is_empty() {
            return Err(CredentialError::malformed("empty key"));
        }

        let actual = derive_key(password, salt, iterations, expected.len());
        Ok(constant_time_eq(&actual, &expected))
    }
}

fn derive_key(password: &str, salt: &str, iterations: u32, len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
