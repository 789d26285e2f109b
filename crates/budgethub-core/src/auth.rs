//! User registration and password verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl Registration {
    /// Check field rules, reporting the first violation
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().chars().count() < MIN_USERNAME_LEN {
            return Err(Error::InvalidData(format!(
                "Username must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }
        if !self.email.contains('@') {
            return Err(Error::InvalidData(
                "Please enter a valid email address".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidData(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.password != self.confirm_password {
            return Err(Error::InvalidData("Passwords do not match".into()));
        }
        Ok(())
    }
}

/// Hash a password with Argon2id and a random salt (PHC string format)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

impl Database {
    /// Validate a registration and create the account
    pub fn register_user(&self, registration: &Registration) -> Result<User> {
        registration.validate()?;

        let hash = hash_password(&registration.password)?;
        let user = self.create_user(
            registration.username.trim(),
            registration.email.trim(),
            &hash,
        )?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Look up a user by username and check their password
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let invalid = || Error::Auth("Invalid username or password".into());

        let user = self
            .get_user_by_username(username.trim())?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            warn!(username = %user.username, "Failed login attempt");
            return Err(invalid());
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str, password: &str, confirm: &str) -> Registration {
        Registration {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(registration("alice", "a@example.com", "secret1", "secret1")
            .validate()
            .is_ok());

        let cases = [
            (registration("al", "a@example.com", "secret1", "secret1"), "Username"),
            (registration("alice", "example.com", "secret1", "secret1"), "email"),
            (registration("alice", "a@example.com", "short", "short"), "Password must"),
            (registration("alice", "a@example.com", "secret1", "secret2"), "match"),
        ];
        for (reg, needle) in cases {
            let err = reg.validate().unwrap_err().to_string();
            assert!(err.contains(needle), "{} should mention {}", err, needle);
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_register_and_authenticate() {
        let db = Database::in_memory().unwrap();
        let user = db
            .register_user(&registration("alice", "a@example.com", "secret1", "secret1"))
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret1");

        let logged_in = db.authenticate("alice", "secret1").unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            db.authenticate("alice", "wrong-password"),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            db.authenticate("nobody", "secret1"),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn test_register_duplicates() {
        let db = Database::in_memory().unwrap();
        db.register_user(&registration("alice", "a@example.com", "secret1", "secret1"))
            .unwrap();

        let same_name = db.register_user(&registration("alice", "b@example.com", "secret1", "secret1"));
        assert!(matches!(same_name, Err(Error::Conflict(_))));

        let same_email = db.register_user(&registration("bob", "A@example.com", "secret1", "secret1"));
        assert!(matches!(same_email, Err(Error::Conflict(_))));
    }
}
