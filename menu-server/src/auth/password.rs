//! Staff credential check (argon2)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Configured staff account
#[derive(Debug, Clone)]
pub struct StaffCredentials {
    pub email: String,
    /// PHC-format argon2 hash; `None` disables login
    pub password_hash: Option<String>,
}

impl StaffCredentials {
    /// Email compare is case-insensitive, password goes through argon2
    pub fn verify(&self, email: &str, password: &str) -> bool {
        if !self.email.eq_ignore_ascii_case(email.trim()) {
            return false;
        }
        let Some(hash) = self.password_hash.as_deref() else {
            tracing::warn!("Login attempted but STAFF_PASSWORD_HASH is not configured");
            return false;
        };
        match verify_password(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, "Stored staff password hash is malformed");
                false
            }
        }
    }
}

/// Verify a password against a PHC hash string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password with a fresh salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("milanesa123").unwrap();
        assert!(verify_password("milanesa123", &hash).unwrap());
        assert!(!verify_password("otra", &hash).unwrap());
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn test_staff_credentials() {
        let creds = StaffCredentials {
            email: "cocina@maitreya.test".to_string(),
            password_hash: Some(hash_password("secreto").unwrap()),
        };
        assert!(creds.verify(" Cocina@Maitreya.test ", "secreto"));
        assert!(!creds.verify("otro@maitreya.test", "secreto"));
        assert!(!creds.verify("cocina@maitreya.test", "nope"));

        let disabled = StaffCredentials {
            email: "cocina@maitreya.test".to_string(),
            password_hash: None,
        };
        assert!(!disabled.verify("cocina@maitreya.test", "secreto"));
    }
}
