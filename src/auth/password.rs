//! Password hashing with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::error::{AuthError, AuthResult};

/// Hash a password using Argon2id with a fresh CSPRNG salt.
///
/// The salt is embedded in the returned PHC string, so two hashes of the
/// same password never compare equal.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// Returns `false` for a wrong password or an unparsable hash; never errors
/// on merely-wrong input. The comparison inside the argon2 crate is
/// constant-time.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("cat").unwrap();
        assert_ne!(hash, "cat");
        assert!(verify_password("cat", &hash));
        assert!(!verify_password("dog", &hash));
    }

    #[test]
    fn test_salts_are_random() {
        let a = hash_password("cat").unwrap();
        let b = hash_password("cat").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_verifies_false() {
        assert!(!verify_password("cat", "not-a-phc-string"));
        assert!(!verify_password("cat", ""));
    }
}
