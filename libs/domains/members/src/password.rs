//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use std::sync::LazyLock;

use crate::error::{MemberError, MemberResult};

/// Hash checked when the login email matches no member.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no-such-member").ok());

/// Hashes `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> MemberResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| MemberError::PasswordHash(e.to_string()))
}

/// `false` for a wrong password; an unparseable hash is an error.
pub fn verify_password(password: &str, hash: &str) -> MemberResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| MemberError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Verifies `password` against [`DUMMY_HASH`] and discards the outcome.
/// An unknown email then costs the same argon2 work as a wrong password.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("keesun").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("keesun", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_dummy_hash_is_argon2_and_matches_nothing() {
        let hash = DUMMY_HASH.as_deref().unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(!verify_password("keesun", hash).unwrap());
        verify_dummy("keesun");
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(matches!(
            verify_password("x", "not-a-hash"),
            Err(MemberError::PasswordHash(_))
        ));
    }
}
