use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

/// Hash a password with Argon2id and a random salt, producing a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Compare a plaintext password against a stored hash.
///
/// An unparseable stored hash reads as "no match" rather than an error;
/// the login flow treats both identically.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
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
    fn hash_verifies_against_original_plaintext() {
        let password = "secretpw";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash));
        assert_ne!(hash, password);
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("secretpw").unwrap();
        assert!(!verify_password("not-the-password", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let password = "same-password";
        let first = hash_password(password).unwrap();
        let second = hash_password(password).unwrap();

        assert_ne!(first, second);
        assert!(verify_password(password, &first));
        assert!(verify_password(password, &second));
    }

    #[test]
    fn unparseable_hash_reads_as_no_match() {
        assert!(!verify_password("secretpw", "not-a-phc-string"));
    }
}
