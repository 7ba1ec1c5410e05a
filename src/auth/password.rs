use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Complexity policy for registration. Returns every violated rule so the
/// client can show them all at once.
pub fn policy_violations(plain: &str) -> Vec<String> {
    let mut violations = Vec::new();
    if plain.len() < 8 {
        violations.push("Password must be at least 8 characters long".into());
    }
    if !plain.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("Password must contain an uppercase letter".into());
    }
    if !plain.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("Password must contain a lowercase letter".into());
    }
    if !plain.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain a digit".into());
    }
    if !plain.chars().any(|c| !c.is_ascii_alphanumeric()) {
        violations.push("Password must contain a special character".into());
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn policy_accepts_complex_password() {
        assert!(policy_violations("Aurora#2026").is_empty());
    }

    #[test]
    fn policy_lists_every_violation_for_weak_password() {
        let violations = policy_violations("abc");
        // too short, no uppercase, no digit, no special
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn policy_flags_missing_character_classes() {
        assert_eq!(policy_violations("alllowercase1!").len(), 1);
        assert_eq!(policy_violations("ALLUPPERCASE1!").len(), 1);
        assert_eq!(policy_violations("NoDigitsHere!").len(), 1);
        assert_eq!(policy_violations("NoSpecials123").len(), 1);
    }
}
