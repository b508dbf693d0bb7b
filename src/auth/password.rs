use bcrypt::{DEFAULT_COST, hash, verify};
use std::sync::OnceLock;

pub fn hash_password(plain: &str) -> Result<String, String> {
    hash(plain, DEFAULT_COST).map_err(|e| format!("Failed to hash password: {e}"))
}

/// Check `plain` against a stored bcrypt hash. Malformed hashes count as a mismatch.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}

/// Burn the same bcrypt work as a real check so a login for an unknown user
/// takes as long as one with a wrong password.
pub fn verify_against_dummy(plain: &str) {
    static DUMMY: OnceLock<String> = OnceLock::new();
    let dummy = DUMMY.get_or_init(|| hash("dummy-password-for-timing", DEFAULT_COST).unwrap_or_default());
    let _ = verify(plain, dummy);
}
