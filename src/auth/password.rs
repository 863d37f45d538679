use tracing::error;

/// bcrypt work factor; each hash gets its own random salt.
const HASH_COST: u32 = 10;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Verify a plaintext password against a stored hash. A malformed hash is
/// an error here; callers collapse it into the same rejection as a wrong
/// password so the client sees one failure mode.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
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
    fn same_password_hashes_differently() {
        let password = "root1234";
        let a = hash_password(password).expect("hashing should succeed");
        let b = hash_password(password).expect("hashing should succeed");
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
