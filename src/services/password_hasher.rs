use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version,
};

/// One-way salted hashing and verification of credentials
///
/// The configured cost factor is the Argon2id iteration count; higher
/// values slow every hash and verification. The cost is baked into each
/// digest, so verification works across cost changes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the given cost factor
    ///
    /// # Errors
    /// Returns an error for a cost factor the primitive rejects. Callers
    /// validate the configured value at startup, so this is fatal there.
    pub fn new(cost_factor: u32) -> Result<Self, argon2::Error> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost_factor,
            Params::DEFAULT_P_COST,
            None,
        )?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)?
            .to_string())
    }

    /// Verify a plaintext password against a stored digest
    ///
    /// Comparison is delegated to the argon2 primitive; an unparseable
    /// digest verifies as false rather than erroring.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish()
    }
}
