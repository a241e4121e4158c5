//! Password hashing and verification.
//!
//! Digests are self-describing: `pbkdf2_sha256$<iterations>$<salt>$<dk>`,
//! so the iteration count can evolve without invalidating stored records.
//! Verification fails closed on any malformed record and compares derived
//! keys in constant time.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use cutroom_core::AppError;
use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const ALGORITHM_TAG: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count for new digests.
pub const DEFAULT_ITERATIONS: u32 = 390_000;

#[derive(Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Derive a salted digest record for a raw password.
    ///
    /// A fresh random salt is generated per call, so hashing the same
    /// password twice yields two different records.
    pub fn hash(&self, raw: &str) -> Result<String, AppError> {
        if raw.is_empty() {
            return Err(AppError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        use rand::Rng;
        let mut rng = rand::rng();
        let salt_bytes: [u8; SALT_LEN] = rng.random();
        // The encoded salt string is the PBKDF2 salt input, so the record
        // alone is enough to re-derive the key.
        let salt = URL_SAFE_NO_PAD.encode(salt_bytes);

        let derived =
            pbkdf2_hmac_array::<Sha256, KEY_LEN>(raw.as_bytes(), salt.as_bytes(), self.iterations);
        let derived_b64 = URL_SAFE_NO_PAD.encode(derived);

        Ok(format!(
            "{}${}${}${}",
            ALGORITHM_TAG, self.iterations, salt, derived_b64
        ))
    }

    /// Verify a raw password against a stored digest record.
    ///
    /// Fails closed (returns false, never errors) on malformed records,
    /// unknown algorithm tags or non-numeric iteration counts. The stored
    /// iteration count is used, not the hasher's configured one.
    pub fn verify(&self, raw: &str, digest: &str) -> bool {
        let mut parts = digest.splitn(4, '$');
        let (Some(algorithm), Some(iterations), Some(salt), Some(stored)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        if algorithm != ALGORITHM_TAG {
            return false;
        }

        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };

        let Ok(stored_key) = URL_SAFE_NO_PAD.decode(stored) else {
            return false;
        };

        let derived =
            pbkdf2_hmac_array::<Sha256, KEY_LEN>(raw.as_bytes(), salt.as_bytes(), iterations);

        stored_key.as_slice().ct_eq(derived.as_slice()).into()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}
