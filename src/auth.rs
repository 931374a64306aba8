//! Password hashing for account credentials.
//!
//! PBKDF2-HMAC-SHA256 with a per-user random salt; salt and derived key are
//! stored base64-encoded on the user record.

use std::num::NonZeroU32;

use base64::Engine;
use ring::rand::SecureRandom;
use ring::{digest, pbkdf2, rand};
use thiserror::Error;

const ITERATIONS: u32 = 100_000;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to generate salt")]
    Rng,
}

/// Base64-encoded salt and derived key for storage on the user record.
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
}

/// Derive a storable hash from a plaintext password.
pub fn hash_password(password: &str) -> Result<PasswordHash, AuthError> {
    let rng = rand::SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| AuthError::Rng)?;

    let mut credential = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(ITERATIONS).expect("iteration count is non-zero"),
        &salt,
        password.as_bytes(),
        &mut credential,
    );

    let engine = base64::engine::general_purpose::STANDARD;
    Ok(PasswordHash {
        salt: engine.encode(salt),
        hash: engine.encode(credential),
    })
}

/// Check a plaintext password against stored salt + hash.
/// Undecodable stored values verify as false rather than erroring.
pub fn verify_password(password: &str, salt_b64: &str, hash_b64: &str) -> bool {
    let engine = base64::engine::general_purpose::STANDARD;
    let Ok(salt) = engine.decode(salt_b64) else {
        return false;
    };
    let Ok(hash) = engine.decode(hash_b64) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(ITERATIONS).expect("iteration count is non-zero"),
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}
