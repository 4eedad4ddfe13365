use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use sha2::{Digest, Sha256};

use crate::errors::AuthError;

const VERIFIER_BYTES: usize = 32;

pub(super) fn generate_code_verifier() -> Result<String, AuthError> {
    let rng = ring::rand::SystemRandom::new();
    let mut verifier = vec![0u8; VERIFIER_BYTES];
    rng.fill(&mut verifier)
        .map_err(|_| AuthError::Crypto("Failed to generate code verifier".to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(verifier))
}

/// S256 challenge for `verifier`
pub(super) fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}
