//! Nonce challenge-response handshake.
//!
//! Every call to the record store carries a fresh random challenge. The store
//! answers with an ed25519 signature over the raw challenge bytes, made with
//! its long-lived identity key. A reply is trusted only after that signature
//! verifies against the configured identity.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use quorum_core::{ConfigError, RpcError};
use rand::RngCore;

/// Size of a challenge in bytes.
pub const CHALLENGE_SIZE: usize = 32;

/// A random nonce sent with one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge([u8; CHALLENGE_SIZE]);

impl Challenge {
    /// Generate a fresh random challenge.
    pub fn random() -> Self {
        let mut bytes = [0u8; CHALLENGE_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap known bytes. Test fixtures use this to sign a specific nonce.
    pub fn from_bytes(bytes: [u8; CHALLENGE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CHALLENGE_SIZE] {
        &self.0
    }

    /// Hex encoding used on the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode a wire challenge.
    pub fn from_hex(encoded: &str) -> Option<Self> {
        let bytes = hex::decode(encoded).ok()?;
        let array: [u8; CHALLENGE_SIZE] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

/// Long-lived identity of the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    key: VerifyingKey,
}

impl ServerIdentity {
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Parse a hex encoded ed25519 public key.
    pub fn from_hex(encoded: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "identity".to_string(),
            value: encoded.to_string(),
            reason: reason.to_string(),
        };

        let bytes = hex::decode(encoded.trim()).map_err(|_| invalid("must be hex encoded"))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| invalid("must encode exactly 32 bytes"))?;
        let key = VerifyingKey::from_bytes(&array).map_err(|_| invalid("not an ed25519 point"))?;
        Ok(Self { key })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Verify that `response` is this identity's signature over `challenge`.
    pub fn verify(&self, challenge: &Challenge, response: &str) -> Result<(), RpcError> {
        let failure = |reason: String| RpcError::ChallengeVerificationFailure { reason };

        let raw = hex::decode(response.trim())
            .map_err(|e| failure(format!("response is not hex: {}", e)))?;
        let signature = Signature::from_slice(&raw)
            .map_err(|e| failure(format!("malformed signature: {}", e)))?;

        self.key
            .verify(challenge.as_bytes(), &signature)
            .map_err(|_| failure("signature does not match challenge".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn test_challenges_are_fresh() {
        let a = Challenge::random();
        let b = Challenge::random();
        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), CHALLENGE_SIZE * 2);
    }

    #[test]
    fn test_challenge_hex_roundtrip() {
        let challenge = Challenge::from_bytes([7u8; CHALLENGE_SIZE]);
        assert_eq!(Challenge::from_hex(&challenge.to_hex()), Some(challenge));
        assert_eq!(Challenge::from_hex("abcd"), None);
        assert_eq!(Challenge::from_hex("zz"), None);
    }

    #[test]
    fn test_verify_accepts_matching_signature() {
        let key = signing_key(1);
        let identity = ServerIdentity::new(key.verifying_key());
        let challenge = Challenge::random();
        let response = hex::encode(key.sign(challenge.as_bytes()).to_bytes());

        assert!(identity.verify(&challenge, &response).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let identity = ServerIdentity::new(signing_key(1).verifying_key());
        let impostor = signing_key(2);
        let challenge = Challenge::random();
        let response = hex::encode(impostor.sign(challenge.as_bytes()).to_bytes());

        let err = identity.verify(&challenge, &response).unwrap_err();
        assert!(matches!(err, RpcError::ChallengeVerificationFailure { .. }));
    }

    #[test]
    fn test_verify_rejects_replayed_response() {
        let key = signing_key(1);
        let identity = ServerIdentity::new(key.verifying_key());
        let old = Challenge::random();
        let response = hex::encode(key.sign(old.as_bytes()).to_bytes());

        let fresh = Challenge::random();
        assert!(identity.verify(&fresh, &response).is_err());
    }

    #[test]
    fn test_verify_rejects_malformed_response() {
        let identity = ServerIdentity::new(signing_key(1).verifying_key());
        let challenge = Challenge::random();

        assert!(identity.verify(&challenge, "not hex").is_err());
        assert!(identity.verify(&challenge, "abcd").is_err());
        assert!(identity.verify(&challenge, "").is_err());
    }

    #[test]
    fn test_identity_from_hex() {
        let key = signing_key(3);
        let encoded = hex::encode(key.verifying_key().as_bytes());
        let identity = ServerIdentity::from_hex(&encoded).unwrap();
        assert_eq!(identity.verifying_key(), &key.verifying_key());

        assert!(ServerIdentity::from_hex("abcd").is_err());
        assert!(ServerIdentity::from_hex("xyz").is_err());
    }
}
