//! Password hashing and access tokens
//!
//! Both are capabilities behind traits so the services never depend on a
//! concrete algorithm. The defaults are an iterated salted SHA-256 hasher and
//! an Ed25519-signed token.

use chrono::{Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Hashes and verifies passwords. The hash string is opaque to callers.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> String;

    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Salted SHA-256, iterated.
///
/// Encoded as `sha256$<iterations>$<salt hex>$<digest hex>`.
pub struct Sha256PasswordHasher {
    iterations: u32,
}

impl Sha256PasswordHasher {
    pub const DEFAULT_ITERATIONS: u32 = 10_000;
    const SALT_LEN: usize = 16;

    pub fn new() -> Self {
        Self::with_iterations(Self::DEFAULT_ITERATIONS)
    }

    /// Lower counts make tests fast
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    fn digest(salt: &[u8], plaintext: &str, iterations: u32) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(plaintext.as_bytes());
        let mut digest = hasher.finalize();

        for _ in 1..iterations {
            let mut hasher = Sha256::new();
            hasher.update(salt);
            hasher.update(digest);
            digest = hasher.finalize();
        }
        digest.to_vec()
    }
}

impl Default for Sha256PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, plaintext: &str) -> String {
        let mut salt = [0u8; Self::SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, plaintext, self.iterations);
        format!(
            "sha256${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        )
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parts: Vec<&str> = hash.split('$').collect();
        let [scheme, iterations, salt, expected] = parts.as_slice() else {
            return false;
        };
        if *scheme != "sha256" {
            return false;
        }
        let (Ok(iterations), Ok(salt), Ok(expected)) = (
            iterations.parse::<u32>(),
            hex::decode(salt),
            hex::decode(expected),
        ) else {
            return false;
        };

        let actual = Self::digest(&salt, plaintext, iterations.max(1));
        // Compare every byte so the timing does not depend on the prefix
        actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected.iter())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

/// Token verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the subject
    pub sub: String,
    pub role: String,
    /// Expiry as a unix timestamp (seconds)
    pub exp: i64,
}

/// Issues and verifies access tokens
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, AuthError>;

    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Ed25519-signed JSON claims, formatted `<payload hex>.<signature hex>`
pub struct Ed25519TokenIssuer {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519TokenIssuer {
    /// Create from a 32-byte seed (hex-encoded)
    pub fn from_hex(hex_seed: &str) -> Result<Self, AuthError> {
        let bytes = hex::decode(hex_seed.trim())
            .map_err(|e| AuthError::InvalidKey(format!("Invalid key hex: {}", e)))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AuthError::InvalidKey("Key must be 32 bytes".to_string()))?;

        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    /// Generate a new random signing key
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_signing_key(SigningKey::generate(&mut rng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.to_bytes())
    }
}

impl TokenIssuer for Ed25519TokenIssuer {
    fn issue(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| AuthError::Malformed(e.to_string()))?;
        let signature = self.signing_key.sign(&payload);

        Ok(format!(
            "{}.{}",
            hex::encode(&payload),
            hex::encode(signature.to_bytes())
        ))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let (payload_hex, sig_hex) = token
            .trim()
            .split_once('.')
            .ok_or_else(|| AuthError::Malformed("missing signature".to_string()))?;

        let payload =
            hex::decode(payload_hex).map_err(|e| AuthError::Malformed(e.to_string()))?;
        let sig_bytes = hex::decode(sig_hex).map_err(|e| AuthError::Malformed(e.to_string()))?;
        let sig_array: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| AuthError::Malformed("Signature must be 64 bytes".to_string()))?;

        self.verifying_key
            .verify(&payload, &Signature::from_bytes(&sig_array))
            .map_err(|_| AuthError::BadSignature)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|e| AuthError::Malformed(e.to_string()))?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify() {
        let hasher = Sha256PasswordHasher::with_iterations(10);
        let hash = hasher.hash("hunter2");

        assert!(hash.starts_with("sha256$10$"));
        assert!(hasher.verify("hunter2", &hash));
        assert!(!hasher.verify("hunter3", &hash));
    }

    #[test]
    fn test_same_password_different_salt() {
        let hasher = Sha256PasswordHasher::with_iterations(1);
        assert_ne!(hasher.hash("pw"), hasher.hash("pw"));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let hasher = Sha256PasswordHasher::with_iterations(1);
        assert!(!hasher.verify("pw", ""));
        assert!(!hasher.verify("pw", "md5$1$aa$bb"));
        assert!(!hasher.verify("pw", "sha256$x$zz$zz"));
    }

    #[test]
    fn test_token_roundtrip() {
        let issuer = Ed25519TokenIssuer::generate();
        let token = issuer.issue("alice", "CLIENT", Duration::minutes(5)).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "CLIENT");
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let issuer = Ed25519TokenIssuer::generate();
        let other = Ed25519TokenIssuer::generate();
        let token = other.issue("alice", "ADMIN", Duration::minutes(5)).unwrap();

        assert_eq!(issuer.verify(&token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = Ed25519TokenIssuer::generate();
        let token = issuer.issue("alice", "CLIENT", Duration::minutes(5)).unwrap();
        let (_, sig) = token.split_once('.').unwrap();

        let forged = serde_json::to_vec(&Claims {
            sub: "alice".into(),
            role: "ADMIN".into(),
            exp: i64::MAX,
        })
        .unwrap();
        let forged_token = format!("{}.{}", hex::encode(forged), sig);
        assert_eq!(issuer.verify(&forged_token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = Ed25519TokenIssuer::generate();
        let token = issuer.issue("alice", "CLIENT", Duration::minutes(-1)).unwrap();
        assert_eq!(issuer.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_seeded_issuer_is_deterministic() {
        let seed = "11".repeat(32);
        let a = Ed25519TokenIssuer::from_hex(&seed).unwrap();
        let b = Ed25519TokenIssuer::from_hex(&seed).unwrap();
        assert_eq!(a.public_key_hex(), b.public_key_hex());

        let token = a.issue("bob", "BANKER", Duration::minutes(1)).unwrap();
        assert!(b.verify(&token).is_ok());
        assert!(matches!(
            Ed25519TokenIssuer::from_hex("abcd"),
            Err(AuthError::InvalidKey(_))
        ));
    }
}
