//! HMAC-SHA256 signatures for marketplace webhooks
//!
//! Signature = hex(HMAC-SHA256(secret, "{timestamp}.{body}")).

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, PartialEq)]
pub enum SignatureError {
    #[error("HMAC error: {0}")]
    HmacError(String),
    #[error("Request timestamp out of tolerance window")]
    StaleTimestamp,
    #[error("Invalid signature")]
    InvalidSignature,
}

#[derive(Debug, Clone)]
pub struct WebhookSigner {
    secret: String,
    timestamp_tolerance: i64,
}

impl WebhookSigner {
    pub fn new(secret: String, timestamp_tolerance: i64) -> Self {
        Self { secret, timestamp_tolerance }
    }

    pub fn sign(&self, timestamp: i64, body: &[u8]) -> Result<String, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| SignatureError::HmacError(e.to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn verify(&self, timestamp: i64, body: &[u8], signature: &str) -> Result<(), SignatureError> {
        let diff = (Utc::now().timestamp() - timestamp).abs();
        if diff > self.timestamp_tolerance {
            return Err(SignatureError::StaleTimestamp);
        }

        let provided = hex::decode(signature.trim()).map_err(|_| SignatureError::InvalidSignature)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| SignatureError::HmacError(e.to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        mac.verify_slice(&provided).map_err(|_| SignatureError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify() {
        let signer = WebhookSigner::new("olx-secret".to_string(), 300);
        let now = Utc::now().timestamp();
        let body = br#"{"listId":"123"}"#;

        let signature = signer.sign(now, body).unwrap();
        assert!(signer.verify(now, body, &signature).is_ok());
        assert_eq!(
            signer.verify(now, br#"{"listId":"124"}"#, &signature),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn test_stale_timestamp() {
        let signer = WebhookSigner::new("olx-secret".to_string(), 300);
        let old = Utc::now().timestamp() - 3600;
        let signature = signer.sign(old, b"{}").unwrap();
        assert_eq!(signer.verify(old, b"{}", &signature), Err(SignatureError::StaleTimestamp));
    }
}
