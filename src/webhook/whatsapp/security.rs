//! Payload signature verification for WhatsApp webhooks.
//!
//! Meta signs every webhook body with HMAC-SHA256 keyed by the app secret and
//! sends it as `X-Hub-Signature-256: sha256=<hex>`. The signature covers the
//! raw body bytes, so it has to be checked before JSON parsing.

use derive_more::{Display, Error};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[display("signature header is missing")]
    MissingHeader,
    #[display("signature header must start with 'sha256='")]
    InvalidFormat,
    #[display("signature is not valid hex")]
    InvalidHex,
    #[display("signature does not match payload")]
    Mismatch,
    #[display("app secret cannot be used as hmac key")]
    InvalidKey,
}

impl SignatureError {
    /// Stable label of the failure, for grouping rejected deliveries.
    pub fn reason(&self) -> &'static str {
        match self {
            SignatureError::MissingHeader => "missing_header",
            SignatureError::InvalidFormat => "invalid_format",
            SignatureError::InvalidHex => "invalid_hex",
            SignatureError::Mismatch => "mismatch",
            SignatureError::InvalidKey => "invalid_key",
        }
    }
}

fn compute_signature(payload: &[u8], app_secret: &str) -> Result<Vec<u8>, SignatureError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(app_secret.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Builds the `X-Hub-Signature-256` value of a payload.
pub fn sign(payload: &[u8], app_secret: &str) -> Result<String, SignatureError> {
    Ok(format!(
        "sha256={}",
        hex::encode(compute_signature(payload, app_secret)?)
    ))
}

/// Verifies a signature header against the raw request body, comparing in
/// constant time.
pub fn verify_signature(
    signature_header: Option<&str>,
    payload: &[u8],
    app_secret: &str,
) -> Result<(), SignatureError> {
    let signature_hex = signature_header
        .ok_or(SignatureError::MissingHeader)?
        .strip_prefix("sha256=")
        .ok_or(SignatureError::InvalidFormat)?;

    let expected_signature = hex::decode(signature_hex).map_err(|_| SignatureError::InvalidHex)?;

    let computed_signature = compute_signature(payload, app_secret)?;
    if bool::from(computed_signature.as_slice().ct_eq(expected_signature.as_slice())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &[u8] = br#"{"object":"whatsapp_business_account","entry":[]}"#;
    const SECRET: &str = "test_secret";

    #[test]
    fn test_verify_signature_valid() {
        let header = sign(PAYLOAD, SECRET).unwrap();
        assert_eq!(verify_signature(Some(&header), PAYLOAD, SECRET), Ok(()));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let header = sign(PAYLOAD, "wrong_secret").unwrap();
        assert_eq!(
            verify_signature(Some(&header), PAYLOAD, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_verify_signature_tampered_payload() {
        let header = sign(PAYLOAD, SECRET).unwrap();
        let tampered = br#"{"object":"whatsapp_business_account","entry":[{}]}"#;
        assert_eq!(
            verify_signature(Some(&header), tampered, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_verify_signature_truncated() {
        let header = sign(PAYLOAD, SECRET).unwrap();
        assert_eq!(
            verify_signature(Some(&header[..header.len() - 2]), PAYLOAD, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_verify_signature_bad_header() {
        assert_eq!(
            verify_signature(None, PAYLOAD, SECRET),
            Err(SignatureError::MissingHeader)
        );
        assert_eq!(
            verify_signature(Some("sha1=abc123"), PAYLOAD, SECRET),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            verify_signature(Some("sha256=zzzzz"), PAYLOAD, SECRET),
            Err(SignatureError::InvalidHex)
        );
    }

    #[test]
    fn test_rejection_reason() {
        let header = sign(PAYLOAD, "wrong_secret").unwrap();
        let error = verify_signature(Some(&header), PAYLOAD, SECRET).unwrap_err();
        assert_eq!(error.reason(), "mismatch");
        assert_eq!(
            verify_signature(None, PAYLOAD, SECRET).unwrap_err().reason(),
            "missing_header"
        );
    }
}
