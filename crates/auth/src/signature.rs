//! HMAC-SHA256 signing and constant-time verification of the signing input.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of an HMAC-SHA256 tag.
pub const SIGNATURE_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningKeyError {
    #[error("signing key must not be empty")]
    Empty,

    #[error("signing key rejected by HMAC")]
    Rejected,
}

/// Process-wide symmetric secret used to sign and verify tokens.
///
/// Holds the keyed HMAC state built once at startup; every signature starts
/// from a clone of it. `Debug` never prints the key material.
#[derive(Clone)]
pub struct SigningKey {
    keyed: HmacSha256,
}

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SigningKeyError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SigningKeyError::Empty);
        }
        let keyed = HmacSha256::new_from_slice(&bytes).map_err(|_| SigningKeyError::Rejected)?;
        Ok(Self { keyed })
    }

    fn mac(&self) -> HmacSha256 {
        self.keyed.clone()
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Compute the HMAC-SHA256 tag over the UTF-8 bytes of `signing_input`.
pub fn sign(signing_input: &str, key: &SigningKey) -> [u8; SIGNATURE_LEN] {
    let mut mac = key.mac();
    mac.update(signing_input.as_bytes());
    mac.finalize().into_bytes().into()
}

/// Recompute the tag and compare it to `signature` without early exit on
/// content. Any length or content mismatch yields `false`.
pub fn verify(signing_input: &str, signature: &[u8], key: &SigningKey) -> bool {
    let expected = sign(signing_input, key);
    if signature.len() != expected.len() {
        return false;
    }
    expected.ct_eq(signature).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SigningKey {
        SigningKey::new("test-secret").unwrap()
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            SigningKey::new(Vec::<u8>::new()),
            Err(SigningKeyError::Empty)
        ));
    }

    #[test]
    fn cloned_key_signs_identically() {
        let key = key();
        let copy = key.clone();
        assert_eq!(sign("a.b", &key), sign("a.b", &copy));
        // The shared keyed state is not consumed by signing.
        assert_eq!(sign("a.b", &key), sign("a.b", &key));
    }

    #[test]
    fn debug_output_is_redacted() {
        let rendered = format!("{:?}", key());
        assert!(!rendered.contains("test-secret"));
    }

    #[test]
    fn matches_rfc4231_case_2() {
        // Key "Jefe", data "what do ya want for nothing?".
        let key = SigningKey::new("Jefe").unwrap();
        let tag = sign("what do ya want for nothing?", &key);
        let hex: String = tag.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn verify_accepts_own_signature() {
        let tag = sign("a.b", &key());
        assert!(verify("a.b", &tag, &key()));
    }

    #[test]
    fn verify_rejects_other_key() {
        let tag = sign("a.b", &key());
        let other = SigningKey::new("other-secret").unwrap();
        assert!(!verify("a.b", &tag, &other));
    }

    #[test]
    fn verify_rejects_truncated_and_extended_tags() {
        let tag = sign("a.b", &key());
        assert!(!verify("a.b", &tag[..31], &key()));

        let mut longer = tag.to_vec();
        longer.push(0);
        assert!(!verify("a.b", &longer, &key()));
        assert!(!verify("a.b", &[], &key()));
    }

    #[test]
    fn verify_rejects_each_single_byte_flip() {
        let tag = sign("header.claims", &key());
        for i in 0..tag.len() {
            let mut tampered = tag;
            tampered[i] ^= 0x01;
            assert!(!verify("header.claims", &tampered, &key()), "byte {i}");
        }
    }
}
