use crate::{Error, Result};
use ed25519_dalek::{PublicKey, Signature};

/// Checks a Discord webhook signature, the ed25519 signature of `timestamp || raw_body`.
/// Any malformed input counts as a failed verification.
pub fn verify(raw_body: &[u8], signature_hex: &str, timestamp: &str, public_key_hex: &str) -> bool {
    match decode_public_key(public_key_hex) {
        Ok(public_key) => check_signature(&public_key, raw_body, signature_hex, timestamp).is_ok(),
        Err(_) => false,
    }
}

pub fn decode_public_key(public_key_hex: &str) -> Result<PublicKey> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(public_key_hex.trim(), &mut bytes).map_err(Error::InvalidPublicKeyFormat)?;

    PublicKey::from_bytes(&bytes).map_err(Error::InvalidPublicKey)
}

fn check_signature(
    public_key: &PublicKey,
    raw_body: &[u8],
    signature_hex: &str,
    timestamp: &str,
) -> Result<()> {
    let mut bytes = [0u8; 64];
    hex::decode_to_slice(signature_hex, &mut bytes)?;
    let signature = Signature::try_from(&bytes[..])?;

    let body_with_timestamp: Vec<u8> = timestamp
        .as_bytes()
        .iter()
        .copied()
        .chain(raw_body.iter().copied())
        .collect();

    public_key.verify_strict(&body_with_timestamp, &signature)?;
    Ok(())
}

/// Holds the application public key, decoded once at startup
#[derive(Clone, Debug)]
pub struct Verifier {
    public_key: Option<PublicKey>,
}

impl Verifier {
    pub fn new(public_key: Option<PublicKey>) -> Verifier {
        Verifier { public_key }
    }

    /// An absent or blank key gives a verifier that rejects everything
    pub fn from_hex(public_key_hex: Option<&str>) -> Result<Verifier> {
        let public_key = match public_key_hex.map(str::trim) {
            Some(hex) if !hex.is_empty() => Some(decode_public_key(hex)?),
            _ => None,
        };

        Ok(Verifier::new(public_key))
    }

    pub fn is_configured(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn check(
        &self,
        raw_body: &[u8],
        signature_hex: Option<&str>,
        timestamp: Option<&str>,
    ) -> Result<()> {
        let public_key = self.public_key.as_ref().ok_or(Error::MissingPublicKey)?;

        match (signature_hex, timestamp) {
            (Some(signature_hex), Some(timestamp)) => {
                check_signature(public_key, raw_body, signature_hex, timestamp)
            }
            _ => Err(Error::MissingSignatureHeaders),
        }
    }
}
