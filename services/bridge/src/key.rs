use bridge_core::hash::hex_rmd160sha256;
use bridge_core::{Error, KeyPair, Result};
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use std::fmt::{Debug, Formatter};

/// In-memory secp256k1 key pair.
///
/// Signatures are ECDSA over SHA256 of the message, DER encoded. The public
/// key is advertised as a compressed SEC1 point.
#[derive(Clone)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl Secp256k1KeyPair {
    /// Generate a fresh key pair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Load a key pair from a hex encoded 32 bytes private key.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let bytes = hex::decode(private_key.trim()).map_err(|e| {
            Error::config_invalid("private key is not valid hex").with_source(e)
        })?;
        let signing_key = SigningKey::from_slice(&bytes).map_err(|e| {
            Error::config_invalid(format!("private key is not a valid secp256k1 key: {e}"))
        })?;

        Ok(Self { signing_key })
    }

    /// Hex encoded private key.
    pub fn private_key(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Compact identifier derived from the public key: `rmd160sha256(pubkey)`.
    pub fn node_id(&self) -> String {
        hex_rmd160sha256(&self.public_key_bytes())
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .as_affine()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }
}

impl KeyPair for Secp256k1KeyPair {
    fn public_key(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    fn sign(&self, message: &[u8]) -> Result<String> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| Error::signing_failed(format!("failed to sign message: {e}")))?;

        Ok(hex::encode(signature.to_der().as_bytes()))
    }
}
