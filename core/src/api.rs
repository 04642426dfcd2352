use crate::Result;
use std::fmt::Debug;

/// KeyPair is the signing capability used by the request signer.
///
/// The signer only ever asks for the public key and for signatures; private key
/// material never leaves the implementation. Any ECDSA backend (in memory keys,
/// hardware wallets, remote signers) can be plugged in by implementing this
/// trait.
pub trait KeyPair: Debug + Send + Sync + 'static {
    /// Hex encoded public key, sent as `x-pubkey`.
    fn public_key(&self) -> String;

    /// Sign `message` and return the hex encoded signature, sent as `x-signature`.
    ///
    /// Implementations should return [`ErrorKind::SigningFailed`](crate::ErrorKind::SigningFailed)
    /// when the signature can't be produced.
    fn sign(&self, message: &[u8]) -> Result<String>;
}
