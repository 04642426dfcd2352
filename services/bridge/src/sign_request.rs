use crate::constants::{X_PUBKEY, X_SIGNATURE};
use crate::Credential;
use bridge_core::{BasicAuth, Error, ErrorKind, OutgoingRequest, Result, SigningRequest};
use http::HeaderValue;
use log::debug;

/// RequestSigner attaches Bridge authentication to outgoing requests.
///
/// - Key pair: ECDSA signature over `METHOD\nURL\nPAYLOAD`, sent as
///   `x-pubkey` and `x-signature` headers.
/// - Basic auth: email as user and the password digest as pass.
/// - None: the request is left as is.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    base_uri: String,
}

impl RequestSigner {
    /// Create a new signer for requests against `base_uri`.
    pub fn new(base_uri: &str) -> Self {
        Self {
            base_uri: base_uri.to_string(),
        }
    }

    /// Resolve `req` against the base URI and attach authentication for `credential`.
    ///
    /// `req` is never modified; method, url, query and body of the returned
    /// request are the ones of `req`.
    pub fn sign_request(
        &self,
        req: &OutgoingRequest,
        credential: &Credential,
    ) -> Result<SigningRequest> {
        let mut signing_req = SigningRequest::build(req, &self.base_uri)?;

        match credential {
            Credential::KeyPair(key_pair) => {
                let contract = signing_req.contract()?;
                debug!("contract to sign: {contract:?}");

                let signature = key_pair.sign(contract.as_bytes()).map_err(|e| {
                    if e.kind() == ErrorKind::SigningFailed {
                        e
                    } else {
                        Error::signing_failed("key pair failed to sign contract").with_source(e)
                    }
                })?;

                signing_req
                    .headers
                    .insert(X_PUBKEY, HeaderValue::from_str(&key_pair.public_key())?);
                signing_req
                    .headers
                    .insert(X_SIGNATURE, HeaderValue::from_str(&signature)?);
            }
            Credential::BasicAuth(cred) => {
                signing_req.basic_auth = Some(BasicAuth {
                    user: cred.email().to_string(),
                    pass: cred.password_digest().to_string(),
                });
            }
            Credential::None => {}
        }

        Ok(signing_req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicAuthCredential, Secp256k1KeyPair};
    use bridge_core::hash::{sha256, Encoding};
    use bridge_core::KeyPair;
    use k256::ecdsa::signature::Verifier;
    use k256::ecdsa::{Signature, VerifyingKey};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use test_case::test_case;

    const BASE_URI: &str = "https://api.example.com";

    #[derive(Debug)]
    struct BrokenKeyPair;

    impl KeyPair for BrokenKeyPair {
        fn public_key(&self) -> String {
            "02".repeat(33)
        }

        fn sign(&self, _: &[u8]) -> Result<String> {
            Err(Error::unexpected("hardware wallet disconnected"))
        }
    }

    fn verify(headers: &http::HeaderMap, contract: &str) -> anyhow::Result<()> {
        let public_key = hex::decode(headers[&X_PUBKEY].to_str()?)?;
        let signature = hex::decode(headers[&X_SIGNATURE].to_str()?)?;

        let verifying_key = VerifyingKey::from_sec1_bytes(&public_key)?;
        verifying_key.verify(contract.as_bytes(), &Signature::from_der(&signature)?)?;
        Ok(())
    }

    #[test]
    fn test_sign_get_with_key_pair() -> anyhow::Result<()> {
        let key_pair = Secp256k1KeyPair::generate();
        let credential = Credential::KeyPair(Arc::new(key_pair.clone()));
        let req = OutgoingRequest::new(http::Method::GET, "/buckets").with_query("a", "1");

        let signed = RequestSigner::new(BASE_URI).sign_request(&req, &credential)?;

        let contract = signed.contract()?;
        assert_eq!(contract, "GET\nhttps://api.example.com/buckets\na=1");
        assert_eq!(signed.headers[&X_PUBKEY], key_pair.public_key().as_str());
        verify(&signed.headers, &contract)?;

        assert_eq!(signed.query, req.query);
        assert_eq!(signed.body, None);
        assert!(signed.basic_auth.is_none());
        Ok(())
    }

    #[test_case(http::Method::POST, "POST\nhttps://api.example.com/buckets\n{\"name\":\"photos\",\"pubkeys\":[\"02ab\"]}")]
    #[test_case(http::Method::PATCH, "PATCH\nhttps://api.example.com/buckets\n{\"name\":\"photos\",\"pubkeys\":[\"02ab\"]}")]
    fn test_sign_body_with_key_pair(method: http::Method, expected: &str) {
        let credential = Credential::KeyPair(Arc::new(Secp256k1KeyPair::generate()));
        let body = json!({"pubkeys": ["02ab"], "name": "photos"});
        let req = OutgoingRequest::new(method, "/buckets")
            .with_body(body.clone())
            .with_query("ignored", "x");

        let signed = RequestSigner::new(BASE_URI)
            .sign_request(&req, &credential)
            .expect("sign must succeed");

        assert_eq!(signed.contract().unwrap(), expected);
        verify(&signed.headers, expected).expect("signature must verify");
        assert_eq!(signed.body, Some(body));
    }

    #[test]
    fn test_sign_delete_without_query() -> anyhow::Result<()> {
        let credential = Credential::KeyPair(Arc::new(Secp256k1KeyPair::generate()));
        let req = OutgoingRequest::new(http::Method::DELETE, "/buckets/5a2f");

        let signed = RequestSigner::new(BASE_URI).sign_request(&req, &credential)?;

        let contract = signed.contract()?;
        assert_eq!(contract, "DELETE\nhttps://api.example.com/buckets/5a2f\n");
        verify(&signed.headers, &contract)?;
        Ok(())
    }

    #[test]
    fn test_sign_with_basic_auth() -> anyhow::Result<()> {
        let digest = sha256("secret", Encoding::Utf8)?;
        let credential = Credential::BasicAuth(BasicAuthCredential::from_digest("a@b.com", &digest));
        let req = OutgoingRequest::new(http::Method::GET, "/buckets");

        let signed = RequestSigner::new(BASE_URI).sign_request(&req, &credential)?;

        let auth = signed.basic_auth.expect("basic auth must be attached");
        assert_eq!(auth.user, "a@b.com");
        assert_eq!(auth.pass, digest);
        assert_ne!(auth.pass, "secret");
        assert!(signed.headers.get(&X_PUBKEY).is_none());
        assert!(signed.headers.get(&X_SIGNATURE).is_none());
        Ok(())
    }

    #[test]
    fn test_sign_without_credential() -> Result<()> {
        let req = OutgoingRequest::new(http::Method::GET, "/").with_query("a", "1");

        let signed = RequestSigner::new(BASE_URI).sign_request(&req, &Credential::None)?;

        assert!(signed.headers.is_empty());
        assert!(signed.basic_auth.is_none());
        assert_eq!(signed.url, "https://api.example.com/");
        Ok(())
    }

    #[test]
    fn test_signing_failed() {
        let credential = Credential::KeyPair(Arc::new(BrokenKeyPair));
        let req = OutgoingRequest::new(http::Method::GET, "/buckets");

        let err = RequestSigner::new(BASE_URI)
            .sign_request(&req, &credential)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningFailed);
    }

    #[test_case(http::Method::PUT)]
    #[test_case(http::Method::HEAD)]
    fn test_unsupported_method(method: http::Method) {
        let credential = Credential::KeyPair(Arc::new(BrokenKeyPair));
        let req = OutgoingRequest::new(method, "/buckets");

        // Method is checked before the key pair is asked to sign.
        let err = RequestSigner::new(BASE_URI)
            .sign_request(&req, &credential)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
    }
}
