use crate::constants::*;
use crate::{BasicAuthCredential, Credential};
use bridge_core::utils::Redact;
use bridge_core::{Context, Error, KeyPair, Result};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Options for building a bridge client.
///
/// Every field is optional. [`ClientConfig::resolve`] turns them into the
/// immutable configuration used by the client.
#[derive(Clone, Default)]
pub struct Config {
    /// Base URI of the Bridge, e.g. `https://api.storj.io`.
    pub base_uri: Option<String>,
    /// Key pair used to sign requests. Takes precedence over email/password.
    pub key_pair: Option<Arc<dyn KeyPair>>,
    /// Account email for basic auth.
    pub email: Option<String>,
    /// Account password for basic auth, hashed before use.
    pub password: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_uri", &self.base_uri)
            .field("key_pair", &self.key_pair)
            .field("email", &self.email)
            .field("password", &Redact::full(&self.password))
            .finish()
    }
}

impl Config {
    /// Set the key pair used to sign requests.
    pub fn with_key_pair(mut self, key_pair: impl KeyPair) -> Self {
        self.key_pair = Some(Arc::new(key_pair));
        self
    }

    /// Set the email and password used for basic auth.
    pub fn with_basic_auth(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }
}

/// Resolved, read-only configuration of a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_uri: String,
    credential: Credential,
}

impl ClientConfig {
    /// Resolve options into a client configuration.
    ///
    /// The base URI is taken from, in order: `config.base_uri`, the `uri`
    /// argument, the `STORJ_BRIDGE` env var, and finally
    /// `https://api.storj.io`.
    ///
    /// A key pair wins over email/password when both are given.
    pub fn resolve(ctx: &Context, uri: Option<&str>, config: Config) -> Result<Self> {
        let base_uri = config
            .base_uri
            .or_else(|| uri.map(|v| v.to_string()))
            .or_else(|| ctx.env_var(BRIDGE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string());
        let base_uri = normalize_base_uri(&base_uri)?;

        let credential = match (config.key_pair, config.email, config.password) {
            (Some(key_pair), email, _) => {
                if email.is_some() {
                    debug!("both key pair and basic auth configured, using key pair");
                }
                Credential::KeyPair(key_pair)
            }
            (None, Some(email), Some(password)) => {
                Credential::BasicAuth(BasicAuthCredential::new(email, &password))
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(Error::config_invalid(
                    "email and password must be configured together",
                ))
            }
            (None, None, None) => Credential::None,
        };

        debug!("bridge client configured for {base_uri}");
        Ok(Self {
            base_uri,
            credential,
        })
    }

    /// Base URI without trailing slash.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Active credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

fn normalize_base_uri(input: &str) -> Result<String> {
    let base_uri = input.trim().trim_end_matches('/');

    let uri: http::Uri = base_uri.parse().map_err(|e| {
        Error::config_invalid(format!("base uri {base_uri:?} is invalid")).with_source(e)
    })?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => {
            return Err(Error::config_invalid(format!(
                "base uri {base_uri:?} must use http or https"
            )))
        }
    }
    if uri.authority().is_none() {
        return Err(Error::config_invalid(format!(
            "base uri {base_uri:?} has no host"
        )));
    }
    if uri.query().is_some() {
        return Err(Error::config_invalid(format!(
            "base uri {base_uri:?} must not carry a query"
        )));
    }

    Ok(base_uri.to_string())
}
