//! Bridge API client
//!
//! Maps method calls to authenticated REST requests against a Bridge.
//! Requests are authenticated with either an ECDSA key pair signature or HTTP
//! basic auth, depending on the configured credential.
//!
//! ## Example
//!
//! ```no_run
//! use bridge_client::{Client, Config, Secp256k1KeyPair};
//! use bridge_core::{Context, OsEnv};
//! use bridge_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> bridge_core::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let key_pair = Secp256k1KeyPair::from_private_key(
//!     "4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d",
//! )?;
//! let client = Client::new(ctx, None, Config::default().with_key_pair(key_pair))?;
//!
//! let buckets = client.get_buckets().await?;
//! println!("{buckets}");
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{BRIDGE_URL_ENV, DEFAULT_BRIDGE_URL, X_PUBKEY, X_SIGNATURE};

mod config;
pub use config::{ClientConfig, Config};

mod credential;
pub use credential::{BasicAuthCredential, Credential};

mod key;
pub use key::Secp256k1KeyPair;

mod sign_request;
pub use sign_request::RequestSigner;

mod client;
pub use client::{
    Client, CreateUserParams, DestroyUserParams, ResetPasswordParams, TokenOperation,
};
