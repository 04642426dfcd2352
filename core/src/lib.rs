//! Core components for talking to the Bridge API.
//!
//! This crate provides the foundational types and traits shared by the bridge
//! client crates.
//!
//! ## Overview
//!
//! - **Hashing**: the [`hash`] module holds the digest helpers used to derive
//!   credential material and identifiers (`sha256`, `rmd160sha256`,
//!   `generate_token`, ...).
//! - **Requests**: [`OutgoingRequest`] describes a call; [`SigningRequest`]
//!   resolves it against a base URI, carries auth and builds the canonical
//!   signing contract.
//! - **Capabilities**: [`KeyPair`] abstracts the ECDSA signer, [`HttpSend`]
//!   and [`Env`] abstract the runtime, bundled in a [`Context`].
//!
//! ## Example
//!
//! ```
//! use bridge_core::{OutgoingRequest, SigningRequest};
//!
//! # fn example() -> bridge_core::Result<()> {
//! let req = OutgoingRequest::new(http::Method::GET, "/buckets").with_query("a", "1");
//! let signing = SigningRequest::build(&req, "https://api.storj.io")?;
//!
//! assert_eq!(signing.contract()?, "GET\nhttps://api.storj.io/buckets\na=1");
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::KeyPair;

mod request;
pub use request::{
    canonical_json, canonical_query, BasicAuth, Method, OutgoingRequest, SigningRequest,
};
