use crate::constants::PATH_SEGMENT_ENCODE_SET;
use crate::{ClientConfig, Config, RequestSigner};
use bridge_core::hash::hex_sha256;
use bridge_core::utils::Redact;
use bridge_core::{Context, Error, OutgoingRequest, Result};
use http::Method;
use log::debug;
use percent_encoding::utf8_percent_encode;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Client for the Bridge API.
///
/// Every call builds its own request, authenticates it with the configured
/// credential and dispatches it through the [`Context`]. Responses are
/// returned as untyped JSON; non-2xx responses become
/// [`ErrorKind::Api`](bridge_core::ErrorKind::Api) errors carrying the status
/// and the raw body.
///
/// Cloning is cheap and clones share configuration.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<ClientConfig>,
    signer: RequestSigner,
}

/// Parameters of [`Client::create_user`].
#[derive(Clone, Default)]
pub struct CreateUserParams {
    /// Account email.
    pub email: String,
    /// Plaintext password, only its SHA256 digest is sent.
    pub password: String,
    /// Where the activation link redirects.
    pub redirect: Option<String>,
    /// Public key to register along with the user.
    pub pubkey: Option<String>,
}

impl Debug for CreateUserParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserParams")
            .field("email", &self.email)
            .field("password", &Redact::full(&self.password))
            .field("redirect", &self.redirect)
            .field("pubkey", &self.pubkey)
            .finish()
    }
}

/// Parameters of [`Client::destroy_user`].
#[derive(Debug, Clone, Default)]
pub struct DestroyUserParams {
    /// Account email.
    pub email: String,
    /// Where the confirmation link redirects.
    pub redirect: Option<String>,
}

/// Parameters of [`Client::reset_password`].
#[derive(Clone, Default)]
pub struct ResetPasswordParams {
    /// Account email.
    pub email: String,
    /// New plaintext password, only its SHA256 digest is sent.
    pub password: String,
    /// Where the confirmation link redirects.
    pub redirect: Option<String>,
}

impl Debug for ResetPasswordParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordParams")
            .field("email", &self.email)
            .field("password", &Redact::full(&self.password))
            .field("redirect", &self.redirect)
            .finish()
    }
}

/// Operation a bucket token grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenOperation {
    /// Upload data into the bucket.
    Push,
    /// Download data from the bucket.
    Pull,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    email: &'a str,
    password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pubkey: Option<&'a str>,
}

#[derive(Serialize)]
struct ResetPasswordBody<'a> {
    password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'a str>,
}

/// Percent encode caller input into a single path segment.
///
/// Empty and dot segments are rejected: URL parsers resolve them, so the
/// request would reach another route than the one signed.
fn segment(v: &str) -> Result<String> {
    if matches!(v, "" | "." | "..") {
        return Err(Error::request_invalid(format!(
            "{v:?} is not a valid path segment"
        )));
    }

    Ok(utf8_percent_encode(v, PATH_SEGMENT_ENCODE_SET).to_string())
}

impl Client {
    /// Create a new client.
    ///
    /// `uri` is used as base URI when `config.base_uri` is not set; see
    /// [`ClientConfig::resolve`] for the full precedence.
    pub fn new(ctx: Context, uri: Option<&str>, config: Config) -> Result<Self> {
        let config = ClientConfig::resolve(&ctx, uri, config)?;

        Ok(Self {
            ctx,
            signer: RequestSigner::new(config.base_uri()),
            config: Arc::new(config),
        })
    }

    /// Resolved configuration of this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Authenticate and dispatch `req`, returning the parsed response body.
    ///
    /// Empty response bodies are returned as `Value::Null`.
    pub async fn send(&self, req: OutgoingRequest) -> Result<Value> {
        let signed = self.signer.sign_request(&req, self.config.credential())?;
        let req = signed.into_http()?;
        debug!("dispatching {} {}", req.method(), req.uri());

        let resp = self.ctx.http_send(req).await?;
        let (parts, body) = resp.into_parts();
        debug!("bridge responded {}", parts.status);

        if !parts.status.is_success() {
            return Err(Error::api(parts.status, body));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body)
            .map_err(|e| Error::unexpected("failed to parse bridge response").with_source(e))
    }

    /// Get the API description of the Bridge.
    pub async fn get_info(&self) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::GET, "/")).await
    }

    /// Register a new user.
    pub async fn create_user(&self, params: &CreateUserParams) -> Result<Value> {
        let body = CreateUserBody {
            email: &params.email,
            password: hex_sha256(params.password.as_bytes()),
            redirect: params.redirect.as_deref(),
            pubkey: params.pubkey.as_deref(),
        };

        self.send(OutgoingRequest::new(Method::POST, "/users").with_body(serde_json::to_value(body)?))
            .await
    }

    /// Request deactivation of a user.
    pub async fn destroy_user(&self, params: &DestroyUserParams) -> Result<Value> {
        let mut req = OutgoingRequest::new(Method::DELETE, format!("/users/{}", segment(&params.email)?));
        if let Some(redirect) = &params.redirect {
            req = req.with_query("redirect", redirect);
        }

        self.send(req).await
    }

    /// Request a password reset for a user.
    pub async fn reset_password(&self, params: &ResetPasswordParams) -> Result<Value> {
        let body = ResetPasswordBody {
            password: hex_sha256(params.password.as_bytes()),
            redirect: params.redirect.as_deref(),
        };

        self.send(
            OutgoingRequest::new(Method::PATCH, format!("/users/{}", segment(&params.email)?))
                .with_body(serde_json::to_value(body)?),
        )
        .await
    }

    /// List the public keys registered for the caller.
    pub async fn get_public_keys(&self) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::GET, "/keys")).await
    }

    /// Register a public key for the caller.
    pub async fn add_public_key(&self, pubkey: &str) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::POST, "/keys").with_body(json!({ "key": pubkey })))
            .await
    }

    /// Remove a registered public key.
    pub async fn destroy_public_key(&self, pubkey: &str) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::DELETE, format!("/keys/{}", segment(pubkey)?)))
            .await
    }

    /// List the caller's buckets.
    pub async fn get_buckets(&self) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::GET, "/buckets")).await
    }

    /// Get a bucket by id.
    pub async fn get_bucket_by_id(&self, id: &str) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::GET, format!("/buckets/{}", segment(id)?)))
            .await
    }

    /// Create a bucket from `data`.
    pub async fn create_bucket(&self, data: Value) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::POST, "/buckets").with_body(data))
            .await
    }

    /// Delete a bucket by id.
    pub async fn destroy_bucket_by_id(&self, id: &str) -> Result<Value> {
        self.send(OutgoingRequest::new(Method::DELETE, format!("/buckets/{}", segment(id)?)))
            .await
    }

    /// Apply `updates` to a bucket.
    pub async fn update_bucket_by_id(&self, id: &str, updates: Value) -> Result<Value> {
        self.send(
            OutgoingRequest::new(Method::PATCH, format!("/buckets/{}", segment(id)?))
                .with_body(updates),
        )
        .await
    }

    /// List the files stored in a bucket.
    pub async fn list_files_in_bucket(&self, id: &str) -> Result<Value> {
        self.send(OutgoingRequest::new(
            Method::GET,
            format!("/buckets/{}/files", segment(id)?),
        ))
        .await
    }

    /// Create a token granting `operation` on a bucket.
    pub async fn create_token(&self, id: &str, operation: TokenOperation) -> Result<Value> {
        self.send(
            OutgoingRequest::new(Method::POST, format!("/buckets/{}/tokens", segment(id)?))
                .with_body(json!({ "operation": operation })),
        )
        .await
    }

    /// Remove a file from a bucket.
    pub async fn remove_file_from_bucket(&self, id: &str, file: &str) -> Result<Value> {
        self.send(OutgoingRequest::new(
            Method::DELETE,
            format!("/buckets/{}/files/{}", segment(id)?, segment(file)?),
        ))
        .await
    }
}
