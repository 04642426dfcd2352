use crate::hash::base64_encode;
use crate::utils::Redact;
use crate::{Error, Result};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::fmt::{self, Debug, Formatter};

/// Chars left untouched by `encodeURIComponent`, everything else is escaped.
const URI_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Method accepted by the Bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET, payload carried in query.
    Get,
    /// POST, payload carried in body.
    Post,
    /// PATCH, payload carried in body.
    Patch,
    /// DELETE, payload carried in query.
    Delete,
}

impl Method {
    /// Returns the upper case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the payload of this method is the JSON body instead of the query.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Patch)
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = Error;

    fn try_from(method: &http::Method) -> Result<Self> {
        match method.as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            v => Err(Error::unsupported_method(format!(
                "method {v} is not supported by bridge"
            ))),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain description of a call against the Bridge, before authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Path relative to the base URI, starting with `/`.
    pub path: String,
    /// Query pairs, used by GET and DELETE.
    pub query: Vec<(String, String)>,
    /// JSON body, used by POST and PATCH.
    pub body: Option<Value>,
}

impl OutgoingRequest {
    /// Create a request without payload.
    pub fn new(method: http::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Push a new query pair into query list.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Basic auth pair attached at transport level.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name, the account email.
    pub user: String,
    /// Password, always the SHA256 digest of the account password.
    pub pass: String,
}

impl Debug for BasicAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("pass", &Redact::from(&self.pass))
            .finish()
    }
}

/// An outgoing request resolved against the base URI and ready to carry auth.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute url without query: base URI + path.
    pub url: String,
    /// Query pairs, untouched from the outgoing request.
    pub query: Vec<(String, String)>,
    /// JSON body, untouched from the outgoing request.
    pub body: Option<Value>,
    /// Auth headers.
    pub headers: HeaderMap,
    /// Basic auth pair.
    pub basic_auth: Option<BasicAuth>,
}

impl SigningRequest {
    /// Build a signing request from an outgoing request.
    ///
    /// The outgoing request is only read, never modified.
    pub fn build(req: &OutgoingRequest, base_uri: &str) -> Result<Self> {
        let method = Method::try_from(&req.method)?;

        Ok(SigningRequest {
            method,
            url: format!("{}{}", base_uri.trim_end_matches('/'), req.path),
            query: req.query.clone(),
            body: req.body.clone(),
            headers: HeaderMap::new(),
            basic_auth: None,
        })
    }

    /// The payload covered by the signature.
    ///
    /// GET and DELETE use the canonical query string, POST and PATCH use the
    /// canonical JSON body. A missing body is treated as `{}`.
    pub fn payload(&self) -> Result<String> {
        if self.method.has_body() {
            match &self.body {
                Some(body) => canonical_json(body),
                None => Ok("{}".to_string()),
            }
        } else {
            Ok(canonical_query(&self.query))
        }
    }

    /// The string to sign: method, url and payload on three lines.
    pub fn contract(&self) -> Result<String> {
        Ok(format!("{}\n{}\n{}", self.method, self.url, self.payload()?))
    }

    /// Assemble the request to dispatch.
    ///
    /// The query string and body bytes are the same canonical strings used
    /// in [`SigningRequest::contract`].
    pub fn into_http(self) -> Result<http::Request<Bytes>> {
        let payload = self.payload()?;

        let (uri, body) = if self.method.has_body() {
            (self.url, Bytes::from(payload))
        } else if payload.is_empty() {
            (self.url, Bytes::new())
        } else {
            (format!("{}?{}", self.url, payload), Bytes::new())
        };

        let mut req = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(uri)
            .body(body)?;

        *req.headers_mut() = self.headers;
        if self.method.has_body() {
            req.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(auth) = self.basic_auth {
            let token = base64_encode(format!("{}:{}", auth.user, auth.pass).as_bytes());
            let mut value = HeaderValue::from_str(&format!("Basic {token}"))?;
            value.set_sensitive(true);
            req.headers_mut().insert(AUTHORIZATION, value);
        }

        Ok(req)
    }
}

/// Serialize query pairs canonically.
///
/// Pairs are stably sorted by key, keys and values are percent encoded like
/// `encodeURIComponent`, and pairs are joined as `k=v` with `&`.
///
/// ```
/// use bridge_core::canonical_query;
///
/// let query = vec![
///     ("b".to_string(), "x y".to_string()),
///     ("a".to_string(), "1".to_string()),
/// ];
/// assert_eq!(canonical_query(&query), "a=1&b=x%20y");
/// ```
pub fn canonical_query(query: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = query.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.extend(utf8_percent_encode(k, URI_COMPONENT_ENCODE_SET));
        s.push('=');
        s.extend(utf8_percent_encode(v, URI_COMPONENT_ENCODE_SET));
    }

    s
}

/// Serialize a JSON value canonically: compact, object keys sorted.
pub fn canonical_json(value: &Value) -> Result<String> {
    // serde_json keeps object keys in a BTreeMap unless `preserve_order` is
    // enabled, so the output is already key sorted.
    Ok(serde_json::to_string(value)?)
}
