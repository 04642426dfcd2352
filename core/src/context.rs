// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Runtime collaborators shared by every call of a client.
///
/// A context bundles the transport requests are dispatched with and the
/// environment the base URI may be read from. It is cheap to clone and
/// read-only once built.
///
/// No transport is bundled: a context built with [`Context::new`] fails every
/// dispatch with [`ErrorKind::Transport`](crate::ErrorKind::Transport) until an
/// [`HttpSend`] is plugged in.
///
/// ```
/// use bridge_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Build a context that can neither dispatch nor see any env var.
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
            env: Arc::new(NoopEnv),
        }
    }

    /// Use `http` to dispatch requests.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Use `env` to look up env vars.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Dispatch an assembled request.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Look up `key`, treating empty values as unset.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|v| !v.is_empty())
    }
}

/// Transport used to reach the Bridge.
///
/// Implementations hand back every response whatever its status, mapping
/// non-2xx statuses is left to the client. Failures before a response arrives
/// should be reported as [`ErrorKind::Transport`](crate::ErrorKind::Transport).
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Dispatch `req` and collect the full response body.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Source of env vars.
pub trait Env: Debug + Send + Sync + 'static {
    /// Value of `key`, `None` when unset or not valid utf-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// Env vars of the current process.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }
}

/// Fixed set of env vars, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// Vars visible through this env.
    pub envs: HashMap<String, String>,
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            envs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }
}

/// Transport of an unconfigured context, fails every dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::transport(format!(
            "no transport configured to send {} {}",
            req.method(),
            req.uri()
        )))
    }
}

/// Env of an unconfigured context, every var is unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_unconfigured_transport_fails() {
        let req = http::Request::builder()
            .uri("https://api.storj.io/buckets")
            .body(Bytes::new())
            .unwrap();

        let err = Context::new().http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.message(),
            "no transport configured to send GET https://api.storj.io/buckets"
        );
    }

    #[test]
    fn test_static_env() {
        let ctx = Context::new().with_env(StaticEnv::from_iter([
            ("STORJ_BRIDGE", "http://localhost:6382"),
            ("EMPTY", ""),
        ]));

        assert_eq!(
            ctx.env_var("STORJ_BRIDGE").as_deref(),
            Some("http://localhost:6382")
        );
        assert_eq!(ctx.env_var("EMPTY"), None);
        assert_eq!(ctx.env_var("HOME"), None);
    }
}
