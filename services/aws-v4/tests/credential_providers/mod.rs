mod ecs;
mod env;

use async_trait::async_trait;
use awssink_core::{Context, HttpSend, Result, StaticEnv};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves a fixed response to every request and counts the calls.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: http::StatusCode,
    body: String,
    calls: Arc<AtomicUsize>,
}

impl MockHttpSend {
    pub fn new(status: http::StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from(self.body.clone()))?)
    }
}

pub fn static_env(envs: &[(&str, &str)]) -> StaticEnv {
    StaticEnv {
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

pub fn context(http: MockHttpSend, envs: &[(&str, &str)]) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new().with_http_send(http).with_env(static_env(envs))
}
