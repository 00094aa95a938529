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

use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use awssink_core::time::parse_rfc3339;
use awssink_core::{Context, Error, ProvideCredential, Result};
use bytes::Bytes;
use http::{Method, StatusCode};
use log::debug;
use serde::Deserialize;

/// EcsCredentialProvider loads credentials from the container credentials
/// endpoint.
///
/// The endpoint is `http://169.254.170.2` followed by
/// `AWS_CONTAINER_CREDENTIALS_RELATIVE_URI`, or `AWS_CONTAINER_CREDENTIALS_FULL_URI`
/// when no relative uri is set. Returns `None` outside of a container.
///
/// References:
/// - [IAM roles for tasks](https://docs.aws.amazon.com/AmazonECS/latest/developerguide/task-iam-roles.html)
#[derive(Debug, Default, Clone)]
pub struct EcsCredentialProvider {
    endpoint: Option<String>,
}

impl EcsCredentialProvider {
    /// Create a new `EcsCredentialProvider` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base endpoint that relative uris are resolved against.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    fn credentials_url(&self, ctx: &Context) -> Option<String> {
        if let Some(relative) = ctx
            .env_var(AWS_CONTAINER_CREDENTIALS_RELATIVE_URI)
            .filter(|v| !v.is_empty())
        {
            let endpoint = self.endpoint.as_deref().unwrap_or(ECS_CREDENTIALS_ENDPOINT);
            return Some(format!("{endpoint}{relative}"));
        }

        ctx.env_var(AWS_CONTAINER_CREDENTIALS_FULL_URI)
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl ProvideCredential for EcsCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(url) = self.credentials_url(ctx) else {
            return Ok(None);
        };
        debug!("loading container credentials from {url}");

        let req = http::Request::builder()
            .method(Method::GET)
            .uri(&url)
            .body(Bytes::new())
            .map_err(|e| {
                Error::request_invalid("failed to build container credentials request")
                    .with_source(e)
            })?;

        let resp = ctx.http_send_as_string(req).await?;
        if resp.status() != StatusCode::OK {
            return Err(Error::unexpected(format!(
                "request to container credentials endpoint failed: status={}, body={}",
                resp.status(),
                resp.body()
            )));
        }

        let content = resp.into_body();
        let cred: EcsTaskCredentials = serde_json::from_str(&content).map_err(|e| {
            Error::credential_invalid("failed to parse container credentials").with_source(e)
        })?;

        let expires_in = parse_rfc3339(&cred.expiration)?;

        Ok(Some(Credential {
            access_key_id: cred.access_key_id,
            secret_access_key: cred.secret_access_key,
            session_token: Some(cred.token).filter(|v| !v.is_empty()),
            expires_in: Some(expires_in),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EcsTaskCredentials {
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    token: String,
    expiration: String,
}
