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

use crate::config::Config;
use crate::service::{post_object_name, Output, Service};
use async_trait::async_trait;
use awssink_aws_v4::{Credential, DefaultCredentialProvider, RequestSigner, AWS_URI_ENCODE_SET};
use awssink_core::{Context, CredentialHolder, Error, Result, Signer};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use log::{debug, warn};
use percent_encoding::utf8_percent_encode;
use std::time::Duration;

/// S3Service forwards objects to a S3 bucket with SigV4 signed requests.
///
/// Objects live at `<endpoint><prefix>/<name>`, where `name` is the decoded
/// object key. Requests are not retried.
#[derive(Debug, Clone)]
pub struct S3Service {
    endpoint: String,
    prefix: String,
    timeout: Duration,
    signer: Signer<Credential>,
}

impl S3Service {
    /// Create a S3 service that signs with the given signer.
    pub fn new(cfg: &Config, signer: Signer<Credential>) -> Self {
        Self {
            endpoint: cfg.bucket_endpoint(),
            prefix: cfg.prefix.trim_end_matches('/').to_string(),
            timeout: cfg.timeout(),
            signer,
        }
    }

    /// Create a S3 service whose credentials come from the default provider
    /// chain and are refreshed in the background.
    ///
    /// Must be called within a tokio runtime.
    pub fn from_config(cfg: &Config, ctx: Context) -> Self {
        let holder = CredentialHolder::spawn(ctx.clone(), DefaultCredentialProvider::new());
        let signer = Signer::new(ctx, holder, RequestSigner::new("s3", &cfg.region));
        Self::new(cfg, signer)
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}{}/{}",
            self.endpoint,
            self.prefix,
            utf8_percent_encode(name, &AWS_URI_ENCODE_SET)
        )
    }

    async fn send(
        &self,
        method: Method,
        name: &str,
        payload: Option<Bytes>,
        content_type: Option<&str>,
    ) -> Result<Output> {
        let url = self.object_url(name);

        let mut req = http::Request::builder().method(method.clone()).uri(&url);
        if let Some(content_type) = content_type.filter(|v| !v.is_empty()) {
            req = req.header(CONTENT_TYPE, content_type);
        }
        let (mut parts, body) = req.body(payload.unwrap_or_default())?.into_parts();

        let canonical_request = self.signer.sign(&mut parts, Some(body.as_ref())).await?;
        let req = http::Request::from_parts(parts, body);

        debug!("sending {method} {url}");
        let resp = tokio::time::timeout(self.timeout, self.signer.context().http_send(req))
            .await
            .map_err(|_| {
                Error::unexpected(format!(
                    "{method} {url} timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        let status = resp.status();
        if !status.is_success() {
            warn!("{method} {url} failed with status {status}");
            return Err(Error::request_rejected(format!(
                "{method} {url} failed with status {status}, canonical request:\n{canonical_request}"
            )));
        }

        let (parts, body) = resp.into_parts();
        Ok(Output {
            body,
            headers: parts.headers,
        })
    }
}

#[async_trait]
impl Service for S3Service {
    async fn put(&self, name: &str, payload: Bytes, content_type: Option<&str>) -> Result<Output> {
        self.send(Method::PUT, name, Some(payload), content_type)
            .await
    }

    async fn post(
        &self,
        name: &str,
        payload: Bytes,
        content_type: Option<&str>,
    ) -> Result<Output> {
        self.put(&post_object_name(name), payload, content_type)
            .await
    }

    async fn get(&self, name: &str) -> Result<Output> {
        self.send(Method::GET, name, None, None).await
    }
}
