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

use awssink_core::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default request timeout towards the storage backend.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// Storage backend selected by [`Config::service`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Amazon S3, with SigV4 signed requests.
    S3,
    /// A directory on the local filesystem.
    Local,
}

/// Config for awssink.
///
/// ```toml
/// timeoutSeconds = 5
/// service = "s3"
/// bucket = "examplebucket"
/// prefix = "/uploads"
/// region = "us-east-1"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Timeout of one request to the storage backend.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Which backend to forward to.
    pub service: ServiceKind,

    /// Bucket name, required by `s3`.
    #[serde(default)]
    pub bucket: String,
    /// Key prefix including its leading slash, for example `/uploads`.
    #[serde(default)]
    pub prefix: String,
    /// Region used in the signing scope, required by `s3`.
    #[serde(default)]
    pub region: String,
    /// Override `https://<bucket>.s3.amazonaws.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Target directory, required by `local`.
    #[serde(default)]
    pub directory: String,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(content)
            .map_err(|e| Error::config_invalid("failed to parse config").with_source(e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_invalid(format!("failed to read config {}", path.display()))
                .with_source(e)
        })?;
        Self::from_toml(&content)
    }

    /// Check that the fields needed by the selected backend are present.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::config_invalid("timeoutSeconds must be positive"));
        }

        match self.service {
            ServiceKind::S3 => {
                if self.bucket.is_empty() {
                    return Err(Error::config_invalid("bucket is required for s3"));
                }
                if self.region.is_empty() {
                    return Err(Error::config_invalid("region is required for s3"));
                }
                if !self.prefix.is_empty() && !self.prefix.starts_with('/') {
                    return Err(Error::config_invalid(
                        "prefix must start with '/' when set",
                    ));
                }
            }
            ServiceKind::Local => {
                if self.directory.is_empty() {
                    return Err(Error::config_invalid("directory is required for local"));
                }
            }
        }

        Ok(())
    }

    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Base URL of the bucket, without trailing slash.
    pub fn bucket_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.s3.amazonaws.com", self.bucket),
        }
    }
}
