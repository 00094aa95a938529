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

use crate::constants::{AWS_QUERY_ENCODE_SET, X_AMZ_CONTENT_SHA_256};
use awssink_core::hash::EMPTY_SHA256;
use awssink_core::{Result, SigningRequest};
use percent_encoding::utf8_percent_encode;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// CanonicalRequest is the normalized form of a request that gets hashed into
/// the string to sign.
///
/// Rendering with [`Display`] produces:
///
/// ```text
/// <METHOD>
/// <uri>
/// <query>
/// <name:value lines>
///
/// <signed;headers>
/// <payload hash>
/// ```
///
/// Every header present is signed. Headers are stored in a `BTreeMap` so that
/// iteration order is the ASCII order of the lower-cased names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    payload_hash: Option<String>,
}

impl CanonicalRequest {
    /// Create a canonical request with the given method and already
    /// encoded uri path.
    pub fn new(method: &str, uri: &str) -> Self {
        let uri = uri.trim();
        Self {
            method: method.to_string(),
            uri: if uri.is_empty() { "/" } else { uri }.to_string(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            payload_hash: None,
        }
    }

    /// Add a decoded query parameter.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((
            utf8_percent_encode(key, &AWS_QUERY_ENCODE_SET).to_string(),
            utf8_percent_encode(value, &AWS_QUERY_ENCODE_SET).to_string(),
        ));
        self
    }

    /// Add a header. Repeated names are merged into one comma separated value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let value = value.trim();
        self.headers
            .entry(name.trim().to_ascii_lowercase())
            .and_modify(|v| {
                v.push(',');
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
        self
    }

    /// Set the payload hash explicitly.
    ///
    /// Without it, the `x-amz-content-sha256` header is used, and the hash of
    /// an empty payload after that.
    pub fn with_payload_hash(mut self, hash: &str) -> Self {
        self.payload_hash = Some(hash.to_string());
        self
    }

    /// Build a canonical request from a prepared signing request.
    pub fn from_signing_request(req: &SigningRequest) -> Result<Self> {
        let mut creq = Self::new(req.method.as_str(), &req.path);
        for (k, v) in &req.query {
            creq = creq.with_query(k, v);
        }
        for (name, value) in req.headers.iter() {
            creq = creq.with_header(name.as_str(), value.to_str()?);
        }
        Ok(creq)
    }

    /// Method of this request.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Canonical uri of this request.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get a canonical header value by lower-cased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// Sorted, lower-cased names of all signed headers.
    pub fn signed_headers(&self) -> Vec<&str> {
        self.headers.keys().map(|k| k.as_str()).collect()
    }

    /// Encoded query string sorted by key.
    pub fn canonical_query(&self) -> String {
        let mut query = self.query.iter().collect::<Vec<_>>();
        query.sort();
        query
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Hex encoded SHA-256 of the payload.
    pub fn payload_hash(&self) -> &str {
        self.payload_hash
            .as_deref()
            .or_else(|| self.header(X_AMZ_CONTENT_SHA_256))
            .unwrap_or(EMPTY_SHA256)
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.canonical_query())?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers().join(";"))?;
        write!(f, "{}", self.payload_hash())
    }
}
