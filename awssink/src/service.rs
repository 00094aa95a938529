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

use async_trait::async_trait;
use awssink_core::Result;
use bytes::Bytes;
use http::HeaderMap;
use std::fmt::Debug;

/// Result of one storage operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    /// Body returned to the client.
    pub body: Bytes,
    /// Headers copied onto the client response.
    pub headers: HeaderMap,
}

impl Output {
    /// Create an output with only a body.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }
}

/// Service is a storage backend that objects are forwarded to.
///
/// `name` is the object name relative to the backend root, without leading slash.
#[async_trait]
pub trait Service: Debug + Send + Sync + 'static {
    /// Write `payload` as `name`.
    async fn put(&self, name: &str, payload: Bytes, content_type: Option<&str>) -> Result<Output>;

    /// Write `payload` as a new object under `name`.
    async fn post(&self, name: &str, payload: Bytes, content_type: Option<&str>)
        -> Result<Output>;

    /// Read the object `name`.
    async fn get(&self, name: &str) -> Result<Output>;
}

/// Name of a new object created under `name` by `post`.
pub(crate) fn post_object_name(name: &str) -> String {
    format!("{name}/{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_object_name() {
        let a = post_object_name("events");
        let b = post_object_name("events");

        assert!(a.starts_with("events/"));
        assert_eq!(a.len(), "events/".len() + 36);
        assert!(uuid::Uuid::parse_str(&a["events/".len()..]).is_ok());
        assert_ne!(a, b);
    }
}
