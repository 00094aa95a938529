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

use crate::service::{post_object_name, Output, Service};
use async_trait::async_trait;
use awssink_core::{Error, Result};
use bytes::Bytes;
use log::debug;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// LocalService stores objects as files below a directory.
///
/// Writes append to the target file, creating it and its parents when missing.
#[derive(Debug, Clone)]
pub struct LocalService {
    directory: PathBuf,
}

impl LocalService {
    /// Create a local service rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Resolve `name` below the root, refusing anything that could escape it.
    fn object_path(&self, name: &str) -> Result<PathBuf> {
        let rel = Path::new(name);
        if name.is_empty()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(Error::request_invalid(format!(
                "object name {name:?} is not a relative path"
            )));
        }

        Ok(self.directory.join(rel))
    }

    async fn append(&self, name: &str, payload: &[u8]) -> Result<Output> {
        let path = self.object_path(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        f.write_all(payload).await?;
        f.flush().await?;

        let msg = format!("{:?} written", path.display().to_string());
        debug!("{msg}");
        Ok(Output::new(msg))
    }
}

#[async_trait]
impl Service for LocalService {
    async fn put(&self, name: &str, payload: Bytes, _: Option<&str>) -> Result<Output> {
        self.append(name, &payload).await
    }

    async fn post(&self, name: &str, payload: Bytes, _: Option<&str>) -> Result<Output> {
        self.append(&post_object_name(name), &payload).await
    }

    async fn get(&self, name: &str) -> Result<Output> {
        let path = self.object_path(name)?;
        let content = fs::read(&path).await?;
        debug!("{:?} read", path.display().to_string());
        Ok(Output::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awssink_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[tokio::test]
    async fn test_put_appends() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let local = LocalService::new(dir.path());

        let out = local.put("a.txt", Bytes::from_static(b"hello "), None).await?;
        let expected = format!("{:?} written", dir.path().join("a.txt").display().to_string());
        assert_eq!(out.body, Bytes::from(expected));

        local.put("a.txt", Bytes::from_static(b"world"), None).await?;
        assert_eq!(std::fs::read(dir.path().join("a.txt"))?, b"hello world");

        let out = local.get("a.txt").await?;
        assert_eq!(out.body, Bytes::from_static(b"hello world"));
        Ok(())
    }

    #[tokio::test]
    async fn test_put_creates_parents() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let local = LocalService::new(dir.path());

        local.put("x/y/z.txt", Bytes::from_static(b"data"), None).await?;
        assert_eq!(std::fs::read(dir.path().join("x/y/z.txt"))?, b"data");
        Ok(())
    }

    #[tokio::test]
    async fn test_post_creates_new_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let local = LocalService::new(dir.path());

        local.post("events", Bytes::from_static(b"1"), None).await?;
        local.post("events", Bytes::from_static(b"2"), None).await?;

        let entries = std::fs::read_dir(dir.path().join("events"))?.count();
        assert_eq!(entries, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let local = LocalService::new(dir.path());

        let err = local.get("missing.txt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        Ok(())
    }

    #[test_case("../escape.txt"; "parent dir")]
    #[test_case("a/../../escape.txt"; "nested parent dir")]
    #[test_case("/etc/passwd"; "absolute path")]
    #[test_case(""; "empty name")]
    fn test_invalid_names(name: &str) {
        let local = LocalService::new("/tmp/awssink");
        let err = local.object_path(name).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}
