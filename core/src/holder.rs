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

use crate::time::DateTime;
use crate::{Context, ProvideCredential, SigningCredential};
use log::{debug, error, warn};
use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delay before fetching again after a failed refresh.
pub const REFRESH_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// CredentialHolder keeps the latest credential snapshot.
///
/// Snapshots are published through a single-writer, multi-reader channel: the
/// refresh task replaces the whole value and readers always observe either the
/// previous or the new credential, never a partially updated one.
///
/// Cloning a holder is cheap. The refresh task stops once the last clone is dropped.
pub struct CredentialHolder<K> {
    rx: watch::Receiver<Option<K>>,
    task: Option<Arc<RefreshTask>>,
}

impl<K> Clone for CredentialHolder<K> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            task: self.task.clone(),
        }
    }
}

impl<K: SigningCredential> Debug for CredentialHolder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHolder")
            .field("credential", &*self.rx.borrow())
            .field("refreshing", &self.task.is_some())
            .finish()
    }
}

struct RefreshTask(JoinHandle<()>);

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<K: SigningCredential> CredentialHolder<K> {
    /// Create a holder that always returns the given credential.
    pub fn fixed(cred: K) -> Self {
        let (_, rx) = watch::channel(Some(cred));
        Self { rx, task: None }
    }

    /// Create a holder that never gets a credential.
    ///
    /// Requests signed with it carry a syntactically valid but unauthenticated signature.
    pub fn empty() -> Self {
        let (_, rx) = watch::channel(None);
        Self { rx, task: None }
    }

    /// Spawn a background task that keeps the credential fresh.
    ///
    /// The task loads a credential right away, then renews it when half of its
    /// remaining lifetime has passed. Failed loads keep the previous snapshot and
    /// are retried after [`REFRESH_RETRY_INTERVAL`]. Credentials without an
    /// expiration are loaded once.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<P>(ctx: Context, provider: P) -> Self
    where
        P: ProvideCredential<Credential = K>,
    {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(refresh_loop(ctx, provider, tx));

        Self {
            rx,
            task: Some(Arc::new(RefreshTask(handle))),
        }
    }

    /// Read the current snapshot.
    pub fn snapshot(&self) -> Option<K> {
        self.rx.borrow().clone()
    }

    /// Wait until a credential has been published at least once.
    ///
    /// Returns `None` if no credential can ever arrive.
    pub async fn wait_for_credential(&self) -> Option<K> {
        let mut rx = self.rx.clone();
        if let Ok(cred) = rx.wait_for(|cred| cred.is_some()).await {
            return cred.clone();
        }

        None
    }
}

async fn refresh_loop<P>(ctx: Context, provider: P, tx: watch::Sender<Option<P::Credential>>)
where
    P: ProvideCredential,
    P::Credential: SigningCredential,
{
    loop {
        let wait = match provider.provide_credential(&ctx).await {
            Ok(Some(cred)) => {
                let wait = renewal_interval(ctx.now(), cred.expires_at());
                tx.send_replace(Some(cred));

                match wait {
                    Some(wait) => {
                        debug!("credential refreshed, next refresh in {wait:?}");
                        wait
                    }
                    None => {
                        debug!("credential has no expiration, stop refreshing");
                        return;
                    }
                }
            }
            Ok(None) => {
                warn!(
                    "no credential available from {provider:?}, retry in {REFRESH_RETRY_INTERVAL:?}"
                );
                REFRESH_RETRY_INTERVAL
            }
            Err(err) => {
                error!("failed to refresh credential: {err}, retry in {REFRESH_RETRY_INTERVAL:?}");
                REFRESH_RETRY_INTERVAL
            }
        };

        tokio::time::sleep(wait).await;
    }
}

/// Half of the remaining lifetime, or the retry interval if the credential is
/// already expired. `None` for credentials that never expire.
fn renewal_interval(now: DateTime, expires_at: Option<DateTime>) -> Option<Duration> {
    let expires_at = expires_at?;
    let remaining = (expires_at - now).to_std().unwrap_or_default();
    if remaining.is_zero() {
        return Some(REFRESH_RETRY_INTERVAL);
    }

    Some(remaining / 2)
}
