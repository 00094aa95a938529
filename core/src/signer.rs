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

use crate::{Context, CredentialHolder, Result, SignRequest, SigningCredential};
use log::warn;
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    holder: CredentialHolder<K>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        holder: CredentialHolder<K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            holder,
            builder: Arc::new(builder),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Get the credential holder used by this signer.
    pub fn holder(&self) -> &CredentialHolder<K> {
        &self.holder
    }

    /// Signing request.
    ///
    /// Reads one credential snapshot and signs with it. Signing still happens
    /// without a usable snapshot; the remote side is left to reject the request.
    pub async fn sign(
        &self,
        req: &mut http::request::Parts,
        body: Option<&[u8]>,
    ) -> Result<String> {
        let cred = self.holder.snapshot();
        match &cred {
            None => warn!("no credential loaded yet, request will be sent unauthenticated"),
            Some(c) if !c.is_valid() => {
                warn!("credential is incomplete or expired, request will likely be rejected")
            }
            Some(_) => {}
        }

        self.builder
            .sign_request(&self.ctx, req, body, cred.as_ref())
            .await
    }
}
