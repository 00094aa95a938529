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

//! AWS SigV4 signing for awssink.
//!
//! This crate turns an outbound request into its canonical form, derives the
//! signing key and sets the `Authorization` header, together with the
//! credential providers used to feed the signer.
//!
//! ## Example
//!
//! ```no_run
//! use awssink_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use awssink_core::{Context, CredentialHolder, OsEnv, Signer};
//!
//! # async fn example() -> awssink_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let holder = CredentialHolder::spawn(ctx.clone(), DefaultCredentialProvider::new());
//! let signer = Signer::new(ctx, holder, RequestSigner::new("s3", "us-east-1"));
//!
//! let mut parts = http::Request::put("https://examplebucket.s3.amazonaws.com/test.txt")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, Some(b"hello")).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, ECS_CREDENTIALS_ENDPOINT};

mod credential;
pub use credential::Credential;

mod canonical;
pub use canonical::CanonicalRequest;

mod sign_request;
pub use sign_request::{
    authorization_header, credential_scope, signing_key, string_to_sign, RequestSigner,
    SignedParts,
};

mod provide_credential;
pub use provide_credential::*;
