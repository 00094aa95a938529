//! Core components for signing outbound storage requests.
//!
//! This crate provides the foundational types and traits shared by the awssink crates.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds implementations for HTTP sending, environment access and the clock
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and request signing (`SignRequest`)
//! - **CredentialHolder**: The latest credential snapshot, optionally kept fresh by a background task
//! - **Signer**: The orchestrator that reads one snapshot and signs a request with it
//!
//! ## Example
//!
//! ```no_run
//! use awssink_core::{Context, CredentialHolder, Result, Signer, SignRequest, SigningCredential};
//! use async_trait::async_trait;
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut Parts,
//!         _body: Option<&[u8]>,
//!         cred: Option<&Self::Credential>,
//!     ) -> Result<String> {
//!         let key = cred.map(|c| c.key.as_str()).unwrap_or_default();
//!         req.headers.insert("authorization", key.parse()?);
//!         Ok(req.uri.to_string())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let holder = CredentialHolder::fixed(MyCredential { key: "my-key".into() });
//! let signer = Signer::new(Context::new(), holder, MySigner);
//!
//! let mut parts = http::Request::get("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};
mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod holder;
pub use holder::{CredentialHolder, REFRESH_RETRY_INTERVAL};
mod signer;
pub use signer::Signer;
