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

//! awssink forwards request bodies to a storage backend.
//!
//! `PUT`, `POST` and `GET` requests are mapped onto either an S3 bucket,
//! reached through SigV4 signed requests, or a local directory.
//!
//! ```no_run
//! use awssink::{default_context, Config, SinkHandler};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cfg = Config::from_toml(
//!     r#"
//!     service = "s3"
//!     bucket = "examplebucket"
//!     prefix = "/uploads"
//!     region = "us-east-1"
//!     "#,
//! )?;
//! let handler = SinkHandler::from_config(&cfg, default_context())?;
//!
//! let req = http::Request::put("/hello.txt").body(bytes::Bytes::from("hello"))?;
//! let resp = handler.handle(req).await;
//! assert!(resp.status().is_success());
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod config;
pub use config::{Config, ServiceKind, DEFAULT_TIMEOUT_SECONDS};

mod context;
pub use context::default_context;

mod service;
pub use service::{Output, Service};

mod s3;
pub use s3::S3Service;

mod local;
pub use local::LocalService;

mod handler;
pub use handler::SinkHandler;

mod server;
pub use server::{serve, SinkService};
