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

use crate::config::{Config, ServiceKind};
use crate::local::LocalService;
use crate::s3::S3Service;
use crate::service::{Output, Service};
use awssink_core::{Context, Error, Result};
use bytes::Bytes;
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING};
use http::{Method, Request, Response, StatusCode};
use log::{debug, error};
use percent_encoding::percent_decode_str;
use std::sync::Arc;

/// SinkHandler maps client requests onto a storage [`Service`].
///
/// `<name>` is the percent-decoded request path without its leading `/`.
///
/// - `PUT /<name>` writes the body as `<name>`.
/// - `POST /<name>` writes the body as a new object below `<name>`.
/// - `GET /<name>` reads `<name>`.
///
/// Other methods are answered with `501`. Any failure of the backend is
/// answered with `500` and the error text.
#[derive(Debug, Clone)]
pub struct SinkHandler {
    service: Arc<dyn Service>,
}

impl SinkHandler {
    /// Create a handler for the given service.
    pub fn new(service: impl Service) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Build the backend selected by `cfg`.
    ///
    /// Must be called within a tokio runtime when `cfg` selects s3.
    pub fn from_config(cfg: &Config, ctx: Context) -> Result<Self> {
        cfg.validate()?;

        let handler = match cfg.service {
            ServiceKind::S3 => Self::new(S3Service::from_config(cfg, ctx)),
            ServiceKind::Local => Self::new(LocalService::new(&cfg.directory)),
        };
        Ok(handler)
    }

    /// Handle one client request.
    pub async fn handle(&self, req: Request<Bytes>) -> Response<Bytes> {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path();
        let path = path.strip_prefix('/').unwrap_or(path);
        let name = match percent_decode_str(path).decode_utf8() {
            Ok(name) => name,
            Err(err) => {
                let err = Error::request_invalid(format!(
                    "object name {path:?} is not valid utf-8: {err}"
                ));
                return error_response(&parts.method, path, err);
            }
        };
        let name = name.as_ref();
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        debug!("handling {} {name}", parts.method);

        let result = match parts.method {
            Method::PUT => self.service.put(name, body, content_type).await,
            Method::POST => self.service.post(name, body, content_type).await,
            Method::GET => self.service.get(name).await,
            ref method => {
                return text_response(
                    StatusCode::NOT_IMPLEMENTED,
                    format!("Method {method} not implemented"),
                )
            }
        };

        match result {
            Ok(output) => output_response(output),
            Err(err) => error_response(&parts.method, name, err),
        }
    }
}

fn error_response(method: &Method, name: &str, err: Error) -> Response<Bytes> {
    error!("{method} {name} failed: {err}");
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{method} error: {err}"),
    )
}

fn output_response(output: Output) -> Response<Bytes> {
    let mut resp = Response::new(output.body);
    for (name, value) in output.headers.iter() {
        // Framing headers belong to the upstream connection.
        if name == CONNECTION || name == CONTENT_LENGTH || name == TRANSFER_ENCODING {
            continue;
        }
        resp.headers_mut().append(name.clone(), value.clone());
    }
    resp
}

pub(crate) fn text_response(status: StatusCode, body: String) -> Response<Bytes> {
    let mut resp = Response::new(Bytes::from(body));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp
}
