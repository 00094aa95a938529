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

use crate::handler::{text_response, SinkHandler};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use log::{debug, error, info, warn};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use tokio::net::TcpListener;

/// Adapts [`SinkHandler`] to hyper's `Service` trait.
#[derive(Debug, Clone)]
pub struct SinkService {
    handler: SinkHandler,
}

impl SinkService {
    /// Wrap a handler.
    pub fn new(handler: SinkHandler) -> Self {
        Self { handler }
    }
}

impl Service<http::Request<Incoming>> for SinkService {
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = self.handler.clone();

        Box::pin(async move {
            let (parts, incoming) = req.into_parts();
            let resp = match incoming.collect().await {
                Ok(collected) => {
                    let req = http::Request::from_parts(parts, collected.to_bytes());
                    handler.handle(req).await
                }
                Err(err) => {
                    error!("failed to read request body: {err}");
                    text_response(
                        http::StatusCode::NOT_ACCEPTABLE,
                        format!("failed to read request body: {err}"),
                    )
                }
            };

            Ok(resp.map(Full::new))
        })
    }
}

/// Serve connections from `listener` until `shutdown` resolves, then drain
/// open connections.
pub async fn serve(
    listener: TcpListener,
    handler: SinkHandler,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let graceful = GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());
    let service = SinkService::new(handler);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("failed to accept connection: {e}");
                        continue;
                    }
                };
                debug!("accepted connection from {peer_addr}");

                let conn = http.serve_connection(TokioIo::new(stream), service.clone());
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!("connection error from {peer_addr}: {e}");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained");

    Ok(())
}
