// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Extension;
use dill::Catalog;
use internal_error::{InternalError, ResultIntoInternal};
use tokio::net::TcpListener;
use utoipa::openapi::{InfoBuilder, OpenApiBuilder};
use utoipa_axum::router::OpenApiRouter;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct WalletAuthApiServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: axum::Router,
}

impl WalletAuthApiServer {
    pub async fn new(catalog: Catalog, address: IpAddr, port: u16) -> Result<Self, InternalError> {
        let listener = TcpListener::bind((address, port)).await.int_err()?;
        let local_addr = listener.local_addr().int_err()?;

        let (router, openapi) = OpenApiRouter::with_openapi(
            OpenApiBuilder::new()
                .info(
                    InfoBuilder::new()
                        .title("Wallet Auth")
                        .version(env!("CARGO_PKG_VERSION"))
                        .build(),
                )
                .build(),
        )
        .merge(wallet_auth_adapter_http::wallet::root_router())
        .split_for_parts();

        let openapi = Arc::new(openapi);

        let router = router
            .route(
                "/openapi.json",
                axum::routing::get(move || {
                    let openapi = openapi.clone();
                    async move { axum::Json(openapi.as_ref().clone()) }
                }),
            )
            .fallback(observability::axum::unknown_fallback_handler)
            .layer(observability::axum::http_layer())
            .layer(Extension(catalog));

        Ok(Self {
            listener,
            local_addr,
            router,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), InternalError> {
        tracing::info!(addr = %self.local_addr, "HTTP API is listening");

        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .int_err()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
