// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::response::IntoResponse;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Request tracing layer: one span per request carrying method, matched route
/// and URI, response logged at `INFO`
pub fn http_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&http::Request<axum::body::Body>) -> tracing::Span,
> {
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as fn(&http::Request<axum::body::Body>) -> tracing::Span)
        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO))
}

fn make_request_span(request: &http::Request<axum::body::Body>) -> tracing::Span {
    let route = request
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(axum::extract::MatchedPath::as_str)
        .unwrap_or_default();

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        route,
        uri = %request.uri(),
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn unknown_fallback_handler(uri: http::Uri) -> impl IntoResponse {
    tracing::warn!(%uri, "Unknown route");

    (
        http::StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({ "message": "Not Found" })),
    )
}
