// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Routes of the wallet API. Expects `Extension<dill::Catalog>` to be layered
/// on top.
pub fn root_router() -> OpenApiRouter {
    use crate::wallet::handlers;

    OpenApiRouter::new()
        .routes(routes!(
            handlers::issue_challenge_handler,
            handlers::revoke_challenge_handler
        ))
        .routes(routes!(handlers::verify_handler))
        .routes(routes!(handlers::login_handler))
        .routes(routes!(handlers::unbind_handler))
        .routes(routes!(handlers::check_binding_handler))
        .routes(routes!(handlers::lookup_account_handler))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
