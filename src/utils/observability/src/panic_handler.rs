// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::backtrace::Backtrace;
use std::panic;
use std::sync::Arc;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Routes panics into the log so that a crashed request handler leaves a
/// structured record behind. When `propagate` is set the previous hook still
/// runs (prints to stderr).
pub fn set_hook_trace_panics(propagate: bool) {
    let prev_hook = propagate.then(|| Arc::new(panic::take_hook()));

    panic::set_hook(Box::new(move |info| {
        if let Some(prev_hook) = prev_hook.as_ref() {
            prev_hook(info);
        }

        let backtrace = Backtrace::force_capture();
        let error_msg = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();

        tracing::error!(
            error_msg,
            location = %location,
            error_backtrace = %backtrace,
            "Unhandled panic caught"
        );
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Unknown panic payload"
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
