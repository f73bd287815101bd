// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Api-root resolution

/// Supplies the base URL prefix the stream endpoint is joined onto.
///
/// Consulted on every `open`, so a resolver may change its answer between
/// connections.
pub trait ApiRoot: Send + Sync + 'static {
    fn api_root(&self) -> String;
}

impl ApiRoot for String {
    fn api_root(&self) -> String {
        self.clone()
    }
}

impl ApiRoot for &'static str {
    fn api_root(&self) -> String {
        (*self).to_string()
    }
}

/// Resolve the api root by calling a closure
pub struct ApiRootFn<F>(pub F);

impl<F> ApiRoot for ApiRootFn<F>
where
    F: Fn() -> String + Send + Sync + 'static,
{
    fn api_root(&self) -> String {
        (self.0)()
    }
}
