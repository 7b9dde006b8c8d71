use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ApiRequest, ApiResponse};
use store::DocumentStore;

use crate::errors::ApiError;

/// Everything one invocation hands to its handler. Owned, so the produced
/// future borrows nothing from the dispatcher.
pub struct RequestContext {
    pub request: ApiRequest,
    pub params: HashMap<String, String>,
    pub store: Arc<dyn DocumentStore>,
    /// Absolute base for `Location` headers, when configured.
    pub public_url: Option<String>,
}

impl RequestContext {
    /// Captured path parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A matched route's work. Handlers raise typed failures; only the
/// dispatcher turns them into statuses.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError>;
}

/// Adapter so plain async closures can be registered as routes.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> RouteHandler for FnHandler<F>
where
    F: Fn(RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse, ApiError>> + Send + 'static,
{
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        (self.0)(ctx).await
    }
}
