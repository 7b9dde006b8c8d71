use std::sync::Arc;

use tracing::{debug, error, info, info_span, Instrument};

use common::{ApiRequest, ApiResponse};
use store::DocumentStore;

use crate::errors::ApiError;
use crate::handler::{RequestContext, RouteHandler};
use crate::routing::RouteTable;

/// The assembled api: an immutable route table bound to a persistence port.
///
/// `handle` is the whole request lifecycle (match, run, translate failures)
/// and is total: every invocation produces exactly one response, and nothing
/// escapes past this boundary to the host adapter. Hosts cancel by dropping
/// the `handle` future (or wrapping it in their own deadline); handlers do no
/// detached work, so a drop aborts at the next await point.
pub struct Api {
    name: String,
    routes: RouteTable,
    store: Arc<dyn DocumentStore>,
    public_url: Option<String>,
}

impl Api {
    pub(crate) fn new(
        name: String,
        routes: RouteTable,
        store: Arc<dyn DocumentStore>,
        public_url: Option<String>,
    ) -> Self {
        Self {
            name,
            routes,
            store,
            public_url,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let span = info_span!(
            "api_request",
            app = %self.name,
            method = %request.method(),
            path = %request.path(),
        );
        async move {
            let (handler, params) = {
                let segments = request.segments();
                match self.routes.find(request.method(), &segments) {
                    Some(matched) => (matched.route.handler(), matched.params),
                    None => {
                        debug!("no route matched");
                        return ApiResponse::error(404, "resource not found");
                    }
                }
            };
            let ctx = RequestContext {
                request,
                params,
                store: Arc::clone(&self.store),
                public_url: self.public_url.clone(),
            };
            match handler.handle(ctx).await {
                Ok(response) => {
                    info!(status = response.status(), "handled");
                    response
                }
                Err(err) => self.error_response(err),
            }
        }
        .instrument(span)
        .await
    }

    /// The one place failures become statuses. Internal detail is logged,
    /// never sent.
    fn error_response(&self, err: ApiError) -> ApiResponse {
        let status = err.status();
        if status >= 500 {
            error!(error = %err, "request failed");
            ApiResponse::error(status, "internal server error")
        } else {
            debug!(error = %err, "request rejected");
            ApiResponse::error(status, &err.to_string())
        }
    }
}
