use std::collections::HashMap;
use std::sync::Arc;

use common::HttpMethod;

use crate::errors::RegistrationError;
use crate::handler::RouteHandler;
use crate::routing::pattern::PathPattern;

/// A registered route: method + pattern + handler.
pub struct Route {
    method: HttpMethod,
    pattern: PathPattern,
    handler: Arc<dyn RouteHandler>,
}

impl Route {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> Arc<dyn RouteHandler> {
        Arc::clone(&self.handler)
    }
}

/// A successful match: the route plus captured path parameters.
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

/// Ordered route collection, immutable once the application is assembled.
///
/// Registration rejects any pair of same-method routes that could both match
/// one request without a literal-count winner, so request-time matching can
/// never tie.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        method: HttpMethod,
        pattern: PathPattern,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), RegistrationError> {
        for existing in self.routes.iter().filter(|r| r.method == method) {
            if existing.pattern.overlaps(&pattern)
                && existing.pattern.literal_count() == pattern.literal_count()
            {
                return Err(RegistrationError::RouteConflict {
                    method,
                    pattern: pattern.raw().to_string(),
                    existing: existing.pattern.raw().to_string(),
                });
            }
        }
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(())
    }

    /// Resolve a request. Among matching candidates the one with the most
    /// literal segments wins; registration guarantees that winner is unique.
    pub fn find(&self, method: HttpMethod, path: &[&str]) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .filter_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| RouteMatch { route, params })
            })
            .max_by_key(|m| m.route.pattern.literal_count())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
