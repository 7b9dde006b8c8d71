use std::collections::HashSet;
use std::sync::Arc;

use common::HttpMethod;
use store::DocumentStore;

use crate::defaults::register_default_routes;
use crate::dispatcher::Api;
use crate::errors::RegistrationError;
use crate::handler::RouteHandler;
use crate::resource::{Resource, ResourceDescriptor};
use crate::routing::{PathPattern, RouteTable};

/// Application-assembly step: collects routes once at startup and produces an
/// immutable [`Api`]. Every failure here is startup-fatal; a conflicting or
/// duplicate registration must never wait for a request to be noticed.
pub struct ApiBuilder {
    name: String,
    public_url: Option<String>,
    routes: RouteTable,
    registered_types: HashSet<String>,
}

impl ApiBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_url: None,
            routes: RouteTable::new(),
            registered_types: HashSet::new(),
        }
    }

    /// Absolute base for generated `Location` headers.
    pub fn public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Register the default CRUD routes for a resource type.
    pub fn add_default_routes<T: Resource>(self) -> Result<Self, RegistrationError> {
        self.add_default_routes_with::<T>(ResourceDescriptor::new::<T>())
    }

    /// Same, with a customized descriptor (collection segment, id field,
    /// disabled operations).
    pub fn add_default_routes_with<T: Resource>(
        mut self,
        descriptor: ResourceDescriptor,
    ) -> Result<Self, RegistrationError> {
        if !self
            .registered_types
            .insert(descriptor.type_name.to_string())
        {
            return Err(RegistrationError::DuplicateType(
                descriptor.type_name.to_string(),
            ));
        }
        register_default_routes::<T>(&mut self.routes, descriptor)?;
        Ok(self)
    }

    /// Register a custom route alongside the defaults.
    pub fn add_route(
        mut self,
        method: HttpMethod,
        pattern: &str,
        handler: impl RouteHandler + 'static,
    ) -> Result<Self, RegistrationError> {
        let pattern = PathPattern::parse(pattern)?;
        self.routes.register(method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    /// Freeze the route table and bind the persistence port.
    pub fn build(self, store: Arc<dyn DocumentStore>) -> Api {
        Api::new(self.name, self.routes, store, self.public_url)
    }
}
