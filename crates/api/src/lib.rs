//! Host-agnostic API routing and dispatch core.
//! - Normalized requests come in from a host adapter, match against an
//!   immutable route table, run against the persistence port, and leave as
//!   exactly one canonical response.
//! - Default CRUD routes are generated per registered resource type; the
//!   dispatcher is the single translator from typed failures to statuses.

pub mod builder;
pub mod dispatcher;
pub mod errors;
pub mod handler;
pub mod resource;
pub mod routing;

mod defaults;

pub use builder::ApiBuilder;
pub use dispatcher::Api;
pub use errors::{ApiError, RegistrationError};
pub use handler::{FnHandler, RequestContext, RouteHandler};
pub use resource::{Operation, OperationSet, Resource, ResourceDescriptor};
