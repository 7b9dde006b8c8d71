//! Service registry application assembly.
//! - Two catalogued resource kinds (`Service`, `JobProfile`) registered with
//!   default CRUD routes on one shared api core.
//! - Host adapters call [`from_config`] (or [`build_api`] with their own
//!   store) during cold start and then feed canonical requests to the
//!   returned [`api::Api`].

pub mod assembly;
pub mod job_profile;
pub mod service;

pub use assembly::{build_api, build_store, from_config, APP_NAME};
pub use job_profile::{JobParameter, JobProfile};
pub use service::{ResourceEndpoint, Service};
