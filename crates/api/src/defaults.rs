use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{ApiResponse, HttpMethod};
use store::{DocumentStore, Filter, PageRequest};

use crate::errors::{ApiError, RegistrationError};
use crate::handler::{RequestContext, RouteHandler};
use crate::resource::{Operation, Resource, ResourceDescriptor};
use crate::routing::{PathPattern, RouteTable};

/// Query keys the List handler consumes itself; everything else becomes a
/// filter term.
static RESERVED_QUERY_KEYS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["pageSize", "pageToken"]));

/// Register the default CRUD routes for a resource type, honoring the
/// descriptor's operation set. Disabled operations get no route at all.
pub(crate) fn register_default_routes<T: Resource>(
    table: &mut RouteTable,
    descriptor: ResourceDescriptor,
) -> Result<(), RegistrationError> {
    let descriptor = Arc::new(descriptor);
    let base = PathPattern::parse(&format!("/{}", descriptor.collection))?;
    let item = PathPattern::parse(&format!("/{}/{{id}}", descriptor.collection))?;
    let ops = descriptor.operations;

    if ops.contains(Operation::List) {
        table.register(
            HttpMethod::Get,
            base.clone(),
            Arc::new(ListHandler {
                descriptor: Arc::clone(&descriptor),
            }),
        )?;
    }
    if ops.contains(Operation::Get) {
        table.register(
            HttpMethod::Get,
            item.clone(),
            Arc::new(GetHandler {
                descriptor: Arc::clone(&descriptor),
            }),
        )?;
    }
    if ops.contains(Operation::Create) {
        table.register(
            HttpMethod::Post,
            base,
            Arc::new(CreateHandler::<T> {
                descriptor: Arc::clone(&descriptor),
                _resource: PhantomData,
            }),
        )?;
    }
    if ops.contains(Operation::Update) {
        table.register(
            HttpMethod::Put,
            item.clone(),
            Arc::new(UpdateHandler::<T> {
                descriptor: Arc::clone(&descriptor),
                _resource: PhantomData,
            }),
        )?;
    }
    if ops.contains(Operation::Delete) {
        table.register(HttpMethod::Delete, item, Arc::new(DeleteHandler { descriptor }))?;
    }
    Ok(())
}

/// Deserialize the request body through the resource type (the 400 gate),
/// then back to a JSON object the store can hold.
fn decode_body<T: Resource>(ctx: &RequestContext) -> Result<Value, ApiError> {
    let body = ctx
        .request
        .body()
        .ok_or_else(|| ApiError::Validation("request body required".to_string()))?;
    let typed: T = serde_json::from_slice(&body.bytes)
        .map_err(|e| ApiError::Validation(format!("malformed {} body: {e}", T::TYPE_NAME)))?;
    let value =
        serde_json::to_value(typed).map_err(|e| ApiError::Internal(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::Validation(format!(
            "{} body must be a JSON object",
            T::TYPE_NAME
        )));
    }
    Ok(value)
}

fn now_stamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Keep an existing non-empty string identifier, mint a uuid otherwise.
fn assign_id(doc: &mut Value, id_field: &str) -> Result<String, ApiError> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| ApiError::Internal("document is not an object".to_string()))?;
    match obj.get(id_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => {
            Err(ApiError::Validation(format!("{id_field} must not be empty")))
        }
        Some(Value::Null) | None => {
            let id = Uuid::new_v4().to_string();
            obj.insert(id_field.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(_) => Err(ApiError::Validation(format!("{id_field} must be a string"))),
    }
}

/// Canonical Get path of a resource, absolute when a public url is set.
fn location(ctx: &RequestContext, descriptor: &ResourceDescriptor, id: &str) -> String {
    match ctx.public_url.as_deref() {
        Some(base) => format!("{}/{}/{}", base.trim_end_matches('/'), descriptor.collection, id),
        None => format!("/{}/{}", descriptor.collection, id),
    }
}

struct ListHandler {
    descriptor: Arc<ResourceDescriptor>,
}

#[async_trait]
impl RouteHandler for ListHandler {
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let descriptor = &self.descriptor;
        let mut filter = Filter::new();
        let mut page = PageRequest::default();
        for (key, value) in ctx.request.query().iter() {
            if RESERVED_QUERY_KEYS.contains(key) {
                if key == "pageSize" {
                    let size: u32 = value
                        .parse()
                        .map_err(|_| ApiError::Validation(format!("invalid pageSize: {value}")))?;
                    page.size = Some(size);
                } else {
                    page.token = Some(value.to_string());
                }
            } else {
                filter.push(key, value);
            }
        }

        let results = ctx
            .store
            .query(descriptor.type_name, &filter, &page)
            .await?;
        let mut body = json!({ "results": results.items });
        if let Some(token) = results.next_page_token {
            body["nextPageToken"] = Value::String(token);
        }
        Ok(ApiResponse::json(200, &body))
    }
}

struct GetHandler {
    descriptor: Arc<ResourceDescriptor>,
}

#[async_trait]
impl RouteHandler for GetHandler {
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let descriptor = &self.descriptor;
        let id = ctx
            .param("id")
            .ok_or_else(|| ApiError::Internal("missing id path parameter".to_string()))?;
        match ctx.store.get(descriptor.type_name, id).await? {
            Some(doc) => Ok(ApiResponse::json(200, &doc)),
            None => Err(ApiError::not_found(descriptor.type_name)),
        }
    }
}

struct CreateHandler<T> {
    descriptor: Arc<ResourceDescriptor>,
    _resource: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: Resource> RouteHandler for CreateHandler<T> {
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let descriptor = &self.descriptor;
        let mut doc = decode_body::<T>(&ctx)?;
        let id = assign_id(&mut doc, &descriptor.id_field)?;
        let stamp = now_stamp();
        if let Some(obj) = doc.as_object_mut() {
            obj.insert("dateCreated".to_string(), stamp.clone());
            obj.insert("dateModified".to_string(), stamp);
        }
        let stored = ctx.store.create(descriptor.type_name, &id, doc).await?;
        Ok(ApiResponse::json(201, &stored)
            .with_header("location", location(&ctx, descriptor, &id)))
    }
}

struct UpdateHandler<T> {
    descriptor: Arc<ResourceDescriptor>,
    _resource: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: Resource> RouteHandler for UpdateHandler<T> {
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let descriptor = &self.descriptor;
        let path_id = ctx
            .param("id")
            .ok_or_else(|| ApiError::Internal("missing id path parameter".to_string()))?
            .to_string();
        let mut doc = decode_body::<T>(&ctx)?;
        {
            let obj = doc
                .as_object_mut()
                .ok_or_else(|| ApiError::Internal("document is not an object".to_string()))?;
            match obj.get(&descriptor.id_field) {
                Some(Value::String(body_id)) if *body_id != path_id => {
                    return Err(ApiError::Validation(format!(
                        "body {} `{body_id}` does not match path id `{path_id}`",
                        descriptor.id_field
                    )));
                }
                Some(Value::String(_)) | Some(Value::Null) | None => {}
                Some(_) => {
                    return Err(ApiError::Validation(format!(
                        "{} must be a string",
                        descriptor.id_field
                    )));
                }
            }
            obj.insert(descriptor.id_field.clone(), Value::String(path_id.clone()));
            obj.insert("dateModified".to_string(), now_stamp());
        }
        match ctx
            .store
            .update(descriptor.type_name, &path_id, doc)
            .await?
        {
            Some(stored) => Ok(ApiResponse::json(200, &stored)),
            None => Err(ApiError::not_found(descriptor.type_name)),
        }
    }
}

struct DeleteHandler {
    descriptor: Arc<ResourceDescriptor>,
}

#[async_trait]
impl RouteHandler for DeleteHandler {
    async fn handle(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let descriptor = &self.descriptor;
        let id = ctx
            .param("id")
            .ok_or_else(|| ApiError::Internal("missing id path parameter".to_string()))?;
        if ctx.store.delete(descriptor.type_name, id).await? {
            Ok(ApiResponse::no_content())
        } else {
            Err(ApiError::not_found(descriptor.type_name))
        }
    }
}
