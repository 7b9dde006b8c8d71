use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;

/// Equality filter over top-level document fields.
///
/// Terms with distinct keys must all hold (AND); repeated keys accept any of
/// their values (OR). Non-string fields compare against the JSON rendering of
/// the wanted value. This is v1 of the port's filter grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    terms: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.terms.push((key.into(), value.into()));
    }

    pub fn term(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, doc: &Value) -> bool {
        let obj = match doc.as_object() {
            Some(obj) => obj,
            None => return self.terms.is_empty(),
        };
        let mut seen: Vec<&str> = Vec::new();
        for (key, _) in &self.terms {
            if seen.contains(&key.as_str()) {
                continue;
            }
            seen.push(key);
            let field = obj.get(key);
            let any_value_matches = self
                .terms
                .iter()
                .filter(|(k, _)| k == key)
                .any(|(_, wanted)| field_matches(field, wanted));
            if !any_value_matches {
                return false;
            }
        }
        true
    }
}

fn field_matches(field: Option<&Value>, wanted: &str) -> bool {
    match field {
        Some(Value::String(s)) => s == wanted,
        Some(other) => other.to_string() == wanted,
        None => false,
    }
}

/// Pagination input. `size: None` means "everything after the token".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub size: Option<u32>,
    pub token: Option<String>,
}

impl PageRequest {
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Clamp a requested size to `1..=MAX_PAGE_SIZE`.
    pub fn normalized_size(&self) -> Option<usize> {
        self.size.map(|n| n.clamp(1, Self::MAX_PAGE_SIZE) as usize)
    }
}

/// One page of query results. `next_page_token` is an opaque store-minted
/// string the caller feeds back verbatim to continue; the reference stores
/// mint a decimal offset into the stable id ordering (token contract v1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResults {
    pub items: Vec<Value>,
    pub next_page_token: Option<String>,
}

/// Abstract storage contract for type-tagged JSON documents.
///
/// The identifier travels alongside the document so stores never parse
/// resource schemas; the caller owns id extraction. Absence is `None`/`false`,
/// never an error. Consistency and locking discipline belong to the
/// implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(
        &self,
        type_name: &str,
        filter: &Filter,
        page: &PageRequest,
    ) -> Result<QueryResults, StoreError>;

    async fn get(&self, type_name: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when `id` already exists.
    async fn create(&self, type_name: &str, id: &str, doc: Value) -> Result<Value, StoreError>;

    /// `None` when `id` does not exist; nothing is written in that case.
    async fn update(&self, type_name: &str, id: &str, doc: Value)
        -> Result<Option<Value>, StoreError>;

    /// `true` when something was deleted.
    async fn delete(&self, type_name: &str, id: &str) -> Result<bool, StoreError>;
}

pub(crate) type TypeMap = HashMap<String, BTreeMap<String, Value>>;

/// Filter + paginate a snapshot of one type's documents, in stable id order.
pub(crate) fn run_query(
    types: &TypeMap,
    type_name: &str,
    filter: &Filter,
    page: &PageRequest,
) -> Result<QueryResults, StoreError> {
    let matching: Vec<Value> = types
        .get(type_name)
        .map(|docs| {
            docs.values()
                .filter(|doc| filter.matches(doc))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let offset = match &page.token {
        Some(token) => token
            .parse::<usize>()
            .map_err(|_| StoreError::Invalid(format!("malformed page token: {token}")))?,
        None => 0,
    };

    let total = matching.len();
    let items: Vec<Value> = match page.normalized_size() {
        Some(size) => matching.into_iter().skip(offset).take(size).collect(),
        None => matching.into_iter().skip(offset).collect(),
    };
    let consumed = offset + items.len();
    let next_page_token = (consumed < total).then(|| consumed.to_string());

    Ok(QueryResults {
        items,
        next_page_token,
    })
}
