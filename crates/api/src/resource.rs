use serde::de::DeserializeOwned;
use serde::Serialize;

/// A registrable resource type. The serde bounds are the type's canonical
/// body codec; `TYPE_NAME` keys its documents in the store and must be unique
/// per api.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
}

/// The default operations a resource type can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn bit(self) -> u8 {
        match self {
            Operation::List => 1 << 0,
            Operation::Get => 1 << 1,
            Operation::Create => 1 << 2,
            Operation::Update => 1 << 3,
            Operation::Delete => 1 << 4,
        }
    }
}

/// Set of enabled default operations; everything is on by default. A route
/// for a disabled operation is never registered, so requests to it 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSet(u8);

impl OperationSet {
    pub fn all() -> Self {
        Self(0x1f)
    }

    pub fn none() -> Self {
        Self(0)
    }

    pub fn with(self, op: Operation) -> Self {
        Self(self.0 | op.bit())
    }

    pub fn without(self, op: Operation) -> Self {
        Self(self.0 & !op.bit())
    }

    pub fn contains(&self, op: Operation) -> bool {
        self.0 & op.bit() != 0
    }
}

impl Default for OperationSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Per-type metadata the default route factory works from.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub type_name: &'static str,
    /// URL collection segment, e.g. `services`, `job-profiles`.
    pub collection: String,
    /// Identifier field inside the document body.
    pub id_field: String,
    pub operations: OperationSet,
}

impl ResourceDescriptor {
    pub fn new<T: Resource>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            collection: collection_segment(T::TYPE_NAME),
            id_field: "id".to_string(),
            operations: OperationSet::all(),
        }
    }

    pub fn collection(mut self, segment: impl Into<String>) -> Self {
        self.collection = segment.into();
        self
    }

    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn operations(mut self, operations: OperationSet) -> Self {
        self.operations = operations;
        self
    }

    pub fn without(mut self, op: Operation) -> Self {
        self.operations = self.operations.without(op);
        self
    }
}

/// Lower-cased kebab plural of a CamelCase type name:
/// `Service` -> `services`, `JobProfile` -> `job-profiles`.
pub fn collection_segment(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + 2);
    for (i, ch) in type_name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out.push('s');
    out
}
