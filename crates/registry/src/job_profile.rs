use api::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalogued job profile: the parameter contract a job of this kind must
/// satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_parameters: Vec<JobParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_input_parameters: Vec<JobParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_parameters: Vec<JobParameter>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobParameter {
    pub parameter_name: String,
    pub parameter_type: String,
}

impl Resource for JobProfile {
    const TYPE_NAME: &'static str = "JobProfile";
}
