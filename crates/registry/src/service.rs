use api::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalogued service descriptor: where a service lives and which job
/// profiles it can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_profile_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

/// One addressable endpoint a service exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEndpoint {
    pub resource_type: String,
    pub http_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
}

impl Resource for Service {
    const TYPE_NAME: &'static str = "Service";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_is_camel_case_without_empty_fields() {
        let service = Service {
            id: Some("s-1".into()),
            name: "Encoder".into(),
            auth_type: None,
            resources: vec![ResourceEndpoint {
                resource_type: "JobAssignment".into(),
                http_endpoint: "https://encoder.example.com/job-assignments".into(),
                auth_type: None,
            }],
            job_type: Some("TransformJob".into()),
            job_profile_ids: vec![],
            date_created: None,
            date_modified: None,
        };
        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["jobType"], "TransformJob");
        assert_eq!(value["resources"][0]["httpEndpoint"].as_str().unwrap(),
            "https://encoder.example.com/job-assignments");
        assert!(value.get("authType").is_none());
        assert!(value.get("jobProfileIds").is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let service: Service = serde_json::from_str(r#"{"name":"Encoder"}"#).unwrap();
        assert_eq!(service.name, "Encoder");
        assert!(service.id.is_none());
        assert!(service.resources.is_empty());
    }

    #[test]
    fn name_is_required() {
        assert!(serde_json::from_str::<Service>(r#"{"jobType":"x"}"#).is_err());
    }
}
