//! Rancher `management.cattle.io/v3` Project custom resource.
//!
//! Only the quota is consulted by the policy, but the whole object is
//! modelled so that a Project fetched from the cluster decodes cleanly.

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;
use crate::namespace::ObjectMeta;
use crate::quota::{ContainerResourceLimit, NamespaceResourceQuota, ProjectResourceQuota};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ProjectSpec>,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Project {
    /// The quota granted to this Project, if any.
    pub fn resource_quota(&self) -> Option<&ProjectResourceQuota> {
        self.spec.as_ref().and_then(|s| s.resource_quota.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_quota: Option<ProjectResourceQuota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_default_resource_quota: Option<NamespaceResourceQuota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_default_resource_limit: Option<ContainerResourceLimit>,
    #[serde(default)]
    pub enable_project_monitoring: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub conditions: Vec<ProjectCondition>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "podSecurityPolicyTemplateId"
    )]
    pub pod_security_policy_template_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_status: Option<MonitoringStatus>,
}

/// Status of a condition. Kubernetes uses True, False and Unknown, but the
/// field is a free string; anything else is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
    Other(String),
}

impl From<String> for ConditionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            "Unknown" | "" => ConditionStatus::Unknown,
            _ => ConditionStatus::Other(s),
        }
    }
}

impl From<ConditionStatus> for String {
    fn from(status: ConditionStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
            ConditionStatus::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCondition {
    #[serde(default, deserialize_with = "null_as_default", rename = "type")]
    pub condition_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ConditionStatus,
    /// Timestamps are kept verbatim; Rancher sometimes writes empty strings.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_update_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_transition_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub grafana_endpoint: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conditions: Vec<MonitoringCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringCondition {
    #[serde(default, deserialize_with = "null_as_default", rename = "type")]
    pub condition_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_update_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_transition_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rancher_project() {
        let raw = r#"{
            "apiVersion": "management.cattle.io/v3",
            "kind": "Project",
            "metadata": {"name": "p-xyz", "namespace": "c-abc"},
            "spec": {
                "displayName": "Default",
                "description": "",
                "clusterName": "c-abc",
                "resourceQuota": {
                    "limit": {"pods": "100", "requestsMemory": "8Gi"},
                    "usedLimit": {"pods": "12"}
                },
                "namespaceDefaultResourceQuota": {"limit": {"pods": "10"}},
                "enableProjectMonitoring": false
            },
            "status": {
                "conditions": [
                    {"type": "BackingNamespaceCreated", "status": "True", "lastUpdateTime": ""}
                ],
                "podSecurityPolicyTemplateId": ""
            }
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        let quota = project.resource_quota().unwrap();
        assert_eq!(quota.limit.pods.as_deref(), Some("100"));
        assert_eq!(quota.limit.requests_memory.as_deref(), Some("8Gi"));
        assert_eq!(quota.used_limit.pods.as_deref(), Some("12"));
        assert_eq!(project.status.conditions.len(), 1);
        assert_eq!(project.status.conditions[0].status, ConditionStatus::True);
    }

    #[test]
    fn test_decode_project_with_null_slices() {
        let raw = r#"{
            "apiVersion": "management.cattle.io/v3",
            "kind": "Project",
            "metadata": {"name": "p-new", "namespace": "c-abc", "labels": null},
            "spec": {
                "displayName": "fresh",
                "resourceQuota": {"limit": {"pods": "10"}, "usedLimit": {}}
            },
            "status": {
                "conditions": null,
                "podSecurityPolicyTemplateId": null,
                "monitoringStatus": {"grafanaEndpoint": "", "conditions": null}
            }
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert!(project.status.conditions.is_empty());
        assert!(project.status.monitoring_status.as_ref().unwrap().conditions.is_empty());
        assert_eq!(
            project.resource_quota().unwrap().limit.pods.as_deref(),
            Some("10")
        );
    }

    #[test]
    fn test_condition_status_is_a_free_string() {
        let raw = r#"{
            "status": {
                "conditions": [
                    {"type": "InitialRolesPopulated", "status": "Pending"},
                    {"type": "BackingNamespaceCreated"},
                    {"type": "DefaultNetworkPolicyCreated", "status": "False"}
                ]
            }
        }"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        let statuses: Vec<&ConditionStatus> =
            project.status.conditions.iter().map(|c| &c.status).collect();
        assert_eq!(
            statuses,
            vec![
                &ConditionStatus::Other("Pending".to_string()),
                &ConditionStatus::Unknown,
                &ConditionStatus::False,
            ]
        );

        let json = serde_json::to_value(&project.status.conditions[0]).unwrap();
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn test_project_without_spec_has_no_quota() {
        let project: Project = serde_json::from_str(r#"{"kind":"Project"}"#).unwrap();
        assert!(project.resource_quota().is_none());
    }

    #[test]
    fn test_project_without_quota() {
        let project: Project =
            serde_json::from_str(r#"{"spec":{"displayName":"a project"}}"#).unwrap();
        assert!(project.spec.is_some());
        assert!(project.resource_quota().is_none());
    }

    #[test]
    fn test_array_is_not_a_project() {
        assert!(serde_json::from_str::<Project>(r#"["not","a","project"]"#).is_err());
    }
}
