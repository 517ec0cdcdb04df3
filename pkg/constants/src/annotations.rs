//! Namespace annotations written by Rancher Manager.

/// Annotation holding the `<project-namespace>:<project-name>` pair of the
/// Project a Namespace belongs to.
pub const PROJECT_ID_ANNOTATION: &str = "field.cattle.io/projectId";

/// Annotation holding the JSON `NamespaceResourceQuota` of a Namespace.
pub const RESOURCE_QUOTA_ANNOTATION: &str = "field.cattle.io/resourceQuota";

/// Separator between the project namespace and the project name.
pub const PROJECT_ID_SEPARATOR: char = ':';
