//! Rancher `Project` resource identity.

/// Group + version served by the Project resources.
pub const PROJECT_API_VERSION: &str = "management.cattle.io/v3";

/// Kind of the Project resources.
pub const PROJECT_KIND: &str = "Project";

/// Plural resource name used in REST paths.
pub const PROJECT_PLURAL: &str = "projects";
