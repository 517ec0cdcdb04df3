use pkg_capabilities::{GetResourceRequest, ResourceLookup};
use pkg_constants::rancher::{PROJECT_API_VERSION, PROJECT_KIND};
use pkg_constants::status::{CODE_INTERNAL_ERROR, CODE_NOT_FOUND};
use pkg_types::project::Project;
use pkg_types::validate::ProjectRef;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to resolve the parent Project, with the status code to reject with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status {code}: err {message}")]
pub struct LookupError {
    pub code: u16,
    pub message: String,
}

/// Fetch the Project identified by `project` from the cluster.
pub fn find_project(
    lookup: &dyn ResourceLookup,
    project: &ProjectRef,
) -> Result<Project, LookupError> {
    let req = GetResourceRequest {
        api_version: PROJECT_API_VERSION.to_string(),
        kind: PROJECT_KIND.to_string(),
        name: project.name.clone(),
        namespace: Some(project.namespace.clone()),
        disable_cache: true,
    };

    let raw = lookup.get_resource(&req).map_err(|e| {
        warn!("Project lookup {} failed: {:#}", project, e);
        LookupError {
            code: CODE_INTERNAL_ERROR,
            message: format!("Error retrieving the Project: {:#}", e),
        }
    })?;

    if raw.is_empty() {
        debug!("Project {} not found", project);
        return Err(LookupError {
            code: CODE_NOT_FOUND,
            message: "Project not found".to_string(),
        });
    }

    serde_json::from_slice(&raw).map_err(|e| {
        warn!("Project {} could not be decoded: {}", project, e);
        LookupError {
            code: CODE_INTERNAL_ERROR,
            message: format!("Cannot decode Project object: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use pkg_capabilities::StaticLookup;
    use pkg_types::namespace::ObjectMeta;
    use pkg_types::project::ProjectSpec;

    struct FailingLookup;

    impl ResourceLookup for FailingLookup {
        fn get_resource(&self, _req: &GetResourceRequest) -> anyhow::Result<Vec<u8>> {
            Err(anyhow!("something went wrong with the host"))
        }
    }

    fn project_ref() -> ProjectRef {
        ProjectRef {
            namespace: "proj-ns".to_string(),
            name: "proj-id".to_string(),
        }
    }

    fn lookup_returning(body: &[u8]) -> StaticLookup {
        let mut lookup = StaticLookup::new();
        let req = GetResourceRequest {
            api_version: PROJECT_API_VERSION.to_string(),
            kind: PROJECT_KIND.to_string(),
            name: "proj-id".to_string(),
            namespace: Some("proj-ns".to_string()),
            disable_cache: true,
        };
        lookup.insert(&req, body.to_vec());
        lookup
    }

    #[test]
    fn test_no_project_found() {
        let err = find_project(&StaticLookup::new(), &project_ref()).unwrap_err();
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "Project not found");
    }

    #[test]
    fn test_host_error() {
        let err = find_project(&FailingLookup, &project_ref()).unwrap_err();
        assert_eq!(err.code, 500);
        assert!(err.message.contains("something went wrong"), "{}", err.message);
    }

    #[test]
    fn test_cannot_decode_project() {
        let lookup = lookup_returning(br#"["not","a","project"]"#);
        let err = find_project(&lookup, &project_ref()).unwrap_err();
        assert_eq!(err.code, 500);
        assert!(err.message.starts_with("Cannot decode Project object"));
    }

    #[test]
    fn test_project_as_rancher_writes_it() {
        let lookup = lookup_returning(
            br#"{"kind":"Project","spec":{"displayName":"new"},"status":{"conditions":null,"podSecurityPolicyTemplateId":""}}"#,
        );
        let project = find_project(&lookup, &project_ref()).unwrap();
        assert!(project.status.conditions.is_empty());
        assert!(project.resource_quota().is_none());
    }

    #[test]
    fn test_project_found() {
        let project = Project {
            metadata: Some(ObjectMeta {
                name: Some("proj-id".to_string()),
                namespace: Some("proj-ns".to_string()),
                ..Default::default()
            }),
            spec: Some(ProjectSpec {
                display_name: "a project".to_string(),
                description: "something used by the tests".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut lookup = StaticLookup::new();
        lookup.insert_project(&project).unwrap();

        let found = find_project(&lookup, &project_ref()).unwrap();
        assert_eq!(found, project);
    }

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError {
            code: 404,
            message: "Project not found".to_string(),
        };
        assert_eq!(err.to_string(), "status 404: err Project not found");
    }
}
