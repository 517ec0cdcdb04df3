use std::collections::HashMap;

use anyhow::Context;
use pkg_constants::rancher::{PROJECT_API_VERSION, PROJECT_KIND};
use pkg_types::project::Project;
use tracing::debug;

use crate::lookup::{GetResourceRequest, ResourceLookup};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResourceKey {
    api_version: String,
    kind: String,
    namespace: Option<String>,
    name: String,
}

impl From<&GetResourceRequest> for ResourceKey {
    fn from(req: &GetResourceRequest) -> Self {
        Self {
            api_version: req.api_version.clone(),
            kind: req.kind.clone(),
            namespace: req.namespace.clone(),
            name: req.name.clone(),
        }
    }
}

/// In-memory set of canned resources. Unknown resources read as "not found".
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    objects: HashMap<ResourceKey, Vec<u8>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the raw body returned for `req`.
    pub fn insert(&mut self, req: &GetResourceRequest, body: Vec<u8>) {
        self.objects.insert(ResourceKey::from(req), body);
    }

    /// Register a Project under the name and namespace found in its metadata.
    pub fn insert_project(&mut self, project: &Project) -> anyhow::Result<()> {
        let meta = project
            .metadata
            .as_ref()
            .context("Project has no metadata")?;
        let name = meta.name.clone().context("Project has no name")?;
        let req = GetResourceRequest {
            api_version: PROJECT_API_VERSION.to_string(),
            kind: PROJECT_KIND.to_string(),
            name,
            namespace: meta.namespace.clone(),
            disable_cache: true,
        };
        self.insert(&req, serde_json::to_vec(project)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ResourceLookup for StaticLookup {
    fn get_resource(&self, req: &GetResourceRequest) -> anyhow::Result<Vec<u8>> {
        let body = self
            .objects
            .get(&ResourceKey::from(req))
            .cloned()
            .unwrap_or_default();
        debug!(
            "Static lookup {}/{} {:?}/{}: {} bytes",
            req.api_version,
            req.kind,
            req.namespace,
            req.name,
            body.len()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::namespace::ObjectMeta;

    fn project_request(ns: &str, name: &str) -> GetResourceRequest {
        GetResourceRequest {
            api_version: PROJECT_API_VERSION.to_string(),
            kind: PROJECT_KIND.to_string(),
            name: name.to_string(),
            namespace: Some(ns.to_string()),
            disable_cache: true,
        }
    }

    #[test]
    fn test_unknown_resource_is_empty() {
        let lookup = StaticLookup::new();
        let body = lookup.get_resource(&project_request("c-1", "p-1")).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_insert_project_by_metadata() {
        let project = Project {
            metadata: Some(ObjectMeta {
                name: Some("p-1".to_string()),
                namespace: Some("c-1".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut lookup = StaticLookup::new();
        lookup.insert_project(&project).unwrap();
        assert_eq!(lookup.len(), 1);

        let body = lookup.get_resource(&project_request("c-1", "p-1")).unwrap();
        let decoded: Project = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded, project);

        assert!(lookup.get_resource(&project_request("c-2", "p-1")).unwrap().is_empty());
    }

    #[test]
    fn test_insert_project_requires_name() {
        let mut lookup = StaticLookup::new();
        assert!(lookup.insert_project(&Project::default()).is_err());
        assert!(lookup.is_empty());
    }

    #[test]
    fn test_cache_flag_does_not_change_identity() {
        let mut lookup = StaticLookup::new();
        lookup.insert(&project_request("c-1", "p-1"), b"{}".to_vec());
        let mut req = project_request("c-1", "p-1");
        req.disable_cache = false;
        assert_eq!(lookup.get_resource(&req).unwrap(), b"{}".to_vec());
    }
}
