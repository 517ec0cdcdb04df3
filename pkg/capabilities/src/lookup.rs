use serde::{Deserialize, Serialize};

/// Identifies the resource to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResourceRequest {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Ask the host to bypass any cache and read the live object.
    #[serde(default)]
    pub disable_cache: bool,
}

/// Fetch a resource from the cluster.
///
/// Returns the raw JSON of the object, an empty buffer when the object
/// does not exist, or an error when the lookup itself failed.
pub trait ResourceLookup: Send + Sync {
    fn get_resource(&self, req: &GetResourceRequest) -> anyhow::Result<Vec<u8>>;
}

impl<T: ResourceLookup + ?Sized> ResourceLookup for std::sync::Arc<T> {
    fn get_resource(&self, req: &GetResourceRequest) -> anyhow::Result<Vec<u8>> {
        (**self).get_resource(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let req = GetResourceRequest {
            api_version: "management.cattle.io/v3".to_string(),
            kind: "Project".to_string(),
            name: "proj-id".to_string(),
            namespace: Some("proj-ns".to_string()),
            disable_cache: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["apiVersion"], "management.cattle.io/v3");
        assert_eq!(json["kind"], "Project");
        assert_eq!(json["name"], "proj-id");
        assert_eq!(json["namespace"], "proj-ns");
        assert_eq!(json["disableCache"], true);
    }
}
