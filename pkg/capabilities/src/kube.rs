//! Resource lookups against a live Kubernetes API server.

use anyhow::{Context, anyhow, bail};
use pkg_constants::rancher::{PROJECT_KIND, PROJECT_PLURAL};
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::lookup::{GetResourceRequest, ResourceLookup};

/// Reads resources straight from the API server. Nothing is cached, so
/// every lookup sees the live object whatever `disable_cache` says.
pub struct KubeApiLookup {
    client: Client,
    server: Url,
    token: Option<String>,
}

impl KubeApiLookup {
    pub fn new(
        server: &str,
        token: Option<String>,
        insecure_skip_tls_verify: bool,
    ) -> anyhow::Result<Self> {
        let server =
            Url::parse(server).with_context(|| format!("Invalid API server URL {}", server))?;
        if server.cannot_be_a_base() {
            bail!("API server URL {} cannot carry a path", server);
        }
        if insecure_skip_tls_verify {
            warn!("TLS verification of {} is disabled", server);
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(insecure_skip_tls_verify)
            .build()
            .context("Failed to build Kubernetes API client")?;
        Ok(Self {
            client,
            server,
            token,
        })
    }

    /// Like `new`, with the bearer token read from `token_file`.
    /// A missing file means anonymous access.
    pub fn with_token_file(
        server: &str,
        token_file: &str,
        insecure_skip_tls_verify: bool,
    ) -> anyhow::Result<Self> {
        let token = match std::fs::read_to_string(token_file) {
            Ok(t) => Some(t.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No token at {}, using anonymous access", token_file);
                None
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read token file {}", token_file));
            }
        };
        Self::new(server, token, insecure_skip_tls_verify)
    }

    /// REST URL of the object named by `req`.
    ///
    /// Every segment is percent-encoded, so a name can never climb out of
    /// its collection. Empty, `.` and `..` segments are refused.
    pub fn resource_url(&self, req: &GetResourceRequest) -> anyhow::Result<Url> {
        let plural = plural_of(&req.kind);
        let mut segments: Vec<&str> = Vec::new();
        segments.push(if req.api_version.contains('/') { "apis" } else { "api" });
        segments.extend(req.api_version.split('/'));
        if let Some(ns) = &req.namespace {
            segments.push("namespaces");
            segments.push(ns);
        }
        segments.push(&plural);
        segments.push(&req.name);

        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            bail!("Invalid path segment {:?} in {} lookup", bad, req.kind);
        }

        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API server URL {} cannot carry a path", self.server))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Lowercase plural resource name for a kind (`Project` -> `projects`).
fn plural_of(kind: &str) -> String {
    if kind == PROJECT_KIND {
        return PROJECT_PLURAL.to_string();
    }
    let lower = kind.to_ascii_lowercase();
    if lower.ends_with('s') || lower.ends_with('x') {
        format!("{}es", lower)
    } else if let Some(stem) = lower.strip_suffix('y') {
        format!("{}ies", stem)
    } else {
        format!("{}s", lower)
    }
}

impl ResourceLookup for KubeApiLookup {
    fn get_resource(&self, req: &GetResourceRequest) -> anyhow::Result<Vec<u8>> {
        let url = self.resource_url(req)?;
        debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        let resp = request
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            bail!("GET {} returned {}", url, status);
        }
        Ok(resp.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(api_version: &str, kind: &str, namespace: Option<&str>) -> GetResourceRequest {
        named(api_version, kind, namespace, "obj")
    }

    fn named(
        api_version: &str,
        kind: &str,
        namespace: Option<&str>,
        name: &str,
    ) -> GetResourceRequest {
        GetResourceRequest {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            disable_cache: true,
        }
    }

    #[test]
    fn test_plural_of() {
        assert_eq!(plural_of("Project"), "projects");
        assert_eq!(plural_of("Ingress"), "ingresses");
        assert_eq!(plural_of("NetworkPolicy"), "networkpolicies");
    }

    #[test]
    fn test_resource_url() {
        let lookup = KubeApiLookup::new("https://10.0.0.1:6443/", None, false).unwrap();
        assert_eq!(
            lookup
                .resource_url(&request("management.cattle.io/v3", "Project", Some("c-abc")))
                .unwrap()
                .as_str(),
            "https://10.0.0.1:6443/apis/management.cattle.io/v3/namespaces/c-abc/projects/obj"
        );
        assert_eq!(
            lookup
                .resource_url(&request("v1", "Namespace", None))
                .unwrap()
                .as_str(),
            "https://10.0.0.1:6443/api/v1/namespaces/obj"
        );
    }

    #[test]
    fn test_resource_url_keeps_server_path_prefix() {
        let lookup =
            KubeApiLookup::new("https://rancher.example/k8s/clusters/c-abc", None, false).unwrap();
        assert_eq!(
            lookup
                .resource_url(&request("management.cattle.io/v3", "Project", Some("c-abc")))
                .unwrap()
                .path(),
            "/k8s/clusters/c-abc/apis/management.cattle.io/v3/namespaces/c-abc/projects/obj"
        );
    }

    #[test]
    fn test_slashes_in_names_stay_inside_the_collection() {
        let lookup = KubeApiLookup::new("https://10.0.0.1:6443/", None, false).unwrap();
        let url = lookup
            .resource_url(&named(
                "management.cattle.io/v3",
                "Project",
                Some("c-abc"),
                "../../../../../api/v1/namespaces/kube-system",
            ))
            .unwrap();
        assert!(
            url.path()
                .starts_with("/apis/management.cattle.io/v3/namespaces/c-abc/projects/"),
            "{}",
            url
        );
        assert_eq!(url.path_segments().unwrap().count(), 7, "{}", url);
        assert!(!url.path().contains("/api/v1/"), "{}", url);

        let url = lookup
            .resource_url(&named(
                "management.cattle.io/v3",
                "Project",
                Some("../../api/v1/namespaces/default/secrets"),
                "p-1",
            ))
            .unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 7, "{}", url);
        assert!(url.path().ends_with("/projects/p-1"), "{}", url);
    }

    #[test]
    fn test_dot_segments_are_refused() {
        let lookup = KubeApiLookup::new("https://10.0.0.1:6443/", None, false).unwrap();
        for (namespace, name) in [("c-abc", ".."), ("c-abc", "."), ("..", "p-1"), ("c-abc", "")] {
            let req = named("management.cattle.io/v3", "Project", Some(namespace), name);
            assert!(lookup.resource_url(&req).is_err(), "{}:{}", namespace, name);
            assert!(lookup.get_resource(&req).is_err(), "{}:{}", namespace, name);
        }
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        let lookup = KubeApiLookup::new("http://127.0.0.1:1", None, false).unwrap();
        assert!(
            lookup
                .get_resource(&request("management.cattle.io/v3", "Project", Some("ns")))
                .is_err()
        );
    }
}
