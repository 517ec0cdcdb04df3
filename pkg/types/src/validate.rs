use anyhow::{Result, bail};

/// Identity of the Project a Namespace belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub namespace: String,
    pub name: String,
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Parse the value of the `field.cattle.io/projectId` annotation.
/// Format: `<project-namespace>:<project-name>`, both parts non-empty.
pub fn parse_project_id_annotation(annotation: &str) -> Result<ProjectRef> {
    let chunks: Vec<&str> = annotation
        .split(pkg_constants::annotations::PROJECT_ID_SEPARATOR)
        .collect();
    if chunks.len() != 2 {
        bail!("cannot parse projectId annotation: wrong format");
    }
    if chunks[0].is_empty() {
        bail!("Project Namespace is empty");
    }
    if chunks[1].is_empty() {
        bail!("Project ID is empty");
    }
    Ok(ProjectRef {
        namespace: chunks[0].to_string(),
        name: chunks[1].to_string(),
    })
}
