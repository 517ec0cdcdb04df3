use pkg_capabilities::ResourceLookup;
use pkg_constants::annotations::{PROJECT_ID_ANNOTATION, RESOURCE_QUOTA_ANNOTATION};
use pkg_constants::status::CODE_BAD_REQUEST;
use pkg_quota::{QuotaViolations, validate_quotas};
use pkg_types::admission::{
    KubernetesAdmissionRequest, Settings, SettingsValidationResponse, ValidationRequest,
    ValidationResponse,
};
use pkg_types::namespace::Namespace;
use pkg_types::quota::NamespaceResourceQuota;
use pkg_types::validate::parse_project_id_annotation;
use thiserror::Error;
use tracing::{debug, info};

use crate::project::{LookupError, find_project};

/// Why a request was turned down.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Quota(#[from] QuotaViolations),
}

impl Rejection {
    /// Status code carried by the response; quota violations carry none.
    pub fn code(&self) -> Option<u16> {
        match self {
            Rejection::BadRequest(_) => Some(CODE_BAD_REQUEST),
            Rejection::Lookup(e) => Some(e.code),
            Rejection::Quota(_) => None,
        }
    }

    fn into_response(self) -> ValidationResponse {
        let code = self.code();
        ValidationResponse::reject(self.to_string(), code)
    }
}

/// Decide on a raw `ValidationRequest` payload.
pub fn validate(payload: &[u8], lookup: &dyn ResourceLookup) -> ValidationResponse {
    match serde_json::from_slice::<ValidationRequest>(payload) {
        Ok(req) => validate_request(&req.request, lookup),
        Err(e) => {
            info!("Rejecting undecodable validation request: {}", e);
            Rejection::BadRequest(e.to_string()).into_response()
        }
    }
}

/// Decide on an already decoded admission request.
pub fn validate_request(
    request: &KubernetesAdmissionRequest,
    lookup: &dyn ResourceLookup,
) -> ValidationResponse {
    match evaluate(request, lookup) {
        Ok(()) => {
            debug!("Accepted request {}", request.uid);
            ValidationResponse::accept()
        }
        Err(rejection) => {
            info!("Rejected request {}: {}", request.uid, rejection);
            rejection.into_response()
        }
    }
}

fn evaluate(
    request: &KubernetesAdmissionRequest,
    lookup: &dyn ResourceLookup,
) -> Result<(), Rejection> {
    let namespace: Namespace = serde_json::from_value(request.object.clone())
        .map_err(|e| Rejection::BadRequest(format!("Cannot decode Namespace object: {}", e)))?;

    let Some(project_id) = namespace.annotation(PROJECT_ID_ANNOTATION) else {
        debug!("Namespace is not part of a Project");
        return Ok(());
    };
    let project_ref = parse_project_id_annotation(project_id)
        .map_err(|e| Rejection::BadRequest(e.to_string()))?;

    let ns_quota = match namespace.annotation(RESOURCE_QUOTA_ANNOTATION) {
        Some(raw) => serde_json::from_str::<NamespaceResourceQuota>(raw).map_err(|e| {
            Rejection::BadRequest(format!(
                "Cannot decode NamespaceResourceQuota object: {}",
                e
            ))
        })?,
        None => NamespaceResourceQuota::default(),
    };

    let project = find_project(lookup, &project_ref)?;
    validate_quotas(project.resource_quota(), Some(&ns_quota.limit))?;
    Ok(())
}

/// The policy takes no settings; any JSON object is accepted.
pub fn validate_settings(payload: &[u8]) -> SettingsValidationResponse {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return SettingsValidationResponse::valid();
    }
    let value: serde_json::Value = match serde_json::from_slice(payload) {
        Ok(v) => v,
        Err(e) => {
            return SettingsValidationResponse::invalid(format!("Cannot decode settings: {}", e));
        }
    };
    if !value.is_object() {
        return SettingsValidationResponse::invalid("Settings must be a JSON object");
    }
    match serde_json::from_value::<Settings>(value) {
        Ok(_) => SettingsValidationResponse::valid(),
        Err(e) => SettingsValidationResponse::invalid(format!("Cannot decode settings: {}", e)),
    }
}
