use pkg_types::quota::{ProjectResourceQuota, ResourceQuotaLimit};
use thiserror::Error;

use crate::dimension::Dimension;
use crate::quantity::{Quantity, QuantityError};

/// Which of the three values of a dimension check failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaField {
    NamespaceLimit,
    ProjectLimit,
    ProjectUsed,
}

impl std::fmt::Display for QuotaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaField::NamespaceLimit => write!(f, "namespace limit"),
            QuotaField::ProjectLimit => write!(f, "project limit"),
            QuotaField::ProjectUsed => write!(f, "project used quota"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Cannot convert {field} to quantity: {source}")]
    QuantityParse {
        field: QuotaField,
        source: QuantityError,
    },
    #[error(
        "Namespace requested limit exceeds the availability of the project resource: requested {requested}, available {available}"
    )]
    ExceedsAvailability {
        requested: Quantity,
        available: Quantity,
    },
}

/// A failed check, tagged with the dimension it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{dimension} limit: {error}")]
pub struct DimensionError {
    pub dimension: Dimension,
    pub error: CheckError,
}

/// Every failed dimension of one validation, in `Dimension::ALL` order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct QuotaViolations {
    pub errors: Vec<DimensionError>,
}

impl std::fmt::Display for QuotaViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join(", "))
    }
}

impl QuotaViolations {
    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.errors.iter().map(|e| e.dimension)
    }
}

fn parse_field(value: &str, field: QuotaField) -> Result<Quantity, CheckError> {
    let value = if value.is_empty() { "0" } else { value };
    Quantity::parse(value).map_err(|source| CheckError::QuantityParse { field, source })
}

/// Compare what a namespace requests against what the project has left.
///
/// Fails when one of the values is not a quantity, or when the request is
/// larger than `project limit - project used`. An over-committed project
/// has negative availability and rejects even a zero request.
pub fn check_limit_vs_available(
    ns_limit: &str,
    prj_limit: &str,
    prj_used: &str,
) -> Result<(), CheckError> {
    let requested = parse_field(ns_limit, QuotaField::NamespaceLimit)?;
    let limit = parse_field(prj_limit, QuotaField::ProjectLimit)?;
    let used = parse_field(prj_used, QuotaField::ProjectUsed)?;

    let available = limit - used;
    if requested > available {
        return Err(CheckError::ExceedsAvailability {
            requested,
            available,
        });
    }
    Ok(())
}

/// Check a namespace request against the project quota on every dimension.
///
/// A project without quota accepts everything. A missing request counts as
/// zero everywhere. All dimensions are checked; every failure is reported.
pub fn validate_quotas(
    project_quota: Option<&ProjectResourceQuota>,
    ns_limits: Option<&ResourceQuotaLimit>,
) -> Result<(), QuotaViolations> {
    let Some(quota) = project_quota else {
        return Ok(());
    };
    let empty = ResourceQuotaLimit::default();
    let ns_limits = ns_limits.unwrap_or(&empty);

    let errors: Vec<DimensionError> = Dimension::ALL
        .iter()
        .filter_map(|&dimension| {
            check_limit_vs_available(
                dimension.value(ns_limits),
                dimension.value(&quota.limit),
                dimension.value(&quota.used_limit),
            )
            .err()
            .map(|error| DimensionError { dimension, error })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(QuotaViolations { errors })
    }
}
