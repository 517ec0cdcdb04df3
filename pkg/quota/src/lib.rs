//! Quota comparison engine.
//!
//! Parses Kubernetes quantities, computes what is left of a Project's quota
//! and checks a Namespace request against it on every quota dimension.

pub mod dimension;
pub mod quantity;
pub mod validator;

pub use dimension::Dimension;
pub use quantity::{Format, Quantity, QuantityError, QuantityErrorKind};
pub use validator::{
    CheckError, DimensionError, QuotaField, QuotaViolations, check_limit_vs_available,
    validate_quotas,
};
