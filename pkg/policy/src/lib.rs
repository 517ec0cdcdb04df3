//! Admission decision for Namespaces belonging to a Rancher Project.
//!
//! Decodes the admission request, resolves the parent Project through a
//! [`ResourceLookup`](pkg_capabilities::ResourceLookup) and checks the
//! Namespace quota request against what the Project has left.

pub mod project;
pub mod validate;

pub use project::{LookupError, find_project};
pub use validate::{Rejection, validate, validate_request, validate_settings};
