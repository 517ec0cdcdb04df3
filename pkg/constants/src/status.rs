//! Status codes attached to rejected admission requests.

/// Malformed request envelope, Namespace object or annotation.
pub const CODE_BAD_REQUEST: u16 = 400;

/// The Project referenced by the Namespace does not exist.
pub const CODE_NOT_FOUND: u16 = 404;

/// The Project could not be retrieved or decoded.
pub const CODE_INTERNAL_ERROR: u16 = 500;
