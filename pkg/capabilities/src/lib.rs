//! Host capabilities the policy relies on.
//!
//! The only capability is fetching a single Kubernetes resource by name.
//! It is a blocking call; async callers run it on a blocking thread.

pub mod kube;
pub mod lookup;
pub mod static_lookup;

pub use kube::KubeApiLookup;
pub use lookup::{GetResourceRequest, ResourceLookup};
pub use static_lookup::StaticLookup;
