//! Network-related constants.

/// Default port for the rpq policy server.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default bind address for the rpq policy server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0";

/// Default policy server address used by `rpqctl`.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// In-cluster Kubernetes API endpoint.
pub const DEFAULT_KUBE_API_SERVER: &str = "https://kubernetes.default.svc";
