pub mod admission;
pub mod config;
pub mod de;
pub mod namespace;
pub mod project;
pub mod quota;
pub mod validate;
