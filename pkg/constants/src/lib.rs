//! Centralized constants for the rpq project.
//!
//! All project-wide constant values live here.
//! Change a value in one place and it applies everywhere.

pub mod annotations;
pub mod network;
pub mod paths;
pub mod rancher;
pub mod status;
