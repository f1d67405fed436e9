//! nomake - kind test clusters with registry access

pub mod commands;
pub mod config;
pub mod k8s;
pub mod registry;
pub mod utils;
