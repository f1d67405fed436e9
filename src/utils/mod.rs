//! Utility modules for nomake

pub mod container;
pub mod dryrun;
pub mod errors;
pub mod exec;
pub mod logger;
pub mod paths;
pub mod prereqs;
#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use container::ContainerRuntime;
pub use errors::NomakeError;
pub use prereqs::{CommonPrereqs, Prerequisite};
