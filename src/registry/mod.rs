//! Registry access for kind clusters

pub mod ecr;
pub mod local;

pub use local::LocalRegistry;
