//! Kubernetes operations

pub mod kind;
pub mod kind_config;
pub mod kubeconfig;
pub mod kubectl;
