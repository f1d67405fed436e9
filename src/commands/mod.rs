//! Command implementations for nomake CLI

pub mod check;
pub mod cluster;
pub mod kubeconfig;
