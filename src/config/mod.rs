//! Configuration for nomake

pub mod settings;

pub use settings::Settings;
