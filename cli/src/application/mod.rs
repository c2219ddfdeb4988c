//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;
pub mod signal;

pub use ports::{
    Backend, CommandRunner, ConfigStore, ControllerRegistry, DatacenterClient, LocalFs,
    ModelProvisioner, ProgressReporter, StepScripts, StepView,
};
pub use signal::BootstrapSignal;
