//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod field;
pub mod provider;
pub mod session;
pub mod status;
pub mod step;

pub use bootstrap::BootstrapPath;
pub use config::SummonConfig;
pub use error::{ActionError, BootstrapError, ConfigError, PipelineError, ProviderError, SchemaError};
pub use field::{Field, FieldKind, Verdict};
pub use provider::{Provider, ProviderKind, load_schema};
pub use session::Session;
pub use step::{Step, StepInput};
