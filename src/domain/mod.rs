//! Domain layer: core business types and port definitions.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{CallbackError, DispatchError, GenerationError, ModelError, RunnerError};
