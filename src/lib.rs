//! Persona-driven synthetic UX testing swarm.
//!
//! Generates diversity-constrained user personas with a generative model,
//! dispatches them as a batch to an external browser-automation service,
//! and reconciles the out-of-order result callbacks the workers post back.
//!
//! Layering follows hexagonal architecture: `domain` holds models and port
//! traits, `services` holds orchestration, `infrastructure` holds the
//! SQLite, HTTP, and model-API adapters, and `cli` is the binary surface.

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;
