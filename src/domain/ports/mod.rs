//! Port trait definitions (hexagonal architecture).
//!
//! Async trait interfaces that infrastructure adapters implement:
//! repositories over SQLite, the generative model client, and the external
//! execution service client.

pub mod batch_repository;
pub mod callback_repository;
pub mod errors;
pub mod model_client;
pub mod runner_client;
pub mod slot_repository;

pub use batch_repository::BatchRepository;
pub use callback_repository::CallbackRepository;
pub use errors::DatabaseError;
pub use model_client::ModelClient;
pub use runner_client::{DispatchAck, DispatchRequest, RunnerClient};
pub use slot_repository::{SlotOutcome, SlotRepository};
