//! SQLite persistence adapters.

pub mod batch_repo;
pub mod callback_repo;
pub mod connection;
pub mod slot_repo;
pub mod utils;

pub use batch_repo::BatchRepositoryImpl;
pub use callback_repo::CallbackRepositoryImpl;
pub use connection::DatabaseConnection;
pub use slot_repo::SlotRepositoryImpl;
