//! External execution service adapters.

pub mod client;

pub use client::HttpRunnerClient;
