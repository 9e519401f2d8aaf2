//! Infrastructure layer: adapters behind the domain ports.

pub mod config;
pub mod database;
pub mod http;
pub mod model;
pub mod runner;
