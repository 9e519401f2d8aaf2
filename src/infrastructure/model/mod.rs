//! Generative model adapters.

pub mod anthropic;

pub use anthropic::AnthropicModelClient;
