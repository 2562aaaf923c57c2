//! # Atlas Core
//!
//! Domain types, traits, and error definitions for the Atlas research
//! pipeline. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators (the LLM backend and the web search
//! backend) are defined as traits here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod search;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use provider::{CompletionRequest, CompletionResponse, Provider, Usage};
pub use search::{ResultBlock, SearchBackend, SearchHit};
