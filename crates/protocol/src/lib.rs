//! # omni-protocol
//!
//! Core protocol definitions and data models for omni-stack.
//!
//! This crate defines all shared data structures used for:
//! - Agent configuration records stored in the hosted record store
//! - Chat and voice wire formats exchanged with the backend API
//! - Inter-process communication between TUI and Core
//!
//! ## Modules
//!
//! - [`agent_models`]: Agent configuration and custom tool structures
//! - [`chat_models`]: Chat message and request/response structures
//! - [`voice_models`]: Voice session token and state structures
//! - [`ipc`]: Operations and Events for Core-TUI communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, uuid, chrono, and indexmap
//! - TypeScript generation: All types derive `TS` for the web client
//! - Independent compilation: No dependencies on other omni-stack crates

pub mod agent_models;
pub mod chat_models;
pub mod ipc;
pub mod voice_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use chat_models::*;
pub use ipc::*;
pub use voice_models::*;
