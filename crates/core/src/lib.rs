//! # omni-core
//!
//! Core client logic and session routing for omni-stack.
//!
//! This crate provides:
//! - Configuration loading from `omni.toml` and environment variables
//! - The record-store client for agent configuration records
//! - The backend API client (chat, agent listing, voice tokens)
//! - The voice-room seam and session teardown
//! - The session router that turns UI operations into client calls
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`store`]: Record store client for agent configurations
//! - [`api`]: Backend API client
//! - [`voice`]: Voice room trait and adapters
//! - [`session`]: Op/Event session router

pub mod api;
pub mod config;
pub mod session;
pub mod store;
pub mod voice;
