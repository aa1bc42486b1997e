//! Scout Core - Shared data model for the Mercari shopping agent.
//!
//! This crate provides the entities that flow through one request's pipeline:
//! - `SearchIntent` - structured representation of what the user wants to buy
//! - `ItemSummary` / `ItemDetail` - one listing, at search-row and detail depth
//! - `Recommendation` / `AgentResponse` - the ranked, explained result set
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no LLM
//! access. Every entity is created by exactly one pipeline stage and read by
//! the next; nothing here outlives a single request.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and prices, plus the pipeline entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
