//! LLM shopping agent over Mercari Japan.
//!
//! Interprets a free-text shopping request, searches the marketplace, and
//! returns up to three ranked recommendations with a narrated justification
//! in the user's language. The pipeline runs five stages in order:
//! interpret, retrieve, select, enrich, respond.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod agent;
pub mod config;
pub mod enricher;
pub mod error;
pub mod interpreter;
pub mod llm;
pub mod responder;
pub mod retrieval;
pub mod selector;
pub mod tools;

pub use agent::ShoppingAgent;
pub use config::ScoutConfig;
pub use error::AgentError;
