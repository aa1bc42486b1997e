//! Scout Marketplace - retrieval layer for the Mercari shopping agent.
//!
//! The marketplace renders its listings client-side, so this crate treats
//! "fetch a rendered page and extract fields by selector" as a capability
//! behind the [`PageRenderer`] trait. The shipped [`HttpRenderer`] polls
//! plain GETs with bounded backoff until the page's ready selector matches;
//! a headless-browser implementation slots in behind the same trait.
//!
//! [`MercariClient`] drives a renderer to produce [`scout_core::ItemSummary`]
//! rows from a search and a full [`scout_core::ItemDetail`] from a listing
//! page.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod mercari;
pub mod renderer;
pub mod retry;

pub use error::{RenderError, RetrievalError};
pub use mercari::{Marketplace, MercariClient, SEARCH_RESULT_CAP};
pub use renderer::{HttpRenderer, PageRenderer, RenderedPage};
pub use retry::Retry;
