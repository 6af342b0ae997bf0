// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Postrake LinkedIn
//!
//! The LinkedIn source: acquisition strategies and payload normalizers.
//!
//! This crate implements the four retrieval techniques for a LinkedIn post
//! and the extraction logic that maps each payload shape onto the canonical
//! record:
//!
//! - [`strategies::EmbedStrategy`] - public embed rendering
//! - [`strategies::PublicPageStrategy`] - unauthenticated post page
//!   (JSON-LD / Open-Graph)
//! - [`strategies::PrivateApiStrategy`] - authenticated JSON entity graph
//! - [`strategies::RenderedDomStrategy`] - headless-browser extraction
//!
//! [`factory::build_pipeline`] assembles them in default priority order;
//! [`factory::fetch_post`] runs one URL end to end.
//!
//! ## Example
//!
//! ```ignore
//! use postrake_fetch::FetchContext;
//! use postrake_linkedin::fetch_post;
//!
//! let ctx = FetchContext::new();
//! let record = fetch_post(
//!     "https://www.linkedin.com/feed/update/urn:li:activity:7123456789/",
//!     &ctx,
//! ).await;
//! ```

pub mod discover;
pub mod factory;
pub mod headers;
pub mod html;
pub mod page;
pub mod parse;
pub mod selectors;
pub mod strategies;
pub mod urls;
pub mod voyager;

// Re-export key entry points at crate root
pub use discover::ProfileDiscovery;
pub use factory::{build_pipeline, default_strategies, fetch_post};
pub use strategies::{
    EmbedStrategy, PrivateApiStrategy, PublicPageStrategy, RenderedDomStrategy,
};
