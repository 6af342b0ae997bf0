// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Postrake Core
//!
//! Core types and models for the Postrake acquisition pipeline.
//!
//! This crate provides the foundational abstractions used across all other
//! Postrake crates:
//!
//! - [`CanonicalPost`] - the normalized record every acquisition strategy
//!   converges on
//! - [`ContentIdentifier`] - a stable content identifier resolved from an
//!   arbitrary post URL
//! - [`AcquisitionAttempt`] / [`AttemptLog`] - per-attempt observability
//!   records for one pipeline run
//! - [`SessionCredentials`] - opaque caller-supplied session tokens for
//!   authenticated strategies
//!
//! Everything here is pure data: no I/O, no network access.

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Attempt tracking
    AcquisitionAttempt,
    AttemptLog,
    AttemptOutcome,
    // Canonical record
    CanonicalPost,
    ContentKind,
    MediaItem,
    MediaKind,
    // Identifier resolution
    ContentIdentifier,
    IdentifierKind,
    // Credentials
    SessionCredentials,
};
