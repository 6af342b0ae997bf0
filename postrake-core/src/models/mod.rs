//! Domain models for Postrake.
//!
//! - [`post`] - the canonical post record and its media/content kinds
//! - [`identifier`] - content identifier resolution from post URLs
//! - [`attempt`] - per-attempt observability records
//! - [`session`] - caller-supplied session credentials

pub mod attempt;
pub mod identifier;
pub mod post;
pub mod session;

pub use attempt::{AcquisitionAttempt, AttemptLog, AttemptOutcome};
pub use identifier::{ContentIdentifier, IdentifierKind};
pub use post::{CanonicalPost, ContentKind, MediaItem, MediaKind};
pub use session::SessionCredentials;
